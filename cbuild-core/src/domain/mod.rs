//! Core domain types
//!
//! This module contains the structures that describe one remote build for
//! the lifetime of a single invocation: the job itself, where its logs live,
//! the log lines it produces and the status the build service reports.

pub mod build;
pub mod job;
pub mod log;
