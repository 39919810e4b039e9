//! cbuild Core
//!
//! Core types shared by the cbuild client, runner and CLI.
//!
//! This crate contains:
//! - Domain types: the submitted build, its log stream and its status
//! - DTOs: request/response bodies exchanged with the remote build service

pub mod domain;
pub mod dto;
