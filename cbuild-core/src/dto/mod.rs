//! Data Transfer Objects for the remote build service
//!
//! These are the request and response bodies exchanged with the service.
//! They are kept separate from the domain types so that wire details (field
//! names, optional fields) do not leak into the engine.

pub mod build;
pub mod log;
pub mod object;
