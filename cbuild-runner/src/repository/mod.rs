//! Repository layer
//!
//! Repositories are the capability interfaces the engine depends on. Each
//! one covers a single remote concern (starting builds, reading logs,
//! querying status) and has one HTTP implementation backed by the shared
//! [`BuildServiceClient`](cbuild_client::BuildServiceClient).
//!
//! All repositories are trait-based so the engine can be driven by test
//! doubles.

mod builds;
mod logs;
mod status;

// Re-export traits
pub use builds::BuildRepository;
pub use logs::LogRepository;
pub use status::StatusRepository;

// Re-export implementations
pub use builds::HttpBuildRepository;
pub use logs::HttpLogRepository;
pub use status::HttpStatusRepository;
