//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! request validation, per-user serialization, profile load and save around
//! each pipeline run.

pub mod handlers;
mod user_locks;

pub use handlers::{
    GenerateGuidanceHandler, GetProfileSummaryError, GetProfileSummaryHandler,
    GetProfileSummaryQuery, GuidanceResponse, GuidanceSource, ProcessRequestCommand,
    ProcessRequestError, ProcessRequestHandler, DEFAULT_MAX_QUERY_LEN,
};
pub use user_locks::{UserLockGuard, UserLocks};
