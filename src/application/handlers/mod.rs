//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod guidance;

pub use guidance::{
    GenerateGuidanceHandler, GetProfileSummaryError, GetProfileSummaryHandler,
    GetProfileSummaryQuery, GuidanceResponse, GuidanceSource, ProcessRequestCommand,
    ProcessRequestError, ProcessRequestHandler, DEFAULT_MAX_QUERY_LEN,
};
