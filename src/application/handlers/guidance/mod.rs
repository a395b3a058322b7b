//! Guidance handlers.
//!
//! - `ProcessRequestHandler` - analyse a request and update the profile
//! - `GenerateGuidanceHandler` - analysis plus generated guidance text
//! - `GetProfileSummaryHandler` - read a learner's aggregates

mod generate_guidance;
mod get_profile_summary;
mod process_request;

pub use generate_guidance::{GenerateGuidanceHandler, GuidanceResponse, GuidanceSource};
pub use get_profile_summary::{
    GetProfileSummaryError, GetProfileSummaryHandler, GetProfileSummaryQuery,
};
pub use process_request::{
    ProcessRequestCommand, ProcessRequestError, ProcessRequestHandler, DEFAULT_MAX_QUERY_LEN,
};
