//! HTTP adapter for the guide endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnalyzeRequest, ErrorResponse, HealthResponse};
pub use handlers::GuideAppState;
pub use routes::{guide_router, guide_routes};
