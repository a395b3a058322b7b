//! HTTP adapters - REST API implementations.

pub mod guide;

pub use guide::{guide_router, GuideAppState};
