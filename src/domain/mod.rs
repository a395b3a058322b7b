//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `learner` - Per-user profile, capability levels and trajectory
//! - `guidance` - The decision pipeline and its components

pub mod foundation;
pub mod guidance;
pub mod learner;
