//! Storage Adapters
//!
//! Implementations of the ProfileStore port for persisting learner profiles.
//!
//! ## Available Adapters
//!
//! - **FileProfileStore** - Stores profiles as YAML files on disk
//! - **InMemoryProfileStore** - Stores profiles in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileProfileStore, InMemoryProfileStore};
//!
//! // Production: file-based storage
//! let store = FileProfileStore::new("./data/profiles");
//!
//! // Testing: in-memory storage
//! let store = InMemoryProfileStore::new();
//! ```

mod file_profile_store;
mod in_memory_profile_store;

pub use file_profile_store::FileProfileStore;
pub use in_memory_profile_store::InMemoryProfileStore;
