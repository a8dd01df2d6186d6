//! loopcast-core: shared types, IDs, errors, and configuration.
//!
//! This crate is the foundational dependency for all other loopcast crates,
//! providing type-safe identifiers, the unified error type, the catalog
//! domain model, and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod model;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use model::*;
