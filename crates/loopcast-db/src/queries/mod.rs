//! Database query operations, grouped by store.

pub mod assets;
pub mod schedule;
pub mod sessions;
