//! loopcast-db: SQLite schema, migrations, and query operations.
//!
//! Persistence for the three stores the manifest service consumes: the
//! asset catalog, the channel schedule, and client sessions. SQLite via
//! rusqlite with r2d2 connection pooling; migrations are embedded in the
//! binary and run on pool initialization.
//!
//! Store rows are validated here, at the boundary: a catalog row with a
//! nonpositive duration or zero segment count surfaces as a `Retrieval`
//! error instead of corrupting the schedule walk.

pub mod migrations;
pub mod pool;
pub mod queries;
