//! loopcast-media: pure HLS domain logic.
//!
//! Everything in this crate is synchronous and I/O-free: parsing origin
//! playlists into structured form, rewriting master manifests, resolving
//! the schedule for a reference time, walking a client's personal timeline
//! through looping assets (the linearization engine), and rendering the
//! result back to playlist text. Fetching bytes from the origin is the
//! server crate's job.

pub mod linearize;
pub mod manifest;
pub mod master;
pub mod playlist;
pub mod schedule;
pub mod url;

pub use linearize::{linearize, LinearItem, LinearSegment, LinearizeParams, LinearizedManifest, SourcedEntry};
pub use manifest::{parse_child, parse_master, MasterManifest, RenditionManifest, Segment};
pub use master::{rewrite_master, RewrittenMaster};
pub use schedule::{resolve, ResolvedSchedule};
