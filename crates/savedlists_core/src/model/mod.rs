//! Domain model for saved lists.
//!
//! # Responsibility
//! - Define list snapshots and the reserved id space.
//! - Provide title collation used for presentation order.
//!
//! # Invariants
//! - List identity is the numeric id; titles are presentation only.

pub mod collation;
pub mod list;
