//! Lead lifecycle: intake, assignment, status tracking, duplicate
//! detection and export.
//!
//! Every mutating operation here runs in a single transaction that covers
//! both the lead row and its audit row.

pub mod assignment;
pub mod export;
pub mod intake;
pub mod phone;
pub mod resolver;
pub mod tracker;
