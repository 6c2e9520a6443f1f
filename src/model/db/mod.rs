//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - Datetimes are serialised in MongoDB's own format.
//! - Field names are camelCase, matching the logical election schema.

pub mod ballot;
pub mod election;
pub mod voter;
