//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Field names are camelCase.
//! - Datetimes are serialised as RFC 3339 strings.

pub mod caller;
pub mod election;
pub mod profile;
pub mod tally;
pub mod vote;
