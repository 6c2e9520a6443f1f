//! Types shared between the database, API and engine layers.

pub mod election;
pub mod tally;
pub mod user;
