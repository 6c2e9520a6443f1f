use log::debug;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::mongodb::{is_duplicate_key_error, Coll};

/// ID of the counter used to allocate election IDs.
pub const ELECTION_ID_COUNTER_ID: &str = "election_id";

/// A counter object used to implement auto-increment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Create a new `Counter` starting at the given value.
    pub fn new(id: impl Into<String>, start: u32) -> Self {
        Self {
            id: id.into(),
            next: start,
        }
    }

    /// Atomically retrieve the next value of the counter with the given ID.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<u32, StoreError> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("Failed to find counter with ID {id}")))?;
        Ok(counter.next)
    }
}

/// Ensure the election ID counter exists, creating it at 1 if not.
///
/// This operation is idempotent.
pub async fn ensure_election_id_counter_exists(counters: &Coll<Counter>) -> Result<(), StoreError> {
    match counters
        .insert_one(Counter::new(ELECTION_ID_COUNTER_ID, 1), None)
        .await
    {
        Ok(_) => {
            debug!("Created election ID counter");
            Ok(())
        }
        Err(e) if is_duplicate_key_error(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
