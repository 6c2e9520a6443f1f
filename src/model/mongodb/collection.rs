use std::ops::Deref;

use log::debug;
use mongodb::{bson::doc, error::Error as DbError, Collection, Database, IndexModel};

use crate::model::{
    db::{ballot::Ballot, election::Election, voter::Voter},
    mongodb::Counter,
};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for Election {
    const NAME: &'static str = "elections";
}

impl MongoCollection for Ballot {
    const NAME: &'static str = "ballots";
}

impl MongoCollection for Voter {
    const NAME: &'static str = "voters";
}

impl MongoCollection for Counter {
    const NAME: &'static str = "counters";
}

/// Ensure that all the required indexes exist on the given database.
///
/// Ballot uniqueness needs no extra index: the `(electionId, voterId)` key
/// is the document `_id`.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let elections = Coll::<Election>::from_db(db);
    for keys in [
        doc! {"visibility": 1},
        doc! {"ownerId": 1},
        doc! {"accessCode": 1},
    ] {
        let index = IndexModel::builder().keys(keys).build();
        elections.create_index(index, None).await?;
    }

    // Lets the ledger count an election's ballots without a collection scan.
    let ballot_index = IndexModel::builder()
        .keys(doc! {"_id.electionId": 1, "candidateIndex": 1})
        .build();
    Coll::<Ballot>::from_db(db)
        .create_index(ballot_index, None)
        .await?;

    Ok(())
}
