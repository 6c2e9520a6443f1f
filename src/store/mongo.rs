use log::{debug, info};
use mongodb::{
    bson::{doc, to_document, Document},
    options::{FindOptions, ReplaceOptions},
    Client, Database,
};
use rocket::futures::TryStreamExt;

use crate::error::StoreError;
use crate::model::{
    common::{
        election::{ElectionId, Visibility},
        user::UserId,
    },
    db::{
        ballot::{Ballot, BallotKey},
        election::{Election, ElectionState},
        voter::Voter,
    },
    mongodb::{
        ensure_election_id_counter_exists, ensure_indexes_exist, is_duplicate_key_error, Coll,
        Counter, ELECTION_ID_COUNTER_ID,
    },
};

use super::{BallotWrite, ElectionFilter, Store, StoreResult};

/// A store backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    elections: Coll<Election>,
    ballots: Coll<Ballot>,
    voters: Coll<Voter>,
    counters: Coll<Counter>,
}

impl MongoStore {
    /// Connect to the database and make sure it is ready for use.
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        info!("Connected to database '{db_name}'");
        Self::prepare(&db).await
    }

    /// Wrap an existing database handle, creating indexes and counters as needed.
    pub async fn prepare(db: &Database) -> StoreResult<Self> {
        ensure_indexes_exist(db).await?;
        let counters = Coll::<Counter>::from_db(db);
        ensure_election_id_counter_exists(&counters).await?;
        Ok(Self {
            elections: Coll::from_db(db),
            ballots: Coll::from_db(db),
            voters: Coll::from_db(db),
            counters,
        })
    }
}

fn election_filter(filter: &ElectionFilter) -> Document {
    match filter {
        ElectionFilter::Public => doc! { "visibility": Visibility::Public },
        ElectionFilter::OwnedBy(owner) => doc! { "ownerId": owner.as_str() },
        // Stored codes are always upper case, as are parsed ones.
        ElectionFilter::AccessCode(code) => doc! { "accessCode": code.clone() },
    }
}

fn ballot_key_filter(key: &BallotKey) -> Document {
    doc! {
        "_id.electionId": key.election_id,
        "_id.voterId": key.voter_id.as_str(),
    }
}

#[rocket::async_trait]
impl Store for MongoStore {
    async fn next_election_id(&self) -> StoreResult<ElectionId> {
        Counter::next(&self.counters, ELECTION_ID_COUNTER_ID).await
    }

    async fn insert_election(&self, election: &Election) -> StoreResult<()> {
        self.elections.insert_one(election, None).await?;
        debug!("Inserted election {}", election.id);
        Ok(())
    }

    async fn election(&self, id: ElectionId) -> StoreResult<Option<Election>> {
        Ok(self.elections.find_one(doc! { "_id": id }, None).await?)
    }

    async fn elections(&self, filter: &ElectionFilter) -> StoreResult<Vec<Election>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let elections = self
            .elections
            .find(election_filter(filter), options)
            .await?
            .try_collect()
            .await?;
        Ok(elections)
    }

    async fn update_state(
        &self,
        id: ElectionId,
        expect_closed: bool,
        state: &ElectionState,
    ) -> StoreResult<bool> {
        let filter = doc! {
            "_id": id,
            "isClosed": expect_closed,
        };
        let update = doc! {
            "$set": to_document(state)?,
        };
        let result = self.elections.update_one(filter, update, None).await?;
        Ok(result.matched_count == 1)
    }

    async fn insert_ballot(&self, ballot: &Ballot) -> StoreResult<BallotWrite> {
        match self.ballots.insert_one(ballot, None).await {
            Ok(_) => Ok(BallotWrite::Inserted),
            Err(err) if is_duplicate_key_error(&err) => Ok(BallotWrite::Duplicate),
            Err(err) => Err(err.into()),
        }
    }

    async fn ballot(&self, key: &BallotKey) -> StoreResult<Option<Ballot>> {
        Ok(self.ballots.find_one(ballot_key_filter(key), None).await?)
    }

    async fn ballots(&self, election_id: ElectionId) -> StoreResult<Vec<Ballot>> {
        let ballots = self
            .ballots
            .find(doc! { "_id.electionId": election_id }, None)
            .await?
            .try_collect()
            .await?;
        Ok(ballots)
    }

    async fn voter(&self, id: &UserId) -> StoreResult<Option<Voter>> {
        Ok(self.voters.find_one(doc! { "_id": id.as_str() }, None).await?)
    }

    async fn upsert_voter(&self, voter: &Voter) -> StoreResult<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.voters
            .replace_one(doc! { "_id": voter.id.as_str() }, voter, options)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::common::election::AccessCode;

    #[test]
    fn filters_use_stored_field_names() {
        assert_eq!(
            election_filter(&ElectionFilter::Public),
            doc! { "visibility": "public" }
        );
        assert_eq!(
            election_filter(&ElectionFilter::OwnedBy(UserId::from("alice"))),
            doc! { "ownerId": "alice" }
        );
        let code = AccessCode::parse("ab12cd").unwrap();
        assert_eq!(
            election_filter(&ElectionFilter::AccessCode(code)),
            doc! { "accessCode": "AB12CD" }
        );
    }

    #[test]
    fn ballot_filter_matches_the_composite_id() {
        let key = BallotKey::new(4, UserId::from("bob"));
        let filter = ballot_key_filter(&key);
        assert_eq!(filter.get_str("_id.voterId").unwrap(), "bob");
        assert!(filter.contains_key("_id.electionId"));
    }
}
