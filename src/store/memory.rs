use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rocket::tokio::sync::Mutex;

use crate::error::StoreError;
use crate::model::{
    common::{election::ElectionId, user::UserId},
    db::{
        ballot::{Ballot, BallotKey},
        election::{Election, ElectionState},
        voter::Voter,
    },
};

use super::{BallotWrite, ElectionFilter, Store, StoreResult};

#[derive(Debug)]
struct Tables {
    next_election_id: ElectionId,
    elections: BTreeMap<ElectionId, Election>,
    ballots: BTreeMap<BallotKey, Ballot>,
    voters: HashMap<UserId, Voter>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            next_election_id: 1,
            elections: BTreeMap::new(),
            ballots: BTreeMap::new(),
            voters: HashMap::new(),
        }
    }
}

/// A volatile store held in process memory.
///
/// Clones share the same data. Every operation takes a single lock, so each
/// one is atomic with respect to the others.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    offline: Arc<AtomicBool>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every write fail with [`StoreError::Unavailable`]; reads still work.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        self.check_read()?;
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store is read-only".to_string(),
            ));
        }
        Ok(())
    }
}

#[rocket::async_trait]
impl Store for MemoryStore {
    async fn next_election_id(&self) -> StoreResult<ElectionId> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        let id = tables.next_election_id;
        tables.next_election_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt("election IDs exhausted".to_string()))?;
        Ok(id)
    }

    async fn insert_election(&self, election: &Election) -> StoreResult<()> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        if tables.elections.contains_key(&election.id) {
            return Err(StoreError::Corrupt(format!(
                "election {} already exists",
                election.id
            )));
        }
        tables.elections.insert(election.id, election.clone());
        Ok(())
    }

    async fn election(&self, id: ElectionId) -> StoreResult<Option<Election>> {
        self.check_read()?;
        Ok(self.tables.lock().await.elections.get(&id).cloned())
    }

    async fn elections(&self, filter: &ElectionFilter) -> StoreResult<Vec<Election>> {
        self.check_read()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .elections
            .values()
            .filter(|election| filter.matches(election))
            .cloned()
            .collect())
    }

    async fn update_state(
        &self,
        id: ElectionId,
        expect_closed: bool,
        state: &ElectionState,
    ) -> StoreResult<bool> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        match tables.elections.get_mut(&id) {
            Some(election) if election.state.is_closed == expect_closed => {
                election.state = state.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_ballot(&self, ballot: &Ballot) -> StoreResult<BallotWrite> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        if tables.ballots.contains_key(&ballot.key) {
            return Ok(BallotWrite::Duplicate);
        }
        tables.ballots.insert(ballot.key.clone(), ballot.clone());
        Ok(BallotWrite::Inserted)
    }

    async fn ballot(&self, key: &BallotKey) -> StoreResult<Option<Ballot>> {
        self.check_read()?;
        Ok(self.tables.lock().await.ballots.get(key).cloned())
    }

    async fn ballots(&self, election_id: ElectionId) -> StoreResult<Vec<Ballot>> {
        self.check_read()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .ballots
            .values()
            .filter(|ballot| ballot.election_id() == election_id)
            .cloned()
            .collect())
    }

    async fn voter(&self, id: &UserId) -> StoreResult<Option<Voter>> {
        self.check_read()?;
        Ok(self.tables.lock().await.voters.get(id).cloned())
    }

    async fn upsert_voter(&self, voter: &Voter) -> StoreResult<()> {
        self.check_write()?;
        self.tables
            .lock()
            .await
            .voters
            .insert(voter.id.clone(), voter.clone());
        Ok(())
    }
}
