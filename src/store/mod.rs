//! The persistent store behind the engine.
//!
//! The engine only talks to the [`Store`] trait. Two backends exist: a
//! volatile [`MemoryStore`] and a MongoDB-backed [`MongoStore`].

use crate::error::StoreError;
use crate::model::{
    common::{
        election::{AccessCode, ElectionId, Visibility},
        user::UserId,
    },
    db::{
        ballot::{Ballot, BallotKey},
        election::{Election, ElectionState},
        voter::Voter,
    },
};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Which elections to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionFilter {
    /// Elections with public visibility.
    Public,
    /// Elections created by the given user.
    OwnedBy(UserId),
    /// Elections whose access code matches, ignoring case.
    AccessCode(AccessCode),
}

impl ElectionFilter {
    /// Does the election pass this filter?
    pub fn matches(&self, election: &Election) -> bool {
        match self {
            Self::Public => election.visibility == Visibility::Public,
            Self::OwnedBy(owner) => election.is_owned_by(owner),
            Self::AccessCode(code) => election.access_code.matches(code),
        }
    }
}

/// Outcome of a keyed ballot insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BallotWrite {
    /// The ballot was stored.
    Inserted,
    /// A ballot with the same key already existed; nothing was written.
    Duplicate,
}

/// Storage operations needed by the engine.
///
/// Every write is atomic: it either happens completely or not at all.
#[rocket::async_trait]
pub trait Store: Send + Sync {
    /// Allocate a fresh, never-before-used election ID.
    async fn next_election_id(&self) -> StoreResult<ElectionId>;

    /// Insert a new election.
    async fn insert_election(&self, election: &Election) -> StoreResult<()>;

    /// Fetch an election by ID.
    async fn election(&self, id: ElectionId) -> StoreResult<Option<Election>>;

    /// Fetch all elections passing the filter, in ascending ID order.
    async fn elections(&self, filter: &ElectionFilter) -> StoreResult<Vec<Election>>;

    /// Replace the lifecycle state of an election, but only if its stored
    /// `is_closed` flag still equals `expect_closed`.
    ///
    /// Returns whether the update was applied.
    async fn update_state(
        &self,
        id: ElectionId,
        expect_closed: bool,
        state: &ElectionState,
    ) -> StoreResult<bool>;

    /// Insert a ballot unless one with the same key already exists.
    async fn insert_ballot(&self, ballot: &Ballot) -> StoreResult<BallotWrite>;

    /// Fetch a ballot by key.
    async fn ballot(&self, key: &BallotKey) -> StoreResult<Option<Ballot>>;

    /// Fetch every ballot cast in an election.
    async fn ballots(&self, election_id: ElectionId) -> StoreResult<Vec<Ballot>>;

    /// Fetch a voter's attributes.
    async fn voter(&self, id: &UserId) -> StoreResult<Option<Voter>>;

    /// Create or replace a voter's attributes.
    async fn upsert_voter(&self, voter: &Voter) -> StoreResult<()>;
}
