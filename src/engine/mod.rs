//! The election lifecycle and tally engine.
//!
//! [`Engine`] is the surface the HTTP layer talks to. It wires the
//! repository, ledger and lifecycle manager to a single [`Store`], and applies
//! the lazy auto-close check to every election it hands out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::{Error, Result, ValidationError};
use crate::identity::{IdentityProvider, VoterDirectory};
use crate::model::{
    api::{election::ElectionSpec, profile::MIN_PROFILE_AGE},
    common::{
        election::{CandidateIndex, ElectionId},
        tally::TallyResult,
        user::UserId,
    },
    db::{ballot::Ballot, election::Election, voter::Voter},
};
use crate::store::Store;

pub mod access_code;
pub mod eligibility;
pub mod ledger;
pub mod lifecycle;
pub mod repository;
pub mod tally;

use eligibility::VoterProfile;
use ledger::VoteLedger;
use lifecycle::LifecycleManager;
use repository::ElectionRepository;

/// Per-candidate counts and the result they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// Ballots per candidate, in candidate order.
    pub counts: Vec<u64>,
    /// Live results while open, the frozen snapshot once closed.
    pub result: TallyResult,
    /// Is `result` the frozen snapshot of a closed election?
    pub is_final: bool,
}

#[derive(Clone)]
pub struct Engine {
    repository: ElectionRepository,
    ledger: VoteLedger,
    lifecycle: LifecycleManager,
    voters: VoterDirectory,
    identity: Arc<dyn IdentityProvider>,
}

impl Engine {
    /// Build an engine whose voter attributes come from the store itself.
    pub fn new(store: Arc<dyn Store>) -> Self {
        let voters = VoterDirectory::new(store.clone());
        Self::with_identity(store, Arc::new(voters))
    }

    /// Build an engine with an external source of voter attributes.
    pub fn with_identity(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        let repository = ElectionRepository::new(store.clone());
        let ledger = VoteLedger::new(store.clone());
        let lifecycle = LifecycleManager::new(repository.clone(), ledger.clone());
        Self {
            repository,
            ledger,
            lifecycle,
            voters: VoterDirectory::new(store),
            identity,
        }
    }

    /// Validate and create an election owned by `owner`.
    pub async fn create_election(&self, owner: &UserId, spec: ElectionSpec) -> Result<Election> {
        let draft = spec.validate(owner.clone(), Utc::now())?;
        self.repository.create(draft).await
    }

    pub async fn list_public_elections(&self) -> Result<Vec<Election>> {
        let elections = self.repository.list_public().await?;
        self.refresh_all(elections).await
    }

    pub async fn get_my_elections(&self, owner: &UserId) -> Result<Vec<Election>> {
        let elections = self.repository.list_by_owner(owner).await?;
        self.refresh_all(elections).await
    }

    pub async fn get_election(&self, id: ElectionId) -> Result<Election> {
        let election = self.repository.get_by_id(id).await?;
        self.refresh(election).await
    }

    pub async fn find_by_access_code(&self, code: &str) -> Result<Election> {
        let election = self.repository.find_by_access_code(code).await?;
        self.refresh(election).await
    }

    /// Cast `voter`'s ballot for the given candidate.
    pub async fn cast_vote(
        &self,
        election_id: ElectionId,
        voter: &UserId,
        candidate_index: CandidateIndex,
    ) -> Result<Ballot> {
        let election = self.get_election(election_id).await?;
        let attributes = self
            .identity
            .attributes_of(voter)
            .await?
            .unwrap_or_default();
        let profile = VoterProfile::new(voter.clone(), attributes);
        if let Err(err) = eligibility::check(&self.ledger, &election, &profile, candidate_index).await
        {
            debug!("Refused ballot of {voter} in election {election_id}: {err}");
            return Err(err);
        }
        self.ledger
            .record(election_id, voter, candidate_index, Utc::now())
            .await
    }

    /// Current standings: live while the election is open, frozen once closed.
    pub async fn get_tally(&self, election_id: ElectionId) -> Result<Standings> {
        let election = self.get_election(election_id).await?;
        let (counts, live) = self.lifecycle.live_tally(&election).await?;
        match (&election.state.result_summary, election.is_closed()) {
            (Some(summary), true) => Ok(Standings {
                counts,
                result: summary.clone(),
                is_final: true,
            }),
            _ => Ok(Standings {
                counts,
                result: live,
                is_final: false,
            }),
        }
    }

    /// The voter's own ballot in the given election, if any.
    pub async fn my_ballot(&self, election_id: ElectionId, voter: &UserId) -> Result<Option<Ballot>> {
        // Resolve the election first so unknown IDs are reported as such.
        self.repository.get_by_id(election_id).await?;
        self.ledger.ballot_of(election_id, voter).await
    }

    pub async fn close_election(&self, election_id: ElectionId, actor: &UserId) -> Result<Election> {
        let election = self.get_election(election_id).await?;
        self.lifecycle.close(election, actor, Utc::now()).await
    }

    pub async fn reopen_election(&self, election_id: ElectionId, actor: &UserId) -> Result<Election> {
        let election = self.get_election(election_id).await?;
        self.lifecycle.reopen(election, actor).await
    }

    /// The voter's stored attributes.
    pub async fn profile(&self, voter: &UserId) -> Result<Voter> {
        self.voters
            .get(voter)
            .await?
            .ok_or_else(|| Error::not_found(format!("Profile of '{voter}'")))
    }

    /// Record the voter's age.
    pub async fn update_profile(&self, voter: &UserId, age: u32) -> Result<Voter> {
        if age < MIN_PROFILE_AGE {
            return Err(ValidationError::AgeBelowMinimum {
                age,
                minimum: MIN_PROFILE_AGE,
            }
            .into());
        }
        let record = Voter {
            id: voter.clone(),
            age: Some(age),
        };
        self.voters.put(&record).await?;
        info!("Updated profile of {voter}");
        Ok(record)
    }

    async fn refresh(&self, election: Election) -> Result<Election> {
        self.refresh_at(election, Utc::now()).await
    }

    async fn refresh_at(&self, election: Election, now: DateTime<Utc>) -> Result<Election> {
        self.lifecycle.auto_close_if_due(election, now).await
    }

    async fn refresh_all(&self, elections: Vec<Election>) -> Result<Vec<Election>> {
        let now = Utc::now();
        let mut refreshed = Vec::with_capacity(elections.len());
        for election in elections {
            refreshed.push(self.refresh_at(election, now).await?);
        }
        Ok(refreshed)
    }
}
