use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::{Rejection, Result};
use crate::model::{
    common::{tally::TallyResult, user::UserId},
    db::election::{Election, ElectionState},
};

use super::{ledger::VoteLedger, repository::ElectionRepository, tally::tally};

/// Moves elections between open and closed, freezing results on close.
///
/// Every transition is a single compare-and-set on the stored `is_closed`
/// flag, so a failed or lost transition leaves the stored election unchanged.
#[derive(Clone)]
pub struct LifecycleManager {
    repository: ElectionRepository,
    ledger: VoteLedger,
}

impl LifecycleManager {
    pub fn new(repository: ElectionRepository, ledger: VoteLedger) -> Self {
        Self { repository, ledger }
    }

    /// Current results of the election, computed from the ledger.
    pub async fn live_tally(&self, election: &Election) -> Result<(Vec<u64>, TallyResult)> {
        let counts = self
            .ledger
            .counts_by_candidate(election.id, election.candidates.len())
            .await?;
        let result = tally(&counts);
        Ok((counts, result))
    }

    /// Close the election if it is open and its end time has passed.
    ///
    /// Returns the election as it now stands.
    pub async fn auto_close_if_due(&self, election: Election, now: DateTime<Utc>) -> Result<Election> {
        if !election.is_due(now) {
            return Ok(election);
        }
        match self.freeze(election, now).await? {
            Ok(closed) => {
                info!("Election {} closed automatically at {now}", closed.id);
                Ok(closed)
            }
            Err(stale) => {
                debug!("Election {} changed state concurrently, re-reading", stale.id);
                self.repository.get_by_id(stale.id).await
            }
        }
    }

    /// Close the election on the owner's request.
    pub async fn close(
        &self,
        election: Election,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Election> {
        if !election.is_owned_by(actor) {
            return Err(Rejection::NotOwner.into());
        }
        if election.is_closed() {
            return Err(Rejection::AlreadyClosed.into());
        }
        match self.freeze(election, now).await? {
            Ok(closed) => {
                info!("Election {} closed by {actor}", closed.id);
                Ok(closed)
            }
            // Lost the race to another close.
            Err(_) => Err(Rejection::AlreadyClosed.into()),
        }
    }

    /// Reopen the election on the owner's request.
    ///
    /// The end time and results of the last close are kept until the next
    /// close replaces them. Reopening an open election does nothing.
    pub async fn reopen(&self, mut election: Election, actor: &UserId) -> Result<Election> {
        if !election.is_owned_by(actor) {
            return Err(Rejection::NotOwner.into());
        }
        if !election.is_closed() {
            debug!("Election {} is already open", election.id);
            return Ok(election);
        }
        let state = election.state.reopened();
        if self.repository.update_state(election.id, true, &state).await? {
            info!("Election {} reopened by {actor}", election.id);
            election.state = state;
            Ok(election)
        } else {
            self.repository.get_by_id(election.id).await
        }
    }

    /// Snapshot the results and try to close the election in one write.
    ///
    /// On success returns the closed election; if the stored election was no
    /// longer open, returns the caller's stale copy untouched.
    async fn freeze(
        &self,
        mut election: Election,
        now: DateTime<Utc>,
    ) -> Result<std::result::Result<Election, Election>> {
        let (_, summary) = self.live_tally(&election).await?;
        let state = ElectionState::closed(now, summary);
        if self.repository.update_state(election.id, false, &state).await? {
            election.state = state;
            Ok(Ok(election))
        } else {
            Ok(Err(election))
        }
    }
}
