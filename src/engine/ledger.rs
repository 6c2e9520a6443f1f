use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::error::{Rejection, Result, StoreError};
use crate::model::{
    common::{
        election::{CandidateIndex, ElectionId},
        user::UserId,
    },
    db::ballot::{Ballot, BallotKey},
};
use crate::store::{BallotWrite, Store};

/// The record of every ballot cast. Holds at most one ballot per voter per
/// election.
#[derive(Clone)]
pub struct VoteLedger {
    store: Arc<dyn Store>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn has_voted(&self, election_id: ElectionId, voter_id: &UserId) -> Result<bool> {
        Ok(self.ballot_of(election_id, voter_id).await?.is_some())
    }

    /// The voter's ballot in the given election, if they have cast one.
    pub async fn ballot_of(
        &self,
        election_id: ElectionId,
        voter_id: &UserId,
    ) -> Result<Option<Ballot>> {
        let key = BallotKey::new(election_id, voter_id.clone());
        Ok(self.store.ballot(&key).await?)
    }

    /// Record a ballot.
    ///
    /// The write is keyed on `(election, voter)`, so of any number of
    /// concurrent calls for the same pair exactly one succeeds; the rest are
    /// rejected with [`Rejection::AlreadyVoted`].
    pub async fn record(
        &self,
        election_id: ElectionId,
        voter_id: &UserId,
        candidate_index: CandidateIndex,
        now: DateTime<Utc>,
    ) -> Result<Ballot> {
        let ballot = Ballot {
            key: BallotKey::new(election_id, voter_id.clone()),
            candidate_index,
            voted_at: now,
        };
        match self.store.insert_ballot(&ballot).await {
            Ok(BallotWrite::Inserted) => {
                info!("Recorded ballot of {voter_id} in election {election_id}");
                Ok(ballot)
            }
            Ok(BallotWrite::Duplicate) => {
                debug!("{voter_id} tried to vote twice in election {election_id}");
                Err(Rejection::AlreadyVoted.into())
            }
            Err(err) => {
                warn!("Failed to record ballot of {voter_id} in election {election_id}: {err}");
                Err(err.into())
            }
        }
    }

    /// Count the ballots for each candidate, in candidate order.
    ///
    /// The result always has `candidate_count` entries.
    pub async fn counts_by_candidate(
        &self,
        election_id: ElectionId,
        candidate_count: usize,
    ) -> Result<Vec<u64>> {
        let mut counts = vec![0; candidate_count];
        for ballot in self.store.ballots(election_id).await? {
            let count = counts.get_mut(ballot.candidate_index).ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "ballot of {} in election {election_id} names candidate {}",
                    ballot.voter_id(),
                    ballot.candidate_index
                ))
            })?;
            *count += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ledger() -> (VoteLedger, MemoryStore) {
        let store = MemoryStore::new();
        (VoteLedger::new(Arc::new(store.clone())), store)
    }

    #[rocket::async_test]
    async fn second_ballot_is_rejected_and_not_counted() {
        let (ledger, _) = ledger();
        let bob = UserId::from("bob");

        ledger.record(1, &bob, 0, Utc::now()).await.unwrap();
        let before = ledger.counts_by_candidate(1, 2).await.unwrap();

        let err = ledger.record(1, &bob, 1, Utc::now()).await.unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::AlreadyVoted));
        assert_eq!(ledger.counts_by_candidate(1, 2).await.unwrap(), before);
        assert_eq!(before, vec![1, 0]);
    }

    #[rocket::async_test]
    async fn counts_are_zero_filled_and_sum_to_ballots() {
        let (ledger, store) = ledger();
        for (voter, index) in [("a", 2), ("b", 2), ("c", 0)] {
            ledger
                .record(7, &UserId::from(voter), index, Utc::now())
                .await
                .unwrap();
        }
        // A ballot in another election must not be counted.
        ledger.record(8, &UserId::from("a"), 1, Utc::now()).await.unwrap();

        let counts = ledger.counts_by_candidate(7, 4).await.unwrap();
        assert_eq!(counts, vec![1, 0, 2, 0]);
        let stored = store.ballots(7).await.unwrap().len() as u64;
        assert_eq!(counts.iter().sum::<u64>(), stored);
    }

    #[rocket::async_test]
    async fn has_voted_and_ballot_of() {
        let (ledger, _) = ledger();
        let bob = UserId::from("bob");
        assert!(!ledger.has_voted(1, &bob).await.unwrap());

        ledger.record(1, &bob, 1, Utc::now()).await.unwrap();
        assert!(ledger.has_voted(1, &bob).await.unwrap());
        assert!(!ledger.has_voted(2, &bob).await.unwrap());
        let ballot = ledger.ballot_of(1, &bob).await.unwrap().unwrap();
        assert_eq!(ballot.candidate_index, 1);
    }

    #[rocket::async_test]
    async fn concurrent_double_submits_store_one_ballot() {
        let (ledger, store) = ledger();
        let voters = ["alice", "bob", "carol"];

        let mut handles = Vec::new();
        for voter in voters {
            for attempt in 0..16 {
                let ledger = ledger.clone();
                let voter = UserId::from(voter);
                handles.push(rocket::tokio::spawn(async move {
                    ledger.record(1, &voter, attempt % 3, Utc::now()).await
                }));
            }
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(err) => assert_eq!(err.rejection(), Some(Rejection::AlreadyVoted)),
            }
        }

        assert_eq!(accepted, voters.len());
        assert_eq!(store.ballots(1).await.unwrap().len(), voters.len());
        let counts = ledger.counts_by_candidate(1, 3).await.unwrap();
        assert_eq!(counts.iter().sum::<u64>(), voters.len() as u64);
    }

    #[rocket::async_test]
    async fn store_failure_records_nothing() {
        let (ledger, store) = ledger();
        store.set_read_only(true);
        let err = ledger
            .record(1, &UserId::from("bob"), 0, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Store(_)));

        store.set_read_only(false);
        assert!(store.ballots(1).await.unwrap().is_empty());
    }
}
