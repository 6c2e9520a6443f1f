use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::election::{CandidateIndex, ElectionId},
    db::ballot::Ballot,
};

/// A vote, as submitted by a voter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub candidate_index: CandidateIndex,
}

/// Confirmation of a recorded ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub election_id: ElectionId,
    pub candidate_index: CandidateIndex,
    pub voted_at: DateTime<Utc>,
}

impl From<Ballot> for VoteReceipt {
    fn from(ballot: Ballot) -> Self {
        Self {
            election_id: ballot.election_id(),
            candidate_index: ballot.candidate_index,
            voted_at: ballot.voted_at,
        }
    }
}
