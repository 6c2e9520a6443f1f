use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::common::{
    election::{CandidateIndex, ElectionId},
    user::UserId,
};

/// The store key of a ballot. At most one ballot can exist per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotKey {
    /// Foreign Key election ID.
    pub election_id: ElectionId,
    /// The voter who cast the ballot.
    pub voter_id: UserId,
}

impl BallotKey {
    pub fn new(election_id: ElectionId, voter_id: UserId) -> Self {
        Self {
            election_id,
            voter_id,
        }
    }
}

/// A single recorded ballot, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    #[serde(rename = "_id")]
    pub key: BallotKey,
    /// The chosen candidate.
    pub candidate_index: CandidateIndex,
    /// When the ballot was recorded.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub voted_at: DateTime<Utc>,
}

impl Ballot {
    pub fn election_id(&self) -> ElectionId {
        self.key.election_id
    }

    pub fn voter_id(&self) -> &UserId {
        &self.key.voter_id
    }
}
