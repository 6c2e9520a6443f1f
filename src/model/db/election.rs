use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{
        election::{AccessCode, Candidate, CandidateIndex, ElectionId, Visibility},
        tally::TallyResult,
        user::UserId,
    },
    mongodb::optional_bson_datetime,
};

/// Core election data, as stored in the database.
///
/// Everything except `state` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    /// Unique ID.
    #[serde(rename = "_id")]
    pub id: ElectionId,
    /// The user who created the election.
    pub owner_id: UserId,
    /// Election title.
    pub title: String,
    /// Election description.
    pub description: String,
    /// Whether the election is listed publicly.
    pub visibility: Visibility,
    /// Code for finding the election without a listing.
    pub access_code: AccessCode,
    /// Voters younger than this may not vote.
    pub min_age: u32,
    /// Candidates, in ballot order.
    pub candidates: Vec<Candidate>,
    /// Creation time.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Scheduled closing time.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_at: DateTime<Utc>,
    /// Lifecycle state, owned by the lifecycle manager.
    #[serde(flatten)]
    pub state: ElectionState,
}

impl Election {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed
    }

    /// Has the scheduled end passed while the election is still open?
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.state.is_closed && now >= self.end_at
    }

    pub fn candidate(&self, index: CandidateIndex) -> Option<&Candidate> {
        self.candidates.get(index)
    }
}

/// The mutable part of an election. It is only ever written as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionState {
    /// Is the election closed to voting?
    pub is_closed: bool,
    /// When the election was last closed.
    #[serde(default, with = "optional_bson_datetime")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Results frozen at the moment of closing.
    #[serde(default)]
    pub result_summary: Option<TallyResult>,
}

impl ElectionState {
    /// The state of a freshly created election.
    pub fn open() -> Self {
        Self::default()
    }

    /// The state after closing at `now` with the given results.
    pub fn closed(now: DateTime<Utc>, summary: TallyResult) -> Self {
        Self {
            is_closed: true,
            ended_at: Some(now),
            result_summary: Some(summary),
        }
    }

    /// The state after reopening. The previous end time and results are
    /// left in place until the next close overwrites them.
    pub fn reopened(&self) -> Self {
        Self {
            is_closed: false,
            ..self.clone()
        }
    }
}

/// A validated election that has not yet been given an ID or access code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElection {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub min_age: u32,
    pub candidates: Vec<Candidate>,
    pub created_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl NewElection {
    /// Turn this into a full open election.
    pub fn into_election(self, id: ElectionId, access_code: AccessCode) -> Election {
        Election {
            id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            visibility: self.visibility,
            access_code,
            min_age: self.min_age,
            candidates: self.candidates,
            created_at: self.created_at,
            end_at: self.end_at,
            state: ElectionState::open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;

    use crate::model::api::election::ElectionSpec;

    impl Election {
        /// An open public election owned by "alice", created now.
        pub fn open_example(id: ElectionId) -> Self {
            let now = Utc::now();
            ElectionSpec::public_example()
                .validate(UserId::from("alice"), now)
                .unwrap()
                .into_election(id, AccessCode::parse("AB12CD").unwrap())
        }

        /// An open election owned by "alice" whose end time has already passed.
        pub fn overdue_example(id: ElectionId) -> Self {
            let mut example = Self::open_example(id);
            example.created_at = example.created_at - Duration::days(8);
            example.end_at = example.created_at + Duration::days(7);
            example
        }
    }

    #[test]
    fn due_only_when_open_and_past_end() {
        let election = Election::overdue_example(1);
        let now = Utc::now();
        assert!(election.is_due(now));
        assert!(!election.is_due(election.end_at - Duration::seconds(1)));
        assert!(election.is_due(election.end_at));

        let mut closed = election;
        closed.state = ElectionState::closed(now, TallyResult::default());
        assert!(!closed.is_due(now));
    }

    #[test]
    fn reopening_keeps_previous_results() {
        let now = Utc::now();
        let summary = TallyResult {
            total_votes: 3,
            winners: [1].into_iter().collect(),
            max_votes: 2,
        };
        let closed = ElectionState::closed(now, summary.clone());
        let reopened = closed.reopened();
        assert!(!reopened.is_closed);
        assert_eq!(reopened.ended_at, Some(now));
        assert_eq!(reopened.result_summary, Some(summary));
    }
}
