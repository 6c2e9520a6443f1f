use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{
    common::{
        election::{Candidate, Visibility},
        user::UserId,
    },
    db::election::NewElection,
};

/// An election specification, as submitted by its creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSpec {
    /// Election title.
    pub title: String,
    /// Election description.
    pub description: String,
    /// Public elections are listed; private ones are found by access code.
    #[serde(default)]
    pub visibility: Visibility,
    /// Minimum voter age. Signed so that negative input can be reported.
    #[serde(default)]
    pub min_age: i64,
    /// Scheduled closing time.
    pub end_at: DateTime<Utc>,
    /// Candidates, in ballot order. Unnamed entries are ignored.
    pub candidates: Vec<Candidate>,
}

impl ElectionSpec {
    /// Check this spec and turn it into an election draft created at `now`.
    pub fn validate(self, owner: UserId, now: DateTime<Utc>) -> Result<NewElection, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.min_age < 0 {
            return Err(ValidationError::NegativeMinAge);
        }
        let min_age =
            u32::try_from(self.min_age).map_err(|_| ValidationError::MinAgeOutOfRange(self.min_age))?;
        if self.end_at <= now {
            return Err(ValidationError::EndNotInFuture);
        }
        let candidates: Vec<_> = self
            .candidates
            .into_iter()
            .filter_map(Candidate::normalised)
            .collect();
        if candidates.is_empty() {
            return Err(ValidationError::NoCandidates);
        }

        Ok(NewElection {
            owner_id: owner,
            title: title.to_string(),
            description: description.to_string(),
            visibility: self.visibility,
            min_age,
            candidates,
            created_at: now,
            end_at: self.end_at,
        })
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use chrono::Duration;

    impl ElectionSpec {
        /// A public election for adults, ending in a week.
        pub fn public_example() -> Self {
            Self {
                title: "Quidditch Captain".to_string(),
                description: "Who should lead the team next season?".to_string(),
                visibility: Visibility::Public,
                min_age: 13,
                end_at: Utc::now() + Duration::days(7),
                candidates: vec![
                    Candidate::example1(),
                    Candidate::example2(),
                    Candidate::example3(),
                ],
            }
        }

        /// A private election open to all ages, ending tomorrow.
        pub fn private_example() -> Self {
            Self {
                title: "Club Treasurer".to_string(),
                description: "Members-only vote for the new treasurer.".to_string(),
                visibility: Visibility::Private,
                min_age: 0,
                end_at: Utc::now() + Duration::days(1),
                candidates: vec![Candidate::example3(), Candidate::example2()],
            }
        }
    }
}
