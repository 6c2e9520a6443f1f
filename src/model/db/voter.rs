use serde::{Deserialize, Serialize};

use crate::model::common::user::UserId;

/// Attributes we hold about a voter, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// The voter's identity.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Age in years, if the voter has told us.
    #[serde(default)]
    pub age: Option<u32>,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Voter {
        pub fn example(id: &str, age: u32) -> Self {
            Self {
                id: UserId::from(id),
                age: Some(age),
            }
        }
    }
}
