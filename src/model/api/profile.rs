use serde::{Deserialize, Serialize};

use crate::model::{common::user::UserId, db::voter::Voter};

/// The youngest age a voter may declare.
pub const MIN_PROFILE_AGE: u32 = 13;

/// A voter's profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub age: u32,
}

/// A voter's profile, as reported to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDescription {
    pub id: UserId,
    pub age: Option<u32>,
}

impl From<Voter> for ProfileDescription {
    fn from(voter: Voter) -> Self {
        Self {
            id: voter.id,
            age: voter.age,
        }
    }
}
