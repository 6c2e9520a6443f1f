use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{
        election::{Candidate, ElectionId, Visibility},
        tally::TallyResult,
        user::UserId,
    },
    db::election::Election,
};

/// An API-friendly election description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionDescription {
    /// Election unique ID.
    pub id: ElectionId,
    /// Creator of the election.
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    /// Access code. Withheld from everyone but the owner for private elections.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub access_code: Option<String>,
    pub min_age: u32,
    /// Candidates in ballot order; a ballot names one by its index here.
    pub candidates: Vec<Candidate>,
    pub created_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub is_closed: bool,
    /// When the election was last closed.
    pub ended_at: Option<DateTime<Utc>>,
    /// Results frozen at the last close.
    pub result_summary: Option<TallyResult>,
}

impl ElectionDescription {
    /// Describe the election as seen by the given caller.
    pub fn for_viewer(election: Election, viewer: Option<&UserId>) -> Self {
        let show_code = election.visibility == Visibility::Public
            || viewer.map_or(false, |viewer| election.is_owned_by(viewer));
        Self::new(election, show_code)
    }

    /// Describe the election to someone who already holds its access code.
    pub fn for_code_holder(election: Election) -> Self {
        Self::new(election, true)
    }

    fn new(election: Election, show_code: bool) -> Self {
        Self {
            id: election.id,
            access_code: show_code.then(|| election.access_code.to_string()),
            owner_id: election.owner_id,
            title: election.title,
            description: election.description,
            visibility: election.visibility,
            min_age: election.min_age,
            candidates: election.candidates,
            created_at: election.created_at,
            end_at: election.end_at,
            is_closed: election.state.is_closed,
            ended_at: election.state.ended_at,
            result_summary: election.state.result_summary,
        }
    }
}

/// A summary of an election, shorter than the full `ElectionDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    pub id: ElectionId,
    pub title: String,
    pub visibility: Visibility,
    pub candidate_count: usize,
    pub end_at: DateTime<Utc>,
    pub is_closed: bool,
}

impl From<Election> for ElectionSummary {
    fn from(election: Election) -> Self {
        Self {
            id: election.id,
            title: election.title,
            visibility: election.visibility,
            candidate_count: election.candidates.len(),
            end_at: election.end_at,
            is_closed: election.state.is_closed,
        }
    }
}
