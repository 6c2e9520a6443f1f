use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::common::election::CandidateIndex;

/// The outcome of counting an election's ballots.
///
/// Ties are reported as several winners; an election with no votes has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResult {
    pub total_votes: u64,
    pub winners: BTreeSet<CandidateIndex>,
    pub max_votes: u64,
}

impl TallyResult {
    /// Did more than one candidate share the top count?
    pub fn is_tie(&self) -> bool {
        self.winners.len() > 1
    }
}
