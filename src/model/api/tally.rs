use serde::{Deserialize, Serialize};

use crate::engine::Standings;
use crate::model::common::{election::ElectionId, tally::TallyResult};

/// An election's standings, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyDescription {
    pub election_id: ElectionId,
    /// Ballots per candidate, in candidate order.
    pub counts: Vec<u64>,
    #[serde(flatten)]
    pub result: TallyResult,
    /// True once the election is closed and these are its frozen results.
    pub is_final: bool,
}

impl TallyDescription {
    pub fn new(election_id: ElectionId, standings: Standings) -> Self {
        Self {
            election_id,
            counts: standings.counts,
            result: standings.result,
            is_final: standings.is_final,
        }
    }
}
