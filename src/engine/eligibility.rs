use log::trace;

use crate::error::{Rejection, Result};
use crate::identity::VoterAttributes;
use crate::model::{
    common::{
        election::{CandidateIndex, Visibility},
        user::UserId,
    },
    db::election::Election,
};

use super::ledger::VoteLedger;

/// A would-be voter, as seen by the eligibility rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterProfile {
    pub id: UserId,
    pub attributes: VoterAttributes,
}

impl VoterProfile {
    pub fn new(id: UserId, attributes: VoterAttributes) -> Self {
        Self { id, attributes }
    }
}

/// Apply every rule that depends only on the election and the voter.
///
/// Rules are checked in a fixed order and the first failure is returned.
pub fn check_ballot(
    election: &Election,
    voter: &VoterProfile,
    candidate_index: CandidateIndex,
) -> std::result::Result<(), Rejection> {
    if election.is_closed() {
        return Err(Rejection::Closed);
    }
    match voter.attributes.age {
        Some(age) if age >= election.min_age => {}
        _ => return Err(Rejection::TooYoung),
    }
    if election.visibility == Visibility::Private && !election.is_owned_by(&voter.id) {
        return Err(Rejection::NotAuthorizedPrivate);
    }
    if election.candidate(candidate_index).is_none() {
        return Err(Rejection::InvalidCandidate);
    }
    Ok(())
}

/// Decide whether the voter may cast this ballot now, including whether they
/// have already voted.
///
/// This is advisory: the ledger enforces single voting again when recording.
pub async fn check(
    ledger: &VoteLedger,
    election: &Election,
    voter: &VoterProfile,
    candidate_index: CandidateIndex,
) -> Result<()> {
    check_ballot(election, voter, candidate_index)?;
    if ledger.has_voted(election.id, &voter.id).await? {
        return Err(Rejection::AlreadyVoted.into());
    }
    trace!("{} may vote in election {}", voter.id, election.id);
    Ok(())
}
