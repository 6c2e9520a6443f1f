use std::collections::BTreeSet;

use crate::model::common::tally::TallyResult;

/// Compute the result of an election from its per-candidate vote counts.
///
/// Every candidate sharing the highest count is a winner. With no votes
/// there are no winners.
pub fn tally(counts: &[u64]) -> TallyResult {
    let total_votes = counts.iter().sum();
    if total_votes == 0 {
        return TallyResult::default();
    }
    let max_votes = counts.iter().copied().max().unwrap_or_default();
    let winners: BTreeSet<_> = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count == max_votes)
        .map(|(index, _)| index)
        .collect();
    TallyResult {
        total_votes,
        winners,
        max_votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winners(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().copied().collect()
    }

    #[test]
    fn clear_winner() {
        let result = tally(&[3, 1]);
        assert_eq!(result.total_votes, 4);
        assert_eq!(result.winners, winners(&[0]));
        assert_eq!(result.max_votes, 3);
        assert!(!result.is_tie());
    }

    #[test]
    fn ties_have_several_winners() {
        let result = tally(&[2, 2]);
        assert_eq!(result.total_votes, 4);
        assert_eq!(result.winners, winners(&[0, 1]));
        assert_eq!(result.max_votes, 2);
        assert!(result.is_tie());

        let result = tally(&[1, 4, 0, 4]);
        assert_eq!(result.winners, winners(&[1, 3]));
    }

    #[test]
    fn no_votes_means_no_winners() {
        assert_eq!(tally(&[0, 0]), TallyResult::default());
        assert_eq!(tally(&[]), TallyResult::default());
    }
}
