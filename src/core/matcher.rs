//! Exhaustive first-match search for a quadruple satisfying a predicate.

use crate::core::predicates::Predicate;
use crate::domain::model::{Profile, ProfileId};
use std::collections::HashSet;

/// Scans `population` for the first quadruple `(i, j, k, l)`, `i < j < k < l` in
/// lexicographic index order, whose members are all outside `excluded` and which
/// satisfies `predicate`. Pure: the caller commits the match.
///
/// Worst case is O(n^4) in the number of eligible profiles.
pub fn find_match<'a>(
    population: &'a [Profile],
    excluded: &HashSet<ProfileId>,
    predicate: Predicate,
) -> Option<[&'a Profile; 4]> {
    let eligible: Vec<&Profile> = population
        .iter()
        .filter(|p| !excluded.contains(&p.id))
        .collect();
    let n = eligible.len();
    if n < 4 {
        return None;
    }

    for i in 0..n - 3 {
        for j in i + 1..n - 2 {
            for k in j + 1..n - 1 {
                for l in k + 1..n {
                    let candidate = [eligible[i], eligible[j], eligible[k], eligible[l]];
                    if predicate(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
    }

    None
}
