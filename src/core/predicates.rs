//! Classifiers over a candidate group of four profiles.
//!
//! Each predicate is pure and answers `false` for any slice whose length is not 4.

use crate::domain::model::{Gender, GroupType, Profile};
use std::collections::HashSet;
use std::hash::Hash;

pub const GROUP_SIZE: usize = 4;

pub type Predicate = fn(&[&Profile]) -> bool;

fn distinct<T, F>(group: &[&Profile], attr: F) -> usize
where
    T: Eq + Hash,
    F: Fn(&Profile) -> T,
{
    group.iter().map(|&p| attr(p)).collect::<HashSet<T>>().len()
}

/// Two men, two women, at least three races.
pub fn is_balance_guardians(group: &[&Profile]) -> bool {
    if group.len() != GROUP_SIZE {
        return false;
    }
    let (male, female) = group.iter().fold((0, 0), |(m, f), p| match p.gender {
        Gender::Male => (m + 1, f),
        Gender::Female => (m, f + 1),
    });

    male == 2 && female == 2 && distinct(group, |p| p.race) >= 3
}

/// Four different emotions, at least three races.
pub fn is_inside_out(group: &[&Profile]) -> bool {
    if group.len() != GROUP_SIZE {
        return false;
    }
    distinct(group, |p| p.emotion) == GROUP_SIZE && distinct(group, |p| p.race) >= 3
}

/// Four different ages and four different emotions.
pub fn is_the_incredibles(group: &[&Profile]) -> bool {
    if group.len() != GROUP_SIZE {
        return false;
    }
    distinct(group, |p| p.age) == GROUP_SIZE && distinct(group, |p| p.emotion) == GROUP_SIZE
}

impl GroupType {
    pub fn predicate(&self) -> Predicate {
        match self {
            GroupType::BalanceGuardians => is_balance_guardians,
            GroupType::InsideOut => is_inside_out,
            GroupType::TheIncredibles => is_the_incredibles,
        }
    }

    pub fn matches(&self, group: &[&Profile]) -> bool {
        (self.predicate())(group)
    }
}

/// Highest-priority type a group satisfies, if any.
#[cfg(test)]
pub(crate) fn classify(group: &[&Profile]) -> Option<GroupType> {
    GroupType::PRIORITY.into_iter().find(|t| t.matches(group))
}
