use crate::core::matcher::find_match;
use crate::core::population::ensure_unique_ids;
use crate::domain::model::{Group, GroupType, GroupingResult, Profile, ProfileId};
use crate::utils::error::{GroupingError, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs the matcher phase by phase in `GroupType::PRIORITY` order.
///
/// Each phase repeats until its predicate finds nothing among the profiles not yet
/// consumed; phases are never revisited. The exclusion set lives only for one `run`.
#[derive(Debug, Clone, Default)]
pub struct GroupingEngine {
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Duration>,
}

impl GroupingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort between matcher calls once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Abort between matcher calls once `limit` has elapsed since `run` started.
    pub fn with_deadline(mut self, limit: Duration) -> Self {
        self.deadline = Some(limit);
        self
    }

    pub fn run(&self, population: &[Profile]) -> Result<GroupingResult> {
        ensure_unique_ids(population)?;

        let started = Instant::now();
        let mut excluded: HashSet<ProfileId> = HashSet::with_capacity(population.len());
        let mut result = GroupingResult::default();

        for group_type in GroupType::PRIORITY {
            tracing::debug!(
                "Phase {} started ({} eligible)",
                group_type,
                population.len() - excluded.len()
            );
            let before = result.points;

            loop {
                if self.should_abort(started) {
                    tracing::warn!(
                        "⏹️ Grouping aborted during phase {} with {} groups",
                        group_type,
                        result.points
                    );
                    return Err(GroupingError::Aborted { partial: result });
                }

                let Some(quad) = find_match(population, &excluded, group_type.predicate()) else {
                    break;
                };

                excluded.extend(quad.iter().map(|p| p.id.clone()));
                let members = quad.map(|p| p.clone());
                tracing::debug!(
                    "{} #{}: {}, {}, {}, {}",
                    group_type,
                    result.points + 1,
                    members[0].id,
                    members[1].id,
                    members[2].id,
                    members[3].id
                );
                result.push(Group { members, group_type });
            }

            tracing::info!("Phase {} formed {} groups", group_type, result.points - before);
        }

        Ok(result)
    }

    fn should_abort(&self, started: Instant) -> bool {
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|limit| started.elapsed() >= limit);
        cancelled || expired
    }
}

/// Groups `population` with no abort conditions.
pub fn group_profiles(population: &[Profile]) -> Result<GroupingResult> {
    GroupingEngine::new().run(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::predicates::classify;
    use crate::domain::model::{Age, Emotion, Gender, Race};

    fn hero(id: &str, gender: Gender, emotion: Emotion, age: Age, race: Race) -> Profile {
        Profile::new(id, gender, emotion, age, race)
    }

    fn member(
        prefix: &str,
        n: u8,
        gender: Gender,
        emotion: Emotion,
        age: Age,
        race: Race,
    ) -> Profile {
        hero(&format!("{prefix}{n}"), gender, emotion, age, race)
    }

    /// Satisfies all three predicates.
    fn all_rounder(prefix: &str) -> Vec<Profile> {
        vec![
            member(prefix, 1, Gender::Male, Emotion::Anger, Age::Baby, Race::Caucasian),
            member(prefix, 2, Gender::Male, Emotion::Fear, Age::Kid, Race::Mongoloid),
            member(prefix, 3, Gender::Female, Emotion::Sadness, Age::Teenager, Race::Negroid),
            member(prefix, 4, Gender::Female, Emotion::Disgust, Age::Senior, Race::Android),
        ]
    }

    /// Inside Out and The Incredibles only (all male).
    fn emotional_squad(prefix: &str) -> Vec<Profile> {
        vec![
            member(prefix, 1, Gender::Male, Emotion::Neutral, Age::Baby, Race::Caucasian),
            member(prefix, 2, Gender::Male, Emotion::Happiness, Age::Kid, Race::Mongoloid),
            member(prefix, 3, Gender::Male, Emotion::Surprise, Age::Teenager, Race::Negroid),
            member(prefix, 4, Gender::Male, Emotion::Anger, Age::Senior, Race::Negroid),
        ]
    }

    /// The Incredibles only (single race, all male).
    fn family(prefix: &str) -> Vec<Profile> {
        vec![
            member(prefix, 1, Gender::Male, Emotion::Neutral, Age::Baby, Race::Android),
            member(prefix, 2, Gender::Male, Emotion::Fear, Age::YoungAdult, Race::Android),
            member(prefix, 3, Gender::Male, Emotion::Sadness, Age::MaturedAdult, Race::Android),
            member(prefix, 4, Gender::Male, Emotion::Happiness, Age::Senior, Race::Android),
        ]
    }

    fn ids(group: &Group) -> Vec<&str> {
        group.members.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_all_rounder_is_classified_as_balance_guardians() {
        let population = all_rounder("h");

        let result = group_profiles(&population).unwrap();

        assert_eq!(result.points, 1);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].group_type, GroupType::BalanceGuardians);
        assert!(result.unmatched(&population).is_empty());
    }

    #[test]
    fn test_population_under_four_yields_nothing() {
        let population: Vec<Profile> = all_rounder("h").into_iter().take(3).collect();

        let result = group_profiles(&population).unwrap();

        assert_eq!(result, GroupingResult::default());
        assert!(group_profiles(&[]).unwrap().groups.is_empty());
    }

    #[test]
    fn test_exhaustion_with_no_valid_quadruple() {
        // Same emotion and race everywhere: no predicate can hold.
        let population: Vec<Profile> = (0..7)
            .map(|i| {
                let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
                hero(&format!("p{i}"), gender, Emotion::Neutral, Age::ALL[i % 6], Race::Caucasian)
            })
            .collect();

        let result = group_profiles(&population).unwrap();

        assert!(result.groups.is_empty());
        assert_eq!(result.points, 0);
    }

    #[test]
    fn test_phases_run_in_priority_order() {
        let mut population = all_rounder("a");
        population.extend(emotional_squad("e"));
        population.extend(family("f"));

        let result = group_profiles(&population).unwrap();

        let types: Vec<GroupType> = result.groups.iter().map(|g| g.group_type).collect();
        assert_eq!(
            types,
            vec![GroupType::BalanceGuardians, GroupType::InsideOut, GroupType::TheIncredibles]
        );
        assert_eq!(result.points, 3);
        assert_eq!(ids(&result.groups[0]), vec!["a1", "a2", "a3", "a4"]);
        assert_eq!(ids(&result.groups[1]), vec!["e1", "e2", "e3", "e4"]);
        assert_eq!(ids(&result.groups[2]), vec!["f1", "f2", "f3", "f4"]);
    }

    #[test]
    fn test_priority_beats_population_position() {
        // The family block alone would be The Incredibles, but Balance Guardians
        // and Inside Out phases consume parts of it first.
        let mut population = family("f");
        population.extend(emotional_squad("e"));
        population.extend(all_rounder("a"));

        let result = group_profiles(&population).unwrap();

        assert_eq!(result.points, 2);
        assert_eq!(result.groups[0].group_type, GroupType::BalanceGuardians);
        assert_eq!(ids(&result.groups[0]), vec!["f1", "e1", "a3", "a4"]);
        assert_eq!(result.groups[1].group_type, GroupType::InsideOut);
        assert_eq!(ids(&result.groups[1]), vec!["f2", "f3", "e2", "e3"]);
    }

    #[test]
    fn test_smaller_index_quadruple_is_taken_first() {
        let mut population = all_rounder("x");
        population.extend(all_rounder("y"));

        let result = group_profiles(&population).unwrap();

        assert_eq!(result.points, 2);
        assert_eq!(ids(&result.groups[0]), vec!["x1", "x2", "x3", "x4"]);
        assert_eq!(ids(&result.groups[1]), vec!["y1", "y2", "y3", "y4"]);
    }

    #[test]
    fn test_groups_are_disjoint_and_deterministic() {
        // Round-robin interleave so groups cross block boundaries.
        let blocks = [all_rounder("a"), emotional_squad("b"), family("c"), all_rounder("d")];
        let population: Vec<Profile> = (0..4)
            .flat_map(|i| blocks.iter().map(move |b| b[i].clone()))
            .collect();

        let first = group_profiles(&population).unwrap();
        let second = group_profiles(&population).unwrap();
        assert_eq!(first, second);

        let mut seen = HashSet::new();
        for group in &first.groups {
            for id in group.ids() {
                assert!(seen.insert(id.clone()), "{} placed twice", id);
            }
            let members: Vec<&Profile> = group.members.iter().collect();
            assert!(group.group_type.matches(&members));
        }
        assert_eq!(first.points, first.groups.len());
        assert_eq!(ids(&first.groups[0]), vec!["a1", "b1", "a3", "a4"]);
        assert_eq!(ids(&first.groups[1]), vec!["c1", "d1", "d3", "d4"]);
        assert_eq!(ids(&first.groups[2]), vec!["a2", "b2", "b3", "c3"]);
        assert_eq!(first.groups[2].group_type, GroupType::InsideOut);
    }

    #[test]
    fn test_no_earlier_phase_match_remains() {
        let mut population = family("f");
        population.extend(all_rounder("a"));
        population.extend(emotional_squad("e"));
        population.push(hero("z", Gender::Female, Emotion::Surprise, Age::Kid, Race::Mongoloid));

        let result = group_profiles(&population).unwrap();

        let consumed: HashSet<ProfileId> = result.member_ids().into_iter().cloned().collect();
        for group_type in GroupType::PRIORITY {
            assert!(find_match(&population, &consumed, group_type.predicate()).is_none());
        }
        for group in &result.groups {
            let members: Vec<&Profile> = group.members.iter().collect();
            assert_eq!(classify(&members), Some(group.group_type));
        }
    }

    #[test]
    fn test_duplicate_ids_are_rejected_before_search() {
        let mut population = all_rounder("a");
        population.push(population[0].clone());

        assert!(matches!(
            group_profiles(&population),
            Err(GroupingError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_cancel_flag_aborts_with_partial_result() {
        let flag = Arc::new(AtomicBool::new(true));
        let engine = GroupingEngine::new().with_cancel_flag(flag);

        match engine.run(&all_rounder("a")) {
            Err(GroupingError::Aborted { partial }) => assert_eq!(partial.points, 0),
            other => panic!("expected Aborted, got {:?}", other),
        }
    }

    #[test]
    fn test_unset_cancel_flag_and_generous_deadline_run_to_completion() {
        let flag = Arc::new(AtomicBool::new(false));
        let engine = GroupingEngine::new()
            .with_cancel_flag(flag)
            .with_deadline(Duration::from_secs(60));

        let result = engine.run(&all_rounder("a")).unwrap();

        assert_eq!(result.points, 1);
    }

    #[test]
    fn test_zero_deadline_aborts() {
        let engine = GroupingEngine::new().with_deadline(Duration::ZERO);
        assert!(matches!(
            engine.run(&all_rounder("a")),
            Err(GroupingError::Aborted { .. })
        ));
    }
}
