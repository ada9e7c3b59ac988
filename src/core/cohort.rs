use crate::domain::model::{Age, CohortSplit, Emotion, Profile};
use serde::{Deserialize, Serialize};

/// Attributes that put a profile into the major cohort. Both lists must match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortCriteria {
    pub ages: Vec<Age>,
    pub emotions: Vec<Emotion>,
}

impl Default for CohortCriteria {
    fn default() -> Self {
        Self {
            ages: vec![Age::YoungAdult],
            emotions: vec![Emotion::Happiness, Emotion::Neutral],
        }
    }
}

impl CohortCriteria {
    pub fn is_major(&self, profile: &Profile) -> bool {
        self.ages.contains(&profile.age) && self.emotions.contains(&profile.emotion)
    }
}

/// Splits the population into the major cohort and everyone else, keeping input order.
pub fn split_cohorts(population: &[Profile], criteria: &CohortCriteria) -> CohortSplit {
    let (major, minor): (Vec<Profile>, Vec<Profile>) = population
        .iter()
        .cloned()
        .partition(|p| criteria.is_major(p));

    tracing::info!("Cohort split: {} major, {} minor", major.len(), minor.len());
    CohortSplit { major, minor }
}
