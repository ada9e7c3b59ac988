use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Stable identifier of a profile. Used for consumption tracking, never for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Neutral,
    Happiness,
    Anger,
    Surprise,
    Fear,
    Sadness,
    Disgust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Age {
    Baby,
    Kid,
    Teenager,
    #[serde(rename = "20-30s", alias = "YoungAdult")]
    YoungAdult,
    #[serde(rename = "40-50s", alias = "MaturedAdult")]
    MaturedAdult,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Caucasian,
    Mongoloid,
    Negroid,
    Android,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happiness,
        Emotion::Anger,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Sadness,
        Emotion::Disgust,
    ];
}

impl Age {
    pub const ALL: [Age; 6] = [
        Age::Baby,
        Age::Kid,
        Age::Teenager,
        Age::YoungAdult,
        Age::MaturedAdult,
        Age::Senior,
    ];
}

impl Race {
    pub const ALL: [Race; 4] = [Race::Caucasian, Race::Mongoloid, Race::Negroid, Race::Android];
}

/// A labeled entity taking part in a grouping run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(alias = "file_name", alias = "uuid")]
    pub id: ProfileId,
    pub gender: Gender,
    pub emotion: Emotion,
    pub age: Age,
    pub race: Race,
    /// Bounding box carried through from the source data set; never read by matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl Profile {
    pub fn new(
        id: impl Into<String>,
        gender: Gender,
        emotion: Emotion,
        age: Age,
        race: Race,
    ) -> Self {
        Self {
            id: ProfileId::new(id),
            gender,
            emotion,
            age,
            race,
            bbox: None,
        }
    }

    pub fn with_bbox(mut self, bbox: Vec<f64>) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// Group classification, listed in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupType {
    #[serde(rename = "Balance Guardians")]
    BalanceGuardians,
    #[serde(rename = "Inside Out")]
    InsideOut,
    #[serde(rename = "The Incredibles")]
    TheIncredibles,
}

impl GroupType {
    /// Phase order of the grouping engine. Earlier entries win when a quadruple fits several.
    pub const PRIORITY: [GroupType; 3] = [
        GroupType::BalanceGuardians,
        GroupType::InsideOut,
        GroupType::TheIncredibles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GroupType::BalanceGuardians => "Balance Guardians",
            GroupType::InsideOut => "Inside Out",
            GroupType::TheIncredibles => "The Incredibles",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exactly four distinct profiles tagged with the type they were matched under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "group")]
    pub members: [Profile; 4],
    #[serde(rename = "type")]
    pub group_type: GroupType,
}

impl Group {
    pub fn ids(&self) -> impl Iterator<Item = &ProfileId> {
        self.members.iter().map(|p| &p.id)
    }
}

/// Output of one grouping run. `groups` keeps discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingResult {
    pub groups: Vec<Group>,
    pub points: usize,
}

impl GroupingResult {
    pub(crate) fn push(&mut self, group: Group) {
        self.groups.push(group);
        self.points += 1;
    }

    pub fn count_by_type(&self) -> BTreeMap<GroupType, usize> {
        let mut counts: BTreeMap<GroupType, usize> =
            GroupType::PRIORITY.iter().map(|t| (*t, 0)).collect();
        for group in &self.groups {
            *counts.entry(group.group_type).or_insert(0) += 1;
        }
        counts
    }

    pub fn member_ids(&self) -> HashSet<&ProfileId> {
        self.groups.iter().flat_map(|g| g.ids()).collect()
    }

    /// Profiles of `population` that ended up in no group, in population order.
    pub fn unmatched<'a>(&self, population: &'a [Profile]) -> Vec<&'a Profile> {
        let used = self.member_ids();
        population.iter().filter(|p| !used.contains(&p.id)).collect()
    }
}

/// Result of the cohort pre-filter: the two halves partition the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortSplit {
    pub major: Vec<Profile>,
    pub minor: Vec<Profile>,
}
