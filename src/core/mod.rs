pub mod cohort;
pub mod etl;
pub mod generator;
pub mod grouping;
pub mod matcher;
pub mod population;
pub mod predicates;

pub use crate::domain::model::{Group, GroupType, GroupingResult, Profile, ProfileId};
pub use crate::domain::ports::{ConfigProvider, GroupingOutcome, Pipeline, Storage};
pub use crate::utils::error::Result;
