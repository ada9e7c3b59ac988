pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::app::pipelines::GroupingPipeline;
pub use crate::core::grouping::{group_profiles, GroupingEngine};
pub use crate::core::{etl::EtlEngine, matcher::find_match};
pub use crate::domain::model::{
    Age, Emotion, Gender, Group, GroupType, GroupingResult, Profile, ProfileId, Race,
};
pub use crate::utils::error::{GroupingError, Result};
