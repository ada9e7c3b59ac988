use crate::core::grouping::GroupingEngine;
use crate::core::population::parse_population;
use crate::core::{ConfigProvider, GroupingOutcome, Pipeline, Profile, Storage};
use crate::domain::model::{Age, Emotion, Gender, GroupingResult, Race};
use crate::utils::error::{GroupingError, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub const RESULT_JSON: &str = "combination.json";
pub const RESULT_CSV: &str = "combination.csv";
pub const UNMATCHED_JSON: &str = "unmatched.json";
pub const PARTIAL_JSON: &str = "combination.partial.json";

/// Reads a population file, groups it, and writes the result files.
pub struct GroupingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: Storage, C: ConfigProvider> GroupingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn engine(&self) -> GroupingEngine {
        let mut engine = GroupingEngine::new();
        if let Some(limit) = self.config.timeout() {
            engine = engine.with_deadline(limit);
        }
        if let Some(flag) = &self.cancel {
            engine = engine.with_cancel_flag(flag.clone());
        }
        engine
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    group_index: usize,
    group_type: &'a str,
    id: &'a str,
    gender: Gender,
    emotion: Emotion,
    age: Age,
    race: Race,
}

/// One row per group member, groups numbered from 1 in discovery order.
pub fn result_to_csv(result: &GroupingResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (index, group) in result.groups.iter().enumerate() {
        for member in &group.members {
            writer.serialize(CsvRow {
                group_index: index + 1,
                group_type: group.group_type.label(),
                id: member.id.as_str(),
                gender: member.gender,
                emotion: member.emotion,
                age: member.age,
                race: member.race,
            })?;
        }
    }
    writer
        .into_inner()
        .map_err(|e| GroupingError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GroupingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Profile>> {
        tracing::debug!("Reading population from: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path()).await?;
        parse_population(&bytes)
    }

    async fn transform(&self, population: Vec<Profile>) -> Result<GroupingOutcome> {
        let engine = self.engine();
        let (population, result) = tokio::task::spawn_blocking(move || {
            let result = engine.run(&population);
            (population, result)
        })
        .await?;
        let result = result?;

        for (group_type, count) in result.count_by_type() {
            tracing::info!("  {}: {}", group_type, count);
        }
        tracing::info!("Total points: {}", result.points);

        Ok(GroupingOutcome { population, result })
    }

    async fn load(&self, outcome: GroupingOutcome) -> Result<String> {
        let json_path = self.output_file(RESULT_JSON);

        if self.wants("json") {
            let json_data = serde_json::to_vec_pretty(&outcome.result)?;
            tracing::debug!("Writing {} ({} bytes)", json_path, json_data.len());
            self.storage.write_file(&json_path, &json_data).await?;
        }

        if self.wants("csv") {
            let csv_path = self.output_file(RESULT_CSV);
            let csv_data = result_to_csv(&outcome.result)?;
            tracing::debug!("Writing {} ({} bytes)", csv_path, csv_data.len());
            self.storage.write_file(&csv_path, &csv_data).await?;
        }

        if self.config.write_unmatched() {
            let rest = outcome.result.unmatched(&outcome.population);
            let path = self.output_file(UNMATCHED_JSON);
            tracing::debug!("Writing {} unmatched profiles to {}", rest.len(), path);
            self.storage
                .write_file(&path, &serde_json::to_vec_pretty(&rest)?)
                .await?;
        }

        if self.wants("json") {
            Ok(json_path)
        } else {
            Ok(self.config.output_path().to_string())
        }
    }
}
