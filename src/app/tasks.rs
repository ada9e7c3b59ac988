use crate::core::cohort::{split_cohorts, CohortCriteria};
use crate::core::generator::generate_population;
use crate::core::population::parse_population;
use crate::core::Storage;
use crate::domain::model::CohortSplit;
use crate::utils::error::Result;
use std::path::Path;

pub const MAJOR_JSON: &str = "major_input.json";
pub const MINOR_JSON: &str = "minor_input.json";

/// Reads `input`, splits it by `criteria`, writes both cohorts under `output_dir`.
pub async fn split_file<S: Storage>(
    storage: &S,
    input: &str,
    output_dir: &str,
    criteria: &CohortCriteria,
) -> Result<CohortSplit> {
    let population = parse_population(&storage.read_file(input).await?)?;
    let split = split_cohorts(&population, criteria);

    for (name, profiles) in [(MAJOR_JSON, &split.major), (MINOR_JSON, &split.minor)] {
        let path = Path::new(output_dir).join(name).to_string_lossy().into_owned();
        storage
            .write_file(&path, &serde_json::to_vec_pretty(profiles)?)
            .await?;
        tracing::info!("📁 {} profiles written to {}", profiles.len(), path);
    }

    Ok(split)
}

/// Writes a seeded synthetic population to `output`.
pub async fn generate_file<S: Storage>(
    storage: &S,
    count: usize,
    seed: u64,
    output: &str,
) -> Result<usize> {
    let population = generate_population(count, seed);
    storage
        .write_file(output, &serde_json::to_vec_pretty(&population)?)
        .await?;
    tracing::info!("📁 {} synthetic profiles (seed {}) written to {}", count, seed, output);
    Ok(population.len())
}
