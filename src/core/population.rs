use crate::domain::model::{Profile, ProfileId};
use crate::utils::error::{GroupingError, Result};
use std::collections::HashMap;

/// Parses a JSON array of profiles. Unknown enumeration values and missing
/// fields fail the whole load, reported with the offending position.
pub fn parse_population(bytes: &[u8]) -> Result<Vec<Profile>> {
    let raw: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    let population = raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<Profile>(value).map_err(|e| GroupingError::InvalidRecord {
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_unique_ids(&population)?;
    Ok(population)
}

/// Fails on the first id seen twice.
pub fn ensure_unique_ids(population: &[Profile]) -> Result<()> {
    let mut seen: HashMap<&ProfileId, usize> = HashMap::with_capacity(population.len());
    for (index, profile) in population.iter().enumerate() {
        if profile.id.as_str().trim().is_empty() {
            return Err(GroupingError::InvalidRecord {
                index,
                reason: "id cannot be empty".to_string(),
            });
        }
        if let Some(first) = seen.insert(&profile.id, index) {
            return Err(GroupingError::DuplicateId {
                id: profile.id.clone(),
                first,
                second: index,
            });
        }
    }
    Ok(())
}
