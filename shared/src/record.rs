use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::category::PoliticalCategory;

/// Display attributes of one state or territory. `name` is the unique key and
/// matches the `name` property of the boundary feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    pub abbreviation: String,
    pub political_status: Option<PoliticalCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Square kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// US dollars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governor_party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electoral_votes: Option<u32>,
}

impl StateRecord {
    /// Record with only a name. Used when a fetched entry has no static
    /// counterpart.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: String::new(),
            political_status: None,
            capital: None,
            population: None,
            area: None,
            gdp: None,
            gdp_per_capita: None,
            gdp_rank: None,
            governor_name: None,
            governor_party: None,
            electoral_votes: None,
        }
    }

    /// Overlay every field present in `patch`. Fields the patch leaves out keep
    /// their current value. An unparseable `political_status` is ignored and
    /// reported through the return value.
    pub fn apply(&mut self, patch: &StateRecordPatch) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();

        if let Some(abbreviation) = patch.abbreviation.as_deref().map(str::trim)
            && !abbreviation.is_empty()
        {
            self.abbreviation = abbreviation.to_ascii_uppercase();
        }
        if let Some(raw) = patch.political_status.as_deref() {
            match raw.parse::<PoliticalCategory>() {
                Ok(category) => self.political_status = Some(category),
                Err(_) => outcome.rejected_category = Some(raw.to_string()),
            }
        }

        overlay(&mut self.capital, &patch.capital);
        overlay(&mut self.population, &patch.population);
        overlay(&mut self.area, &patch.area);
        overlay(&mut self.gdp, &patch.gdp);
        overlay(&mut self.gdp_per_capita, &patch.gdp_per_capita);
        overlay(&mut self.gdp_rank, &patch.gdp_rank);
        overlay(&mut self.governor_name, &patch.governor_name);
        overlay(&mut self.governor_party, &patch.governor_party);
        overlay(&mut self.electoral_votes, &patch.electoral_votes);

        outcome
    }
}

fn overlay<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if let Some(value) = source {
        *target = Some(value.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub rejected_category: Option<String>,
}

/// Whole count from any JSON number: `39538223`, `39538223.0`. Negative,
/// non-finite and non-numeric values read as absent.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_of))
}

fn lenient_small_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(count_of)
        .and_then(|n| u32::try_from(n).ok()))
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite()))
}

fn count_of(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u64::MAX as f64)
        .map(|n| n.round() as u64)
}

/// A state entry as it arrives from `/data/states.json`. Every field except the
/// name may be missing. The category is kept as raw text and numeric fields
/// that cannot be read are dropped, so one bad value cannot fail the whole
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateRecordPatch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub political_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_count")]
    pub population: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_amount")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_amount")]
    pub gdp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_amount")]
    pub gdp_per_capita: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_small_count")]
    pub gdp_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governor_party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_small_count")]
    pub electoral_votes: Option<u32>,
}

impl From<&StateRecord> for StateRecordPatch {
    fn from(record: &StateRecord) -> Self {
        Self {
            name: record.name.clone(),
            abbreviation: Some(record.abbreviation.clone()).filter(|a| !a.is_empty()),
            political_status: record.political_status.map(|c| c.as_str().to_string()),
            capital: record.capital.clone(),
            population: record.population,
            area: record.area,
            gdp: record.gdp,
            gdp_per_capita: record.gdp_per_capita,
            gdp_rank: record.gdp_rank,
            governor_name: record.governor_name.clone(),
            governor_party: record.governor_party.clone(),
            electoral_votes: record.electoral_votes,
        }
    }
}

/// `/data/states.json` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatesSummary {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
    #[serde(default)]
    pub states: Vec<StateRecordPatch>,
}
