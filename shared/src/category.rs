use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Political leaning assigned to a state or territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoliticalCategory {
    SolidDem,
    LeanDem,
    Swing,
    LeanRep,
    SolidRep,
    IndependentTerritory,
}

impl PoliticalCategory {
    pub const ALL: [PoliticalCategory; 6] = [
        PoliticalCategory::SolidDem,
        PoliticalCategory::LeanDem,
        PoliticalCategory::Swing,
        PoliticalCategory::LeanRep,
        PoliticalCategory::SolidRep,
        PoliticalCategory::IndependentTerritory,
    ];

    /// Wire identifier, as stored in `political_status`.
    pub fn as_str(self) -> &'static str {
        match self {
            PoliticalCategory::SolidDem => "solid-dem",
            PoliticalCategory::LeanDem => "lean-dem",
            PoliticalCategory::Swing => "swing",
            PoliticalCategory::LeanRep => "lean-rep",
            PoliticalCategory::SolidRep => "solid-rep",
            PoliticalCategory::IndependentTerritory => "independent-territory",
        }
    }

    /// Human-readable label used by the legend and the state panel.
    pub fn label(self) -> &'static str {
        match self {
            PoliticalCategory::SolidDem => "Solid Democratic",
            PoliticalCategory::LeanDem => "Lean Democratic",
            PoliticalCategory::Swing => "Swing State",
            PoliticalCategory::LeanRep => "Lean Republican",
            PoliticalCategory::SolidRep => "Solid Republican",
            PoliticalCategory::IndependentTerritory => "Independent Territory",
        }
    }

    /// Badges for the saturated categories need light text to stay readable.
    pub fn wants_light_text(self) -> bool {
        matches!(
            self,
            PoliticalCategory::SolidDem
                | PoliticalCategory::SolidRep
                | PoliticalCategory::IndependentTerritory
        )
    }
}

impl fmt::Display for PoliticalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown political category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for PoliticalCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PoliticalCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_kebab_case_identifiers() {
        let json = serde_json::to_string(&PoliticalCategory::IndependentTerritory).unwrap();
        assert_eq!(json, "\"independent-territory\"");

        let parsed: PoliticalCategory = serde_json::from_str("\"lean-rep\"").unwrap();
        assert_eq!(parsed, PoliticalCategory::LeanRep);
    }

    #[test]
    fn from_str_matches_wire_identifiers() {
        for category in PoliticalCategory::ALL {
            assert_eq!(category.as_str().parse::<PoliticalCategory>(), Ok(category));
        }
        assert_eq!(" Swing ".parse::<PoliticalCategory>(), Ok(PoliticalCategory::Swing));
    }

    #[test]
    fn from_str_rejects_unknown_values() {
        assert!("toss-up".parse::<PoliticalCategory>().is_err());
        assert!("".parse::<PoliticalCategory>().is_err());
    }

    #[test]
    fn unknown_category_reports_the_raw_value() {
        let err: Box<dyn std::error::Error> = "Toss-Up".parse::<PoliticalCategory>().unwrap_err().into();
        assert_eq!(err.to_string(), "unknown political category: Toss-Up");
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = PoliticalCategory::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), PoliticalCategory::ALL.len());
    }
}
