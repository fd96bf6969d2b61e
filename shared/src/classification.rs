use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::category::PoliticalCategory;
use crate::category::PoliticalCategory::*;
use crate::error::LookupError;
use crate::record::{StateRecord, StateRecordPatch};
use crate::route::state_slug;

/// (name, abbreviation, category, electoral votes, 2020 population, capital)
type BuiltinRow = (
    &'static str,
    &'static str,
    PoliticalCategory,
    Option<u32>,
    u64,
    &'static str,
);

const BUILTIN: &[BuiltinRow] = &[
    ("Alabama", "AL", SolidRep, Some(9), 5_024_279, "Montgomery"),
    ("Alaska", "AK", SolidRep, Some(3), 733_391, "Juneau"),
    ("Arizona", "AZ", Swing, Some(11), 7_151_502, "Phoenix"),
    ("Arkansas", "AR", SolidRep, Some(6), 3_011_524, "Little Rock"),
    ("California", "CA", SolidDem, Some(54), 39_538_223, "Sacramento"),
    ("Colorado", "CO", LeanDem, Some(10), 5_773_714, "Denver"),
    ("Connecticut", "CT", SolidDem, Some(7), 3_605_944, "Hartford"),
    ("Delaware", "DE", SolidDem, Some(3), 989_948, "Dover"),
    ("Florida", "FL", LeanRep, Some(30), 21_538_187, "Tallahassee"),
    ("Georgia", "GA", Swing, Some(16), 10_711_908, "Atlanta"),
    ("Hawaii", "HI", SolidDem, Some(4), 1_455_271, "Honolulu"),
    ("Idaho", "ID", SolidRep, Some(4), 1_839_106, "Boise"),
    ("Illinois", "IL", SolidDem, Some(19), 12_801_989, "Springfield"),
    ("Indiana", "IN", SolidRep, Some(11), 6_785_528, "Indianapolis"),
    ("Iowa", "IA", LeanRep, Some(6), 3_190_369, "Des Moines"),
    ("Kansas", "KS", SolidRep, Some(6), 2_937_880, "Topeka"),
    ("Kentucky", "KY", SolidRep, Some(8), 4_505_836, "Frankfort"),
    ("Louisiana", "LA", SolidRep, Some(8), 4_657_757, "Baton Rouge"),
    ("Maine", "ME", SolidDem, Some(4), 1_362_359, "Augusta"),
    ("Maryland", "MD", SolidDem, Some(10), 6_177_224, "Annapolis"),
    ("Massachusetts", "MA", SolidDem, Some(11), 7_029_917, "Boston"),
    ("Michigan", "MI", Swing, Some(15), 10_077_331, "Lansing"),
    ("Minnesota", "MN", LeanDem, Some(10), 5_706_494, "Saint Paul"),
    ("Mississippi", "MS", SolidRep, Some(6), 2_961_279, "Jackson"),
    ("Missouri", "MO", SolidRep, Some(10), 6_154_913, "Jefferson City"),
    ("Montana", "MT", SolidRep, Some(4), 1_084_225, "Helena"),
    ("Nebraska", "NE", SolidRep, Some(5), 1_961_504, "Lincoln"),
    ("Nevada", "NV", Swing, Some(6), 3_104_614, "Carson City"),
    ("New Hampshire", "NH", LeanDem, Some(4), 1_377_529, "Concord"),
    ("New Jersey", "NJ", SolidDem, Some(14), 9_288_994, "Trenton"),
    ("New Mexico", "NM", LeanDem, Some(5), 2_117_522, "Santa Fe"),
    ("New York", "NY", SolidDem, Some(28), 20_201_249, "Albany"),
    ("North Carolina", "NC", Swing, Some(16), 10_439_388, "Raleigh"),
    ("North Dakota", "ND", SolidRep, Some(3), 779_094, "Bismarck"),
    ("Ohio", "OH", LeanRep, Some(17), 11_799_448, "Columbus"),
    ("Oklahoma", "OK", SolidRep, Some(7), 3_959_353, "Oklahoma City"),
    ("Oregon", "OR", LeanDem, Some(8), 4_237_256, "Salem"),
    ("Pennsylvania", "PA", Swing, Some(19), 13_002_700, "Harrisburg"),
    ("Puerto Rico", "PR", IndependentTerritory, None, 3_285_874, "San Juan"),
    ("Rhode Island", "RI", SolidDem, Some(4), 1_097_379, "Providence"),
    ("South Carolina", "SC", SolidRep, Some(9), 5_118_425, "Columbia"),
    ("South Dakota", "SD", SolidRep, Some(3), 886_667, "Pierre"),
    ("Tennessee", "TN", SolidRep, Some(11), 6_910_840, "Nashville"),
    ("Texas", "TX", LeanRep, Some(40), 29_145_505, "Austin"),
    ("Utah", "UT", SolidRep, Some(6), 3_271_616, "Salt Lake City"),
    ("Vermont", "VT", SolidDem, Some(3), 643_077, "Montpelier"),
    ("Virginia", "VA", LeanDem, Some(13), 8_631_393, "Richmond"),
    ("Washington", "WA", SolidDem, Some(12), 7_705_281, "Olympia"),
    ("West Virginia", "WV", SolidRep, Some(4), 1_793_716, "Charleston"),
    ("Wisconsin", "WI", Swing, Some(10), 5_893_718, "Madison"),
    ("Wyoming", "WY", SolidRep, Some(3), 576_851, "Cheyenne"),
];

/// Governor party for the largest states, as single-letter codes.
const BUILTIN_GOVERNOR_PARTY: &[(&str, &str)] = &[
    ("California", "D"),
    ("Texas", "R"),
    ("Florida", "R"),
    ("New York", "D"),
    ("Illinois", "D"),
    ("Pennsylvania", "D"),
    ("Ohio", "R"),
    ("Georgia", "R"),
    ("Michigan", "D"),
    ("North Carolina", "D"),
];

/// What happened while overlaying fetched records on the builtin table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub updated: usize,
    pub added: usize,
    /// Names that appeared more than once in the fetched data. The last
    /// occurrence wins.
    pub duplicates: Vec<String>,
    /// `(name, raw value)` pairs whose category did not parse.
    pub rejected_categories: Vec<(String, String)>,
    /// Entries skipped because their name was blank.
    pub skipped_unnamed: usize,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
            && self.rejected_categories.is_empty()
            && self.skipped_unnamed == 0
    }
}

/// Immutable name to [`StateRecord`] mapping. Built once, then shared by
/// reference; there are no mutating methods after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTable {
    records: BTreeMap<String, StateRecord>,
}

impl ClassificationTable {
    /// The compiled-in table: fifty states plus Puerto Rico.
    pub fn builtin() -> Self {
        let mut records = BTreeMap::new();
        for &(name, abbreviation, category, electoral_votes, population, capital) in BUILTIN {
            let mut record = StateRecord::named(name);
            record.abbreviation = abbreviation.to_string();
            record.political_status = Some(category);
            record.electoral_votes = electoral_votes;
            record.population = Some(population);
            record.capital = Some(capital.to_string());
            records.insert(name.to_string(), record);
        }
        for &(name, party) in BUILTIN_GOVERNOR_PARTY {
            if let Some(record) = records.get_mut(name) {
                record.governor_party = Some(party.to_string());
            }
        }
        Self { records }
    }

    /// Overlay fetched records on this table, consuming it. Fetched values win
    /// field by field; fields absent from the fetch keep their current value.
    pub fn merged_with(mut self, fetched: &[StateRecordPatch]) -> (Self, MergeReport) {
        let mut report = MergeReport::default();
        let mut seen = HashSet::new();

        for patch in fetched {
            let name = patch.name.trim();
            if name.is_empty() {
                report.skipped_unnamed += 1;
                continue;
            }
            if !seen.insert(name.to_string()) && !report.duplicates.iter().any(|d| d == name) {
                report.duplicates.push(name.to_string());
            }

            if self.records.contains_key(name) {
                report.updated += 1;
            } else {
                report.added += 1;
            }
            let record = self
                .records
                .entry(name.to_string())
                .or_insert_with(|| StateRecord::named(name));
            let outcome = record.apply(patch);
            if let Some(raw) = outcome.rejected_category {
                report.rejected_categories.push((name.to_string(), raw));
            }
        }

        (self, report)
    }

    pub fn lookup(&self, name: &str) -> Result<&StateRecord, LookupError> {
        self.records
            .get(name)
            .or_else(|| self.records.get(name.trim()))
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    /// Category for a name, `None` when the name is unknown or has no category.
    pub fn category_of(&self, name: &str) -> Option<PoliticalCategory> {
        self.lookup(name).ok().and_then(|r| r.political_status)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&StateRecord> {
        self.records.values().find(|r| state_slug(&r.name) == slug)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_states_and_puerto_rico() {
        let table = ClassificationTable::builtin();
        assert_eq!(table.len(), 51);
        assert_eq!(
            table.category_of("Puerto Rico"),
            Some(PoliticalCategory::IndependentTerritory)
        );
        assert_eq!(table.category_of("California"), Some(PoliticalCategory::SolidDem));
        assert_eq!(table.lookup("Texas").unwrap().electoral_votes, Some(40));
        assert_eq!(table.lookup("Texas").unwrap().governor_party.as_deref(), Some("R"));
    }

    #[test]
    fn builtin_rows_have_unique_names_and_abbreviations() {
        let names: HashSet<_> = BUILTIN.iter().map(|row| row.0).collect();
        let abbreviations: HashSet<_> = BUILTIN.iter().map(|row| row.1).collect();
        assert_eq!(names.len(), BUILTIN.len());
        assert_eq!(abbreviations.len(), BUILTIN.len());
    }

    #[test]
    fn builtin_electoral_votes_total_535() {
        let total: u32 = BUILTIN.iter().filter_map(|row| row.3).sum();
        // 535 for the states; the District of Columbia holds the other 3.
        assert_eq!(total, 535);
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let table = ClassificationTable::builtin();
        assert_eq!(
            table.lookup("Atlantis"),
            Err(LookupError::NotFound("Atlantis".into()))
        );
        assert_eq!(table.category_of("Atlantis"), None);
    }

    #[test]
    fn fetched_values_override_static_per_field() {
        let fetched = vec![StateRecordPatch {
            name: "Ohio".into(),
            political_status: Some("solid-rep".into()),
            gdp: Some(8.2e11),
            gdp_rank: Some(7),
            governor_name: Some("Mike DeWine".into()),
            ..Default::default()
        }];
        let (table, report) = ClassificationTable::builtin().merged_with(&fetched);

        let ohio = table.lookup("Ohio").unwrap();
        assert_eq!(ohio.political_status, Some(PoliticalCategory::SolidRep));
        assert_eq!(ohio.gdp_rank, Some(7));
        assert_eq!(ohio.governor_name.as_deref(), Some("Mike DeWine"));
        assert_eq!(ohio.population, Some(11_799_448));
        assert_eq!(ohio.electoral_votes, Some(17));
        assert_eq!(report.updated, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn fetched_only_names_are_added() {
        let fetched = vec![StateRecordPatch {
            name: "Guam".into(),
            abbreviation: Some("gu".into()),
            political_status: Some("independent-territory".into()),
            ..Default::default()
        }];
        let (table, report) = ClassificationTable::builtin().merged_with(&fetched);
        assert_eq!(report.added, 1);
        assert_eq!(table.lookup("Guam").unwrap().abbreviation, "GU");
        assert_eq!(table.len(), 52);
    }

    #[test]
    fn duplicates_resolve_to_one_record_and_are_reported() {
        let fetched = vec![
            StateRecordPatch {
                name: "Iowa".into(),
                gdp_rank: Some(30),
                ..Default::default()
            },
            StateRecordPatch {
                name: "Iowa".into(),
                gdp_rank: Some(31),
                ..Default::default()
            },
            StateRecordPatch {
                name: "   ".into(),
                ..Default::default()
            },
        ];
        let (table, report) = ClassificationTable::builtin().merged_with(&fetched);
        assert_eq!(table.names().filter(|n| *n == "Iowa").count(), 1);
        assert_eq!(table.lookup("Iowa").unwrap().gdp_rank, Some(31));
        assert_eq!(report.duplicates, vec!["Iowa".to_string()]);
        assert_eq!(report.skipped_unnamed, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn find_by_slug_resolves_multi_word_names() {
        let table = ClassificationTable::builtin();
        assert_eq!(
            table.find_by_slug("north-carolina").map(|r| r.name.as_str()),
            Some("North Carolina")
        );
        assert!(table.find_by_slug("north carolina").is_none());
    }
}
