//! Search, source filtering and ordering for the all-wards list.
//!
//! Stages run in a fixed order: search, then source filter, then a stable
//! sort over what survived. The input slice is never reordered.

mod collate;

pub use collate::locale_cmp;

use crate::domain::ward::WardRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFilter {
    #[default]
    All,
    Traffic,
    Industrial,
}

impl SourceFilter {
    /// Unrecognized values keep every record, same as `all`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim() {
            "traffic" => Self::Traffic,
            "industrial" => Self::Industrial,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Traffic => "traffic",
            Self::Industrial => "industrial",
        }
    }

    /// Ties on the two percentages match neither `traffic` nor `industrial`.
    pub fn keeps(self, ward: &WardRecord) -> bool {
        match self {
            Self::All => true,
            Self::Traffic => ward.vehicular_pct > ward.industrial_pct,
            Self::Industrial => ward.industrial_pct > ward.vehicular_pct,
        }
    }
}

impl fmt::Display for SourceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    AqiDesc,
    AqiAsc,
    /// Vehicular share, highest first.
    Traffic,
    /// Industrial share, highest first.
    Industrial,
    Name,
    /// Leave the filtered order untouched.
    Preserve,
}

impl SortKey {
    /// Unrecognized keys map to [`SortKey::Preserve`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim() {
            "aqi_desc" => Self::AqiDesc,
            "aqi_asc" => Self::AqiAsc,
            "traffic" => Self::Traffic,
            "industrial" => Self::Industrial,
            "name" => Self::Name,
            _ => Self::Preserve,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AqiDesc => "aqi_desc",
            Self::AqiAsc => "aqi_asc",
            Self::Traffic => "traffic",
            Self::Industrial => "industrial",
            Self::Name => "name",
            Self::Preserve => "preserve",
        }
    }

    pub fn compare(self, a: &WardRecord, b: &WardRecord) -> Ordering {
        match self {
            Self::AqiDesc => cmp_f64(b.avg_aqi, a.avg_aqi),
            Self::AqiAsc => cmp_f64(a.avg_aqi, b.avg_aqi),
            Self::Traffic => cmp_f64(b.vehicular_pct, a.vehicular_pct),
            Self::Industrial => cmp_f64(b.industrial_pct, a.industrial_pct),
            Self::Name => locale_cmp(&a.name, &b.name),
            Self::Preserve => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// NaN compares equal so it never moves a record.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// View state for the all-wards list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WardQuery {
    pub search: String,
    pub source: SourceFilter,
    pub sort: SortKey,
}

impl WardQuery {
    pub fn new(search: impl Into<String>, source: SourceFilter, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            source,
            sort,
        }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self
        }
    }

    pub fn with_source(self, source: SourceFilter) -> Self {
        Self { source, ..self }
    }

    pub fn with_sort(self, sort: SortKey) -> Self {
        Self { sort, ..self }
    }

    pub fn matches_search(&self, ward: &WardRecord) -> bool {
        self.search.is_empty() || ward.name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// Applies `query` to `wards` and returns the surviving records in display
/// order.
pub fn process<'a>(wards: &'a [WardRecord], query: &WardQuery) -> Vec<&'a WardRecord> {
    let mut out: Vec<&WardRecord> = wards
        .iter()
        .filter(|w| query.matches_search(w))
        .filter(|w| query.source.keeps(w))
        .collect();

    if query.sort != SortKey::Preserve {
        out.sort_by(|a, b| query.sort.compare(a, b));
    }

    tracing::debug!(
        input = wards.len(),
        output = out.len(),
        search = %query.search,
        source = %query.source,
        sort = %query.sort,
        "processed ward query"
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ward::ward;

    fn names(wards: &[&WardRecord]) -> Vec<String> {
        wards.iter().map(|w| w.name.clone()).collect()
    }

    fn fixture() -> Vec<WardRecord> {
        vec![
            ward("Rohini", 180.0, 60.0, 20.0),
            ward("Anand Vihar", 342.0, 80.0, 10.0),
            ward("Mundka", 251.0, 30.0, 70.0),
            ward("bawana", 251.0, 40.0, 40.0),
            ward("Okhla Phase II", 95.0, 20.0, 85.0),
        ]
    }

    #[test]
    fn industrial_filter_scenario() {
        let wards = vec![ward("A", 120.0, 60.0, 40.0), ward("B", 310.0, 30.0, 70.0)];
        let q = WardQuery::new("", SourceFilter::Industrial, SortKey::AqiDesc);
        assert_eq!(names(&process(&wards, &q)), vec!["B"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        let q = WardQuery::new("x", SourceFilter::All, SortKey::AqiDesc);
        assert!(process(&[], &q).is_empty());
    }

    #[test]
    fn empty_search_is_identity() {
        let wards = fixture();
        let q = WardQuery::default().with_sort(SortKey::Preserve);
        assert_eq!(process(&wards, &q).len(), wards.len());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let wards = fixture();
        let q = WardQuery::default().with_search("VIHAR");
        assert_eq!(names(&process(&wards, &q)), vec!["Anand Vihar"]);

        let q = WardQuery::default().with_search("ph");
        assert_eq!(names(&process(&wards, &q)), vec!["Okhla Phase II"]);
    }

    #[test]
    fn ties_are_dropped_by_both_source_filters() {
        let wards = vec![ward("Tie", 100.0, 50.0, 50.0)];
        for source in [SourceFilter::Traffic, SourceFilter::Industrial] {
            let q = WardQuery::default().with_source(source);
            assert!(process(&wards, &q).is_empty(), "{source} kept a tie");
        }
        assert_eq!(process(&wards, &WardQuery::default()).len(), 1);
    }

    #[test]
    fn aqi_desc_is_stable() {
        let wards = fixture();
        let out = process(&wards, &WardQuery::default());
        assert_eq!(
            names(&out),
            vec!["Anand Vihar", "Mundka", "bawana", "Rohini", "Okhla Phase II"]
        );
    }

    #[test]
    fn aqi_asc_keeps_ties_in_input_order() {
        let wards = fixture();
        let out = process(&wards, &WardQuery::default().with_sort(SortKey::AqiAsc));
        assert_eq!(
            names(&out),
            vec!["Okhla Phase II", "Rohini", "Mundka", "bawana", "Anand Vihar"]
        );
    }

    #[test]
    fn share_sorts_are_descending() {
        let wards = fixture();
        let out = process(&wards, &WardQuery::default().with_sort(SortKey::Traffic));
        assert_eq!(out[0].name, "Anand Vihar");
        let out = process(&wards, &WardQuery::default().with_sort(SortKey::Industrial));
        assert_eq!(out[0].name, "Okhla Phase II");
    }

    #[test]
    fn name_sort_ignores_case() {
        let wards = fixture();
        let out = process(&wards, &WardQuery::default().with_sort(SortKey::Name));
        assert_eq!(
            names(&out),
            vec!["Anand Vihar", "bawana", "Mundka", "Okhla Phase II", "Rohini"]
        );
    }

    #[test]
    fn name_sort_places_accented_names_with_their_letter() {
        let wards = vec![
            ward("Zakir Nagar", 100.0, 0.0, 0.0),
            ward("Éden Vihar", 100.0, 0.0, 0.0),
            ward("Dwarka", 100.0, 0.0, 0.0),
        ];
        let out = process(&wards, &WardQuery::default().with_sort(SortKey::Name));
        assert_eq!(names(&out), vec!["Dwarka", "Éden Vihar", "Zakir Nagar"]);
    }

    #[test]
    fn unknown_sort_key_preserves_order() {
        let wards = fixture();
        let q = WardQuery::default().with_sort(SortKey::parse_lenient("popularity"));
        assert_eq!(q.sort, SortKey::Preserve);
        let out = process(&wards, &q);
        let expected: Vec<String> = wards.iter().map(|w| w.name.clone()).collect();
        assert_eq!(names(&out), expected);
    }

    #[test]
    fn search_then_filter_then_sort() {
        let wards = fixture();
        let q = WardQuery::new("a", SourceFilter::Traffic, SortKey::AqiAsc);
        // "a" matches Anand Vihar, Mundka, bawana, Okhla Phase II; traffic keeps Anand Vihar.
        assert_eq!(names(&process(&wards, &q)), vec!["Anand Vihar"]);
    }

    #[test]
    fn input_is_not_reordered() {
        let wards = fixture();
        let before = wards.clone();
        let _ = process(&wards, &WardQuery::default().with_sort(SortKey::Name));
        assert_eq!(wards, before);
    }

    #[test]
    fn nan_aqi_does_not_move() {
        let wards = vec![ward("X", f64::NAN, 0.0, 0.0), ward("Y", 10.0, 0.0, 0.0)];
        let out = process(&wards, &WardQuery::default());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn lenient_filter_parse_defaults_to_all() {
        assert_eq!(SourceFilter::parse_lenient("traffic"), SourceFilter::Traffic);
        assert_eq!(SourceFilter::parse_lenient("construction"), SourceFilter::All);
        assert_eq!(SortKey::parse_lenient("name"), SortKey::Name);
    }
}
