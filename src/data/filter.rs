use std::collections::BTreeSet;

use super::model::{TenderRecord, TenderTable};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// What the user asked for: keywords to look for in titles and the countries
/// to keep. Passed explicitly into every pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Lowercase, trimmed, non-empty, de-duplicated, in input order.
    keywords: Vec<String>,
    countries: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<K, C>(keywords: K, countries: C) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !normalised.contains(&kw) {
                normalised.push(kw);
            }
        }
        Self {
            keywords: normalised,
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    /// Build criteria from the comma-separated keyword field of the UI.
    pub fn from_input<C>(keyword_input: &str, countries: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(keyword_input.split(','), countries)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }
}

/// Split a comma-separated keyword field into normalised keywords.
pub fn parse_keywords(input: &str) -> Vec<String> {
    FilterCriteria::new(input.split(','), Vec::<String>::new()).keywords
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Whether the record's country code is one of `countries`.
/// Missing codes never match.
pub fn matches_country(table: &TenderTable, record: &TenderRecord, countries: &BTreeSet<String>) -> bool {
    table
        .country_code(record)
        .is_some_and(|code| countries.contains(code))
}

/// Whether `title`, lowercased, contains any of the (lowercase) keywords.
pub fn matches_keywords(title: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    keywords.iter().any(|kw| title.contains(kw.as_str()))
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Keep the records whose country code is in the selected set.
pub fn filter_by_country(table: &TenderTable, countries: &BTreeSet<String>) -> TenderTable {
    let records = table
        .records
        .iter()
        .filter(|rec| matches_country(table, rec, countries))
        .cloned()
        .collect();
    table.with_records(records)
}

/// Keep the records whose title contains at least one keyword.
pub fn filter_by_keywords(table: &TenderTable, keywords: &[String]) -> TenderTable {
    let records = table
        .records
        .iter()
        .filter(|rec| matches_keywords(table.title(rec), keywords))
        .cloned()
        .collect();
    table.with_records(records)
}

/// Country filter followed by keyword filter. Source order is preserved.
pub fn apply(table: &TenderTable, criteria: &FilterCriteria) -> TenderTable {
    let by_country = filter_by_country(table, &criteria.countries);
    filter_by_keywords(&by_country, &criteria.keywords)
}
