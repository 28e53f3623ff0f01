use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::TenderTable;

// ---------------------------------------------------------------------------
// Permissive date parsing
// ---------------------------------------------------------------------------

const YEAR_FIRST_DATETIME: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const YEAR_FIRST_DATE: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const DAY_FIRST_DATETIME: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

// `%y` must come first: `%Y` accepts any number of digits and would read
// `16/01/24` as the year 24.
const DAY_FIRST_DATE: &[&str] = &[
    "%d/%m/%y", "%d.%m.%y", "%d-%m-%y", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y",
];

/// Parse a publication date in any of the formats seen in TED exports.
///
/// Year-first patterns are only tried when the leading digit group has four
/// digits; anything else is read day-first.
///
/// Returns `None` when nothing matches; the caller treats that row as undated.
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s[..4].parse().ok()?;
        let month = s[4..6].parse().ok()?;
        let day = s[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let leading_digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let (datetime_formats, date_formats) = if leading_digits == 4 {
        (YEAR_FIRST_DATETIME, YEAR_FIRST_DATE)
    } else {
        (DAY_FIRST_DATETIME, DAY_FIRST_DATE)
    };

    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

// ---------------------------------------------------------------------------
// YearMonth
// ---------------------------------------------------------------------------

/// A calendar month; the day of a publication date is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// MonthlyAggregate – month × country count matrix
// ---------------------------------------------------------------------------

/// Row counts of a table grouped by publication month and country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyAggregate {
    /// Distinct months, chronological.
    pub months: Vec<YearMonth>,
    /// Distinct country codes, sorted.
    pub countries: Vec<String>,
    /// `counts[month_idx][country_idx]`, zero-filled.
    counts: Vec<Vec<usize>>,
    /// Rows left out because their date did not parse.
    pub undated: usize,
}

impl MonthlyAggregate {
    pub fn count(&self, month: YearMonth, country: &str) -> usize {
        let Ok(m) = self.months.binary_search(&month) else {
            return 0;
        };
        let Ok(c) = self.countries.binary_search_by(|probe| probe.as_str().cmp(country)) else {
            return 0;
        };
        self.counts[m][c]
    }

    /// Counts for the `idx`-th month, one per entry of `countries`.
    pub fn row(&self, idx: usize) -> &[usize] {
        &self.counts[idx]
    }

    /// Counts for one country across all months.
    pub fn series(&self, country_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.counts.iter().map(move |row| row[country_idx])
    }

    /// Sum of all cells.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Group the table's rows by (publication month, country code).
///
/// Rows with an unparseable date or no country code are counted in
/// [`MonthlyAggregate::undated`] and otherwise ignored.
pub fn monthly_counts(table: &TenderTable) -> MonthlyAggregate {
    let mut groups: BTreeMap<(YearMonth, &str), usize> = BTreeMap::new();
    let mut undated = 0;

    for record in &table.records {
        let month = table
            .publication_date(record)
            .and_then(parse_publication_date)
            .map(YearMonth::from);
        match (month, table.country_code(record)) {
            (Some(month), Some(country)) => *groups.entry((month, country)).or_default() += 1,
            _ => undated += 1,
        }
    }

    let months: Vec<YearMonth> = groups
        .keys()
        .map(|(m, _)| *m)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let countries: Vec<String> = groups
        .keys()
        .map(|(_, c)| *c)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut counts = vec![vec![0; countries.len()]; months.len()];
    for ((month, country), n) in &groups {
        // Both searches succeed: the axes were built from these keys.
        if let (Ok(m), Ok(c)) = (
            months.binary_search(month),
            countries.binary_search_by(|probe| probe.as_str().cmp(country)),
        ) {
            counts[m][c] = *n;
        }
    }

    if undated > 0 {
        log::warn!("{undated} row(s) have no usable publication date and are left out of the chart");
    }

    MonthlyAggregate {
        months,
        countries,
        counts,
        undated,
    }
}
