use std::fmt;

// ---------------------------------------------------------------------------
// TableLayout – how to find and read the tabular entry
// ---------------------------------------------------------------------------

/// Names and delimiters agreed with the upstream data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Suffix identifying the tabular entry inside the archive (`.csv`).
    pub entry_suffix: String,
    /// Field delimiter of the source table.
    pub delimiter: u8,
    pub country_column: String,
    pub title_column: String,
    pub date_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            entry_suffix: ".csv".into(),
            delimiter: b';',
            country_column: "ISO_COUNTRY_CODE".into(),
            title_column: "TITLE".into(),
            date_column: "DATE_PUBLICATION".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RequiredColumns – resolved header positions
// ---------------------------------------------------------------------------

/// Positions of the columns the pipeline reads, resolved once at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub country: usize,
    pub title: usize,
    pub date: usize,
}

impl RequiredColumns {
    /// Resolve the layout's column names against a header row.
    ///
    /// Returns the names that could not be found when any is missing.
    pub fn resolve(headers: &[String], layout: &TableLayout) -> Result<Self, Vec<String>> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let country = find(&layout.country_column);
        let title = find(&layout.title_column);
        let date = find(&layout.date_column);

        match (country, title, date) {
            (Some(country), Some(title), Some(date)) => Ok(Self { country, title, date }),
            _ => {
                let missing = [
                    (country, &layout.country_column),
                    (title, &layout.title_column),
                    (date, &layout.date_column),
                ]
                .into_iter()
                .filter(|(idx, _)| idx.is_none())
                .map(|(_, name)| name.clone())
                .collect();
                Err(missing)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TenderRecord – one row of the export
// ---------------------------------------------------------------------------

/// A single tender notice (one row of the source table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderRecord {
    /// 1-based line of the record in the source file (header is line 1).
    pub line: usize,
    /// Every cell, as text, padded or truncated to the header width.
    pub cells: Vec<String>,
}

impl TenderRecord {
    /// Cell at `idx`; empty cells are treated as missing.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells
            .get(idx)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// ParseStats
// ---------------------------------------------------------------------------

/// Rows the permissive parser had to drop or reshape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub skipped: usize,
    pub coerced: usize,
}

// ---------------------------------------------------------------------------
// TenderTable – the parsed (or filtered) table
// ---------------------------------------------------------------------------

/// Header plus records in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderTable {
    pub headers: Vec<String>,
    pub columns: RequiredColumns,
    pub records: Vec<TenderRecord>,
    pub stats: ParseStats,
}

impl TenderTable {
    pub fn new(headers: Vec<String>, columns: RequiredColumns, records: Vec<TenderRecord>) -> Self {
        Self {
            headers,
            columns,
            records,
            stats: ParseStats::default(),
        }
    }

    /// A table with the same header and a different set of records.
    pub fn with_records(&self, records: Vec<TenderRecord>) -> Self {
        Self {
            headers: self.headers.clone(),
            columns: self.columns,
            records,
            stats: self.stats,
        }
    }

    pub fn country_code<'a>(&self, record: &'a TenderRecord) -> Option<&'a str> {
        record.cell(self.columns.country)
    }

    /// Title of the record, empty when missing.
    pub fn title<'a>(&self, record: &'a TenderRecord) -> &'a str {
        record.cell(self.columns.title).unwrap_or("")
    }

    pub fn publication_date<'a>(&self, record: &'a TenderRecord) -> Option<&'a str> {
        record.cell(self.columns.date)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for TenderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows × {} columns", self.records.len(), self.headers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_columns_in_any_order() {
        let cols = RequiredColumns::resolve(
            &headers(&["ID", "DATE_PUBLICATION", "TITLE", "ISO_COUNTRY_CODE"]),
            &TableLayout::default(),
        )
        .unwrap();
        assert_eq!(cols, RequiredColumns { country: 3, title: 2, date: 1 });
    }

    #[test]
    fn reports_all_missing_columns() {
        let missing = RequiredColumns::resolve(&headers(&["ID", "TITLE"]), &TableLayout::default())
            .unwrap_err();
        assert_eq!(missing, vec!["ISO_COUNTRY_CODE", "DATE_PUBLICATION"]);
    }

    #[test]
    fn empty_cells_read_as_missing() {
        let table = TenderTable::new(
            headers(&["ISO_COUNTRY_CODE", "TITLE", "DATE_PUBLICATION"]),
            RequiredColumns { country: 0, title: 1, date: 2 },
            vec![TenderRecord { line: 2, cells: vec!["".into(), "".into(), "".into()] }],
        );
        let rec = &table.records[0];
        assert_eq!(table.country_code(rec), None);
        assert_eq!(table.title(rec), "");
        assert_eq!(table.publication_date(rec), None);
    }
}
