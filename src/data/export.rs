use std::path::Path;

use super::error::{PipelineError, PipelineResult};
use super::model::TenderTable;

/// MIME type of the exported file.
pub const EXPORT_MIME: &str = "text/csv";

/// Serialise a table (header + records, all columns) to delimited UTF-8.
///
/// An empty table still yields its header line.
pub fn to_delimited(table: &TenderTable, delimiter: u8) -> PipelineResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for record in &table.records {
        writer.write_record(&record.cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Export(e.into_error().into()))
}

/// Write export bytes to disk.
pub fn save(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;
    use crate::data::model::{RequiredColumns, TableLayout, TenderRecord};

    fn sample() -> TenderTable {
        TenderTable::new(
            vec!["ISO_COUNTRY_CODE".into(), "TITLE".into(), "DATE_PUBLICATION".into()],
            RequiredColumns { country: 0, title: 1, date: 2 },
            vec![
                TenderRecord {
                    line: 2,
                    cells: vec!["DE".into(), "Air, water; soil".into(), "2023-01-15".into()],
                },
                TenderRecord {
                    line: 5,
                    cells: vec!["PL".into(), "Say \"noise\"".into(), "".into()],
                },
            ],
        )
    }

    #[test]
    fn writes_header_and_rows_with_quoting() {
        let bytes = to_delimited(&sample(), b',').unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "ISO_COUNTRY_CODE,TITLE,DATE_PUBLICATION\n\
             DE,\"Air, water; soil\",2023-01-15\n\
             PL,\"Say \"\"noise\"\"\",\n"
        );
    }

    #[test]
    fn empty_table_exports_header_only() {
        let empty = sample().with_records(Vec::new());
        let bytes = to_delimited(&empty, b';').unwrap();
        assert_eq!(bytes, b"ISO_COUNTRY_CODE;TITLE;DATE_PUBLICATION\n");
    }

    #[test]
    fn reparsing_the_export_gives_the_same_content() {
        let table = sample();
        for delimiter in [b',', b';'] {
            let bytes = to_delimited(&table, delimiter).unwrap();
            let layout = TableLayout {
                delimiter,
                ..TableLayout::default()
            };
            let back = parse_table("filtered_ted.csv", &bytes, &layout).unwrap();
            assert_eq!(back.headers, table.headers);
            let cells: Vec<_> = back.records.iter().map(|r| &r.cells).collect();
            let expected: Vec<_> = table.records.iter().map(|r| &r.cells).collect();
            assert_eq!(cells, expected);
        }
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_ted.csv");
        save(&path, b"a,b\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n");
    }
}
