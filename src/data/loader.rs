use std::io::{Cursor, Read};

use zip::ZipArchive;

use super::error::{PipelineError, PipelineResult};
use super::model::{ParseStats, RequiredColumns, TableLayout, TenderRecord, TenderTable};

/// Upper bound on the buffer reserved up front for an entry. The declared
/// size comes from the archive itself and is not trusted beyond this.
const MAX_ENTRY_RESERVE: u64 = 64 << 20;

/// A parsed archive together with the entry the table came from.
#[derive(Debug, Clone)]
pub struct LoadedArchive {
    pub entry_name: String,
    pub table: TenderTable,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extract the tabular entry from a ZIP buffer and parse it.
pub fn load_archive(bytes: &[u8], layout: &TableLayout) -> PipelineResult<LoadedArchive> {
    let (entry_name, contents) = extract_tabular_entry(bytes, &layout.entry_suffix)?;
    let table = parse_table(&entry_name, &contents, layout)?;

    log::info!(
        "Loaded '{entry_name}': {table} ({} skipped, {} reshaped)",
        table.stats.skipped,
        table.stats.coerced
    );

    Ok(LoadedArchive { entry_name, table })
}

// ---------------------------------------------------------------------------
// ZIP extraction
// ---------------------------------------------------------------------------

/// Return the name and contents of the first file entry whose name ends in
/// `suffix` (ASCII case-insensitive), in archive order.
///
/// Later matches are ignored; they are only logged.
pub fn extract_tabular_entry(bytes: &[u8], suffix: &str) -> PipelineResult<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let suffix_lower = suffix.to_ascii_lowercase();

    let mut matches = Vec::new();
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        if file.name().to_ascii_lowercase().ends_with(&suffix_lower) {
            matches.push((i, file.name().to_string()));
        }
    }

    let Some((index, name)) = matches.first().cloned() else {
        return Err(PipelineError::NoTabularEntry {
            suffix: suffix.to_string(),
        });
    };

    if matches.len() > 1 {
        let ignored: Vec<&str> = matches[1..].iter().map(|(_, n)| n.as_str()).collect();
        log::warn!("Archive has several '{suffix}' entries; using '{name}', ignoring {ignored:?}");
    }

    let mut file = archive.by_index(index)?;
    let mut contents = Vec::with_capacity(entry_reserve(file.size()));
    file.read_to_end(&mut contents)
        .map_err(zip::result::ZipError::Io)?;

    Ok((name, contents))
}

fn entry_reserve(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_ENTRY_RESERVE)).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Delimited text parsing
// ---------------------------------------------------------------------------

/// Parse delimited text with a header row into a [`TenderTable`].
///
/// Parsing is permissive:
/// * invalid UTF-8 is replaced, not rejected
/// * short rows are padded and long rows truncated to the header width
/// * records the reader cannot decode are skipped
///
/// Only a missing header is fatal. The required columns are checked
/// against the header before any record is read.
pub fn parse_table(entry: &str, bytes: &[u8], layout: &TableLayout) -> PipelineResult<TenderTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(layout.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| PipelineError::Parse {
            entry: entry.to_string(),
            reason: e.to_string(),
        })?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = String::from_utf8_lossy(h);
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.into_owned()
            }
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PipelineError::Parse {
            entry: entry.to_string(),
            reason: "no header row".into(),
        });
    }

    let columns = RequiredColumns::resolve(&headers, layout).map_err(|missing| {
        PipelineError::Schema {
            entry: entry.to_string(),
            missing,
        }
    })?;

    let width = headers.len();
    let mut stats = ParseStats::default();
    let mut records = Vec::new();
    let mut raw = csv::ByteRecord::new();

    loop {
        match reader.read_byte_record(&mut raw) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                if let csv::ErrorKind::Io(_) = e.kind() {
                    return Err(PipelineError::Parse {
                        entry: entry.to_string(),
                        reason: e.to_string(),
                    });
                }
                log::warn!("'{entry}': skipping unreadable record: {e}");
                stats.skipped += 1;
                continue;
            }
        }

        let mut cells: Vec<String> = raw
            .iter()
            .take(width)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        if raw.len() != width {
            stats.coerced += 1;
            cells.resize(width, String::new());
        }

        let line = raw
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(records.len() + 2);
        records.push(TenderRecord { line, cells });
    }

    if stats.coerced > 0 {
        log::warn!(
            "'{entry}': {} row(s) did not have {width} fields and were padded or truncated",
            stats.coerced
        );
    }

    let mut table = TenderTable::new(headers, columns, records);
    table.stats = stats;
    Ok(table)
}
