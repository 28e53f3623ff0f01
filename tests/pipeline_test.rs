//! End-to-end runs of the pipeline on in-memory ZIP archives.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use ted_market_analyzer::data::aggregate::YearMonth;
use ted_market_analyzer::data::error::ErrorKind;
use ted_market_analyzer::data::filter::{self, FilterCriteria};
use ted_market_analyzer::data::loader::{load_archive, parse_table};
use ted_market_analyzer::data::model::{TableLayout, TenderTable};
use ted_market_analyzer::data::pipeline::{analyze, run};

const HEADER: &str = "ID_NOTICE_CAN;ISO_COUNTRY_CODE;TITLE;DATE_PUBLICATION;VALUE_EURO";

/// Helper to pack CSV text into a single-entry archive.
fn archive_with(csv: &str) -> Vec<u8> {
    archive_of(&[("TED_EXPORT.csv", csv)])
}

fn archive_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn csv(rows: &[&str]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

fn mixed_rows() -> String {
    csv(&[
        "1;DE;Air Quality Study;2023-01-15;1000",
        "2;DE;Bridge works;2023-02-01;2000",
        "3;PL;Noise mapping;2023-02-10;3000",
        "4;FR;Air monitoring;2023-01-20;4000",
        "5;PL;EMISSION inventory;not a date;5000",
        "6;;Air without country;2023-03-01;6000",
        "7;DE;;2023-03-02;7000",
        "8;LV;Environmental impact;2023-03-05;8000",
        "9;DE;Noise barriers;2023-01-03;9000",
    ])
}

fn criteria(keywords: &str, countries: &[&str]) -> FilterCriteria {
    FilterCriteria::from_input(keywords, countries.iter().copied())
}

#[test]
fn air_quality_study_is_the_only_match() {
    let bytes = archive_with(&csv(&[
        "1;DE;Air Quality Study;2023-01-15;1",
        "2;DE;Bridge construction;2023-02-01;2",
    ]));
    let report = run(&bytes, &TableLayout::default(), &criteria("air", &["DE"]), b',').unwrap();

    assert_eq!(report.source_rows, 2);
    assert_eq!(report.filtered.len(), 1);
    assert_eq!(report.filtered.title(&report.filtered.records[0]), "Air Quality Study");

    let monthly = report.monthly.unwrap();
    assert_eq!(monthly.months, vec![YearMonth::new(2023, 1)]);
    assert_eq!(monthly.countries, vec!["DE"]);
    assert_eq!(monthly.count(YearMonth::new(2023, 1), "DE"), 1);
    assert_eq!(monthly.total(), 1);
}

#[test]
fn keyword_match_is_a_plain_substring() {
    // "Repair" contains "air"; no word boundaries are applied.
    let bytes = archive_with(&csv(&["1;DE;Road Repair;2023-02-01;1"]));
    let report = run(&bytes, &TableLayout::default(), &criteria("air", &["DE"]), b',').unwrap();
    assert_eq!(report.filtered.len(), 1);
}

#[test]
fn output_satisfies_both_criteria() {
    let loaded = load_archive(&archive_with(&mixed_rows()), &TableLayout::default()).unwrap();
    let crit = criteria("air, noise, emission", &["DE", "PL"]);
    let report = analyze(&loaded.table, &crit, b',').unwrap();

    let selected: BTreeSet<String> = ["DE", "PL"].iter().map(|s| s.to_string()).collect();
    for record in &report.filtered.records {
        let country = report.filtered.country_code(record).unwrap();
        assert!(selected.contains(country));
        let title = report.filtered.title(record).to_lowercase();
        assert!(crit.keywords().iter().any(|k| title.contains(k.as_str())));
    }

    let ids: Vec<&str> = report.filtered.records.iter().map(|r| r.cells[0].as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "5", "9"]);
}

#[test]
fn filtering_is_idempotent_and_order_preserving() {
    let loaded = load_archive(&archive_with(&mixed_rows()), &TableLayout::default()).unwrap();
    let crit = criteria("air, noise, emission, impact", &["DE", "PL", "LV", "FR"]);

    let once = filter::apply(&loaded.table, &crit);
    let twice = filter::apply(&once, &crit);
    assert_eq!(once, twice);

    let lines: Vec<usize> = once.records.iter().map(|r| r.line).collect();
    assert!(lines.windows(2).all(|w| w[0] < w[1]));
    for record in &once.records {
        assert!(loaded.table.records.contains(record));
    }
}

#[test]
fn undated_rows_are_exported_but_not_charted() {
    let bytes = archive_with(&mixed_rows());
    let report = run(&bytes, &TableLayout::default(), &criteria("emission, noise", &["PL"]), b';')
        .unwrap();

    assert_eq!(report.filtered.len(), 2);
    let monthly = report.monthly.as_ref().unwrap();
    assert_eq!(monthly.total(), 1);
    assert_eq!(monthly.undated, 1);
    assert_eq!(monthly.count(YearMonth::new(2023, 2), "PL"), 1);

    let exported = String::from_utf8(report.export.clone()).unwrap();
    assert!(exported.contains("EMISSION inventory;not a date"));
}

#[test]
fn aggregate_cells_match_row_counts() {
    let bytes = archive_with(&mixed_rows());
    let report = run(
        &bytes,
        &TableLayout::default(),
        &criteria("air, noise, emission, impact", &["DE", "PL", "LV", "FR"]),
        b',',
    )
    .unwrap();
    let monthly = report.monthly.unwrap();

    assert_eq!(monthly.countries, vec!["DE", "FR", "LV", "PL"]);
    assert_eq!(
        monthly.months,
        vec![YearMonth::new(2023, 1), YearMonth::new(2023, 2), YearMonth::new(2023, 3)]
    );
    assert_eq!(monthly.row(0), &[2, 1, 0, 0]);
    assert_eq!(monthly.row(1), &[0, 0, 0, 1]);
    assert_eq!(monthly.row(2), &[0, 0, 1, 0]);
    assert_eq!(monthly.undated, 1);
}

#[test]
fn empty_result_skips_chart_and_exports_header_only() {
    let bytes = archive_with(&mixed_rows());
    let report = run(&bytes, &TableLayout::default(), &criteria("air", &["MT"]), b',').unwrap();

    assert!(report.filtered.is_empty());
    assert!(report.monthly.is_none());
    assert_eq!(
        String::from_utf8(report.export).unwrap(),
        "ID_NOTICE_CAN,ISO_COUNTRY_CODE,TITLE,DATE_PUBLICATION,VALUE_EURO\n"
    );
}

#[test]
fn export_round_trips() {
    let bytes = archive_with(&csv(&[
        "1;DE;\"Air; soil, water\";2023-01-15;1",
        "2;DE;Say \"\"noise\"\" please;2023-02-01;",
        "3;DE;Noise;;3",
    ]));
    let report = run(&bytes, &TableLayout::default(), &criteria("air, noise", &["DE"]), b',').unwrap();

    let layout = TableLayout {
        delimiter: b',',
        ..TableLayout::default()
    };
    let back = parse_table("filtered_ted.csv", &report.export, &layout).unwrap();
    assert_eq!(back.headers, report.filtered.headers);
    let cells = |t: &TenderTable| {
        t.records.iter().map(|r| r.cells.clone()).collect::<Vec<_>>()
    };
    assert_eq!(cells(&back), cells(&report.filtered));
}

#[test]
fn plain_text_renamed_to_zip_is_an_archive_error() {
    let err = run(
        b"ISO_COUNTRY_CODE;TITLE\nDE;Air\n",
        &TableLayout::default(),
        &criteria("air", &["DE"]),
        b',',
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Archive);
}

#[test]
fn archive_without_csv_is_an_archive_error() {
    let bytes = archive_of(&[("README.txt", "nothing here")]);
    let err = run(&bytes, &TableLayout::default(), &criteria("air", &["DE"]), b',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Archive);
}

#[test]
fn missing_columns_are_a_schema_error() {
    let bytes = archive_with("ID;ISO_COUNTRY_CODE;TITLE\n1;DE;Air\n");
    let err = run(&bytes, &TableLayout::default(), &criteria("air", &["DE"]), b',').unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("DATE_PUBLICATION"));
}

#[test]
fn first_csv_entry_is_used() {
    let bytes = archive_of(&[
        ("notes.txt", "ignore me"),
        ("TED_EXPORT.csv", csv(&["1;DE;Air;2023-01-15;1"]).as_str()),
        ("TED_EXPORT_OLD.csv", csv(&["1;DE;Air;2023-01-15;1", "2;DE;Air;2023-01-15;2"]).as_str()),
    ]);
    let loaded = load_archive(&bytes, &TableLayout::default()).unwrap();
    assert_eq!(loaded.entry_name, "TED_EXPORT.csv");
    assert_eq!(loaded.table.len(), 1);
}

#[test]
fn custom_column_names_are_honoured() {
    let layout = TableLayout {
        country_column: "COUNTRY".into(),
        title_column: "NAME".into(),
        date_column: "PUBLISHED".into(),
        ..TableLayout::default()
    };
    let bytes = archive_with("COUNTRY;NAME;PUBLISHED\nLV;Air study;15.03.2024\n");
    let report = run(&bytes, &layout, &criteria("air", &["LV"]), b',').unwrap();
    assert_eq!(report.monthly.unwrap().count(YearMonth::new(2024, 3), "LV"), 1);
}
