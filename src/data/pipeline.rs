use super::aggregate::{monthly_counts, MonthlyAggregate};
use super::error::PipelineResult;
use super::export::to_delimited;
use super::filter::{self, FilterCriteria};
use super::loader::load_archive;
use super::model::{TableLayout, TenderTable};

/// Everything the UI shows after a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Rows in the table before filtering.
    pub source_rows: usize,
    pub filtered: TenderTable,
    /// `None` when nothing matched.
    pub monthly: Option<MonthlyAggregate>,
    /// Filtered table serialised for download.
    pub export: Vec<u8>,
}

/// Filter an already loaded table, aggregate it and serialise it.
pub fn analyze(
    table: &TenderTable,
    criteria: &FilterCriteria,
    export_delimiter: u8,
) -> PipelineResult<AnalysisReport> {
    let filtered = filter::apply(table, criteria);
    log::info!(
        "{} of {} rows match countries {:?} and keywords {:?}",
        filtered.len(),
        table.len(),
        criteria.countries(),
        criteria.keywords()
    );

    let monthly = (!filtered.is_empty()).then(|| monthly_counts(&filtered));
    let export = to_delimited(&filtered, export_delimiter)?;

    Ok(AnalysisReport {
        source_rows: table.len(),
        filtered,
        monthly,
        export,
    })
}

/// Full run from archive bytes to report.
pub fn run(
    archive: &[u8],
    layout: &TableLayout,
    criteria: &FilterCriteria,
    export_delimiter: u8,
) -> PipelineResult<AnalysisReport> {
    let loaded = load_archive(archive, layout)?;
    analyze(&loaded.table, criteria, export_delimiter)
}
