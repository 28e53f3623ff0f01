use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use ted_market_analyzer::config::Settings;
use ted_market_analyzer::data::countries::COUNTRIES;
use ted_market_analyzer::data::error::PipelineError;
use ted_market_analyzer::data::export;
use ted_market_analyzer::data::filter::FilterCriteria;
use ted_market_analyzer::data::loader::{load_archive, LoadedArchive};
use ted_market_analyzer::data::model::TableLayout;
use ted_market_analyzer::data::pipeline::{analyze, AnalysisReport};
use ted_market_analyzer::data::source::ArchiveSource;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,
    layout: TableLayout,
    export_delimiter: u8,

    /// Keyword field, comma-separated.
    pub keywords_input: String,

    /// Selected country codes.
    pub selected_countries: BTreeSet<&'static str>,

    /// Last successfully loaded archive (None until the first run).
    pub loaded: Option<LoadedArchive>,

    /// Result of the last successful run.
    pub report: Option<AnalysisReport>,

    /// One colour per country code in the report's chart.
    pub color_map: Option<ColorMap>,

    /// Error message shown in the UI.
    pub status_message: Option<String>,

    /// Success message shown in the UI.
    pub info_message: Option<String>,

    /// Whether the filters changed since the last run.
    pub filters_dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        // Validated by `Settings::load`; fall back for hand-built settings.
        let layout = settings.table_layout().unwrap_or_default();
        let export_delimiter = settings.export_delimiter().unwrap_or(b',');

        Self {
            keywords_input: settings.filters.keywords.clone(),
            selected_countries: settings.default_country_codes().into_iter().collect(),
            settings,
            layout,
            export_delimiter,
            loaded: None,
            report: None,
            color_map: None,
            status_message: None,
            info_message: None,
            filters_dirty: false,
        }
    }

    /// Filter criteria from the current control values.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_input(&self.keywords_input, self.selected_countries.iter().copied())
    }

    /// Acquire, load and analyse an archive. Any failure clears all results.
    pub fn run_source(&mut self, source: ArchiveSource) {
        log::info!("Running analysis on {}", source.describe());
        let outcome = source
            .acquire(&self.settings.fetch_options())
            .and_then(|bytes| load_archive(&bytes, &self.layout));

        match outcome {
            Ok(loaded) => {
                self.loaded = Some(loaded);
                self.refilter();
            }
            Err(e) => self.fail(e),
        }
    }

    /// Re-run filtering, aggregation and export on the loaded table.
    pub fn refilter(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };

        match analyze(&loaded.table, &self.criteria(), self.export_delimiter) {
            Ok(report) => {
                self.color_map = report
                    .monthly
                    .as_ref()
                    .map(|agg| ColorMap::new(&agg.countries));
                self.info_message = Some(format!(
                    "Found {} matching tenders (of {} in {}).",
                    report.filtered.len(),
                    report.source_rows,
                    loaded.entry_name
                ));
                self.report = Some(report);
                self.status_message = None;
                self.filters_dirty = false;
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: PipelineError) {
        log::error!("Analysis failed ({:?}): {error}", error.kind());
        self.loaded = None;
        self.report = None;
        self.color_map = None;
        self.info_message = None;
        self.status_message = Some(format!("Error: {error}"));
    }

    /// Write the current export to `path`.
    pub fn save_export(&mut self, path: &Path) -> Result<()> {
        let report = self.report.as_ref().context("nothing to save yet")?;
        export::save(path, &report.export)
            .with_context(|| format!("saving {}", path.display()))?;
        self.info_message = Some(format!(
            "Saved {} rows to {}.",
            report.filtered.len(),
            path.display()
        ));
        Ok(())
    }

    /// Toggle one country in the selection.
    pub fn toggle_country(&mut self, code: &'static str) {
        if !self.selected_countries.remove(code) {
            self.selected_countries.insert(code);
        }
        self.filters_dirty = true;
    }

    /// Select every country in the enumeration.
    pub fn select_all(&mut self) {
        self.selected_countries = COUNTRIES.iter().map(|(_, code)| *code).collect();
        self.filters_dirty = true;
    }

    /// Clear the country selection.
    pub fn select_none(&mut self) {
        self.selected_countries.clear();
        self.filters_dirty = true;
    }
}
