// Layered settings: built-in defaults, then `ted-analyzer.toml`, then
// `TED_<SECTION>__<KEY>` environment variables.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::countries;
use crate::data::model::TableLayout;
use crate::data::source::FetchOptions;

pub const CONFIG_FILE: &str = "ted-analyzer";
pub const ENV_PREFIX: &str = "TED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub source: SourceSettings,
    pub table: TableSettings,
    pub export: ExportSettings,
    pub filters: FilterDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSettings {
    pub entry_suffix: String,
    pub delimiter: String,
    pub country_column: String,
    pub title_column: String,
    pub date_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub file_name: String,
    pub delimiter: String,
}

/// Initial state of the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefaults {
    /// Comma-separated, as typed in the keyword field.
    pub keywords: String,
    /// Country names or codes.
    pub countries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = TableLayout::default();
        let fetch = FetchOptions::default();
        Self {
            source: SourceSettings {
                url: "https://ted.europa.eu/resources/download/latest/TED_EXPORT.csv.zip".into(),
                timeout_secs: fetch.timeout.as_secs(),
                user_agent: fetch.user_agent,
            },
            table: TableSettings {
                entry_suffix: layout.entry_suffix,
                delimiter: (layout.delimiter as char).to_string(),
                country_column: layout.country_column,
                title_column: layout.title_column,
                date_column: layout.date_column,
            },
            export: ExportSettings {
                file_name: "filtered_ted.csv".into(),
                delimiter: ",".into(),
            },
            filters: FilterDefaults {
                keywords: "air, emission, dispersion, model, environment, noise, impact".into(),
                countries: vec!["Germany".into(), "Latvia".into(), "Poland".into()],
            },
        }
    }
}

impl Settings {
    /// Load settings from the working directory and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(File::with_name(CONFIG_FILE).required(false))
    }

    fn load_from<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).context("encoding default settings")?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("reading configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        single_byte(&self.table.delimiter).context("table.delimiter")?;
        single_byte(&self.export.delimiter).context("export.delimiter")?;
        if self.table.entry_suffix.is_empty() {
            bail!("table.entry_suffix must not be empty");
        }
        Ok(())
    }

    pub fn table_layout(&self) -> Result<TableLayout> {
        Ok(TableLayout {
            entry_suffix: self.table.entry_suffix.clone(),
            delimiter: single_byte(&self.table.delimiter).context("table.delimiter")?,
            country_column: self.table.country_column.clone(),
            title_column: self.table.title_column.clone(),
            date_column: self.table.date_column.clone(),
        })
    }

    pub fn export_delimiter(&self) -> Result<u8> {
        single_byte(&self.export.delimiter).context("export.delimiter")
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.source.timeout_secs),
            user_agent: self.source.user_agent.clone(),
        }
    }

    /// Country codes pre-selected at startup. Unknown entries are dropped.
    pub fn default_country_codes(&self) -> Vec<&'static str> {
        self.filters
            .countries
            .iter()
            .filter_map(|entry| {
                let code = countries::resolve(entry);
                if code.is_none() {
                    log::warn!("Ignoring unknown country '{entry}' in configuration");
                }
                code
            })
            .collect()
    }
}

fn single_byte(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("delimiter must be a single ASCII character, got {s:?}"),
    }
}
