use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`PipelineError`], used by the UI and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Upload,
    Archive,
    Parse,
    Schema,
    Export,
}

/// Everything that can go wrong between acquiring an archive and producing
/// the export bytes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not download archive from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("archive download from {url} failed with HTTP {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a readable ZIP archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive contains no entry ending in '{suffix}'")]
    NoTabularEntry { suffix: String },

    #[error("could not parse '{entry}': {reason}")]
    Parse { entry: String, reason: String },

    #[error("'{entry}' is missing required column(s): {}", missing.join(", "))]
    Schema { entry: String, missing: Vec<String> },

    #[error("could not serialise filtered table: {0}")]
    Export(#[from] csv::Error),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Fetch { .. } | PipelineError::FetchStatus { .. } => ErrorKind::Fetch,
            PipelineError::Upload { .. } => ErrorKind::Upload,
            PipelineError::Archive(_) | PipelineError::NoTabularEntry { .. } => ErrorKind::Archive,
            PipelineError::Parse { .. } => ErrorKind::Parse,
            PipelineError::Schema { .. } => ErrorKind::Schema,
            PipelineError::Export(_) => ErrorKind::Export,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = PipelineError::Schema {
            entry: "TED.csv".into(),
            missing: vec!["TITLE".into(), "DATE_PUBLICATION".into()],
        };
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(
            err.to_string(),
            "'TED.csv' is missing required column(s): TITLE, DATE_PUBLICATION"
        );
    }

    #[test]
    fn missing_entry_is_an_archive_error() {
        let err = PipelineError::NoTabularEntry { suffix: ".csv".into() };
        assert_eq!(err.kind(), ErrorKind::Archive);
    }
}
