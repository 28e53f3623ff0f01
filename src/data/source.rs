use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::error::{PipelineError, PipelineResult};

// ---------------------------------------------------------------------------
// Where an archive comes from
// ---------------------------------------------------------------------------

/// Options for the remote download.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            user_agent: concat!("ted-market-analyzer/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// One of the ways a user can hand the pipeline a ZIP archive.
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    /// Latest export on the publisher's site.
    Remote { url: String },
    /// File chosen in the "Open ZIP…" dialog.
    Upload { path: PathBuf },
    /// File dropped onto the window whose contents egui already read.
    Dropped { name: String, bytes: Arc<[u8]> },
}

impl ArchiveSource {
    /// Obtain the raw archive bytes.
    pub fn acquire(&self, options: &FetchOptions) -> PipelineResult<Vec<u8>> {
        match self {
            ArchiveSource::Remote { url } => fetch_archive(url, options),
            ArchiveSource::Upload { path } => read_upload(path),
            ArchiveSource::Dropped { bytes, .. } => Ok(bytes.to_vec()),
        }
    }

    /// Short label for status lines and logs.
    pub fn describe(&self) -> String {
        match self {
            ArchiveSource::Remote { url } => url.clone(),
            ArchiveSource::Upload { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ArchiveSource::Dropped { name, .. } => name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote fetch
// ---------------------------------------------------------------------------

/// Download the archive with a blocking GET.
///
/// Any transport failure or non-success status is a fetch error.
pub fn fetch_archive(url: &str, options: &FetchOptions) -> PipelineResult<Vec<u8>> {
    let fetch_err = |source: reqwest::Error| PipelineError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(fetch_err)?;

    log::info!("Downloading {url}");
    let response = client.get(url).send().map_err(fetch_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::FetchStatus {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().map_err(fetch_err)?;
    log::info!("Downloaded {} bytes from {url}", bytes.len());
    Ok(bytes.to_vec())
}

// ---------------------------------------------------------------------------
// Manual upload
// ---------------------------------------------------------------------------

pub fn read_upload(path: &Path) -> PipelineResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| PipelineError::Upload {
        path: path.to_path_buf(),
        source,
    })
}
