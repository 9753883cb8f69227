//! Dependency source download.
//!
//! Fetches happen once per build and are fatal on any failure: there is no retry
//! and no partial-download resume. Archives are not checksummed; the pinned
//! URL is trusted as-is and every fetch logs that.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::DependencySpec;
use super::archive::unpack_archive;

/// Redirect hops followed before giving up; release archives bounce through a CDN.
const MAX_REDIRECTS: usize = 10;

/// Errors that can occur while acquiring dependency sources.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The HTTP client could not be constructed.
  #[error("failed to create http client: {0}")]
  Client(#[source] reqwest::Error),

  /// The request failed before a response arrived.
  #[error("failed to download {url}: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("failed to download {url}: HTTP {status}")]
  Status { url: String, status: u16 },

  /// Reading or writing a local file failed.
  #[error("io error at '{path}': {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The archive could not be read.
  #[error("corrupt archive '{path}': {message}")]
  Archive { path: PathBuf, message: String },

  /// The archive format is not one we can unpack.
  #[error("unsupported archive format: {0}")]
  UnsupportedArchive(String),

  /// Extraction succeeded but the expected source tree is absent.
  #[error("archive did not contain the expected source tree '{0}'")]
  MissingSourceTree(PathBuf),
}

impl FetchError {
  pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Acquires a dependency's source tree.
pub trait SourceFetcher {
  /// Download `spec` using `scratch_dir` for the archive, extract it below
  /// `source_root`, and return the extracted source tree.
  fn fetch(&self, spec: &DependencySpec, scratch_dir: &Path, source_root: &Path) -> Result<PathBuf, FetchError>;
}

/// Downloads archives over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, FetchError> {
    let client = Client::builder()
      .redirect(Policy::limited(MAX_REDIRECTS))
      .connect_timeout(Duration::from_secs(30))
      // Large archives over slow links; no overall deadline.
      .timeout(None)
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self { client })
  }

  /// Download `url` to `dest`.
  pub fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
    }

    let response = self.client.get(url).send().map_err(|e| FetchError::Request {
      url: url.to_string(),
      source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let bytes = response.bytes().map_err(|e| FetchError::Request {
      url: url.to_string(),
      source: e,
    })?;

    fs::write(dest, &bytes).map_err(|e| FetchError::io(dest, e))?;

    info!(path = ?dest, size = bytes.len(), "download complete");
    Ok(())
  }
}

impl SourceFetcher for HttpFetcher {
  fn fetch(&self, spec: &DependencySpec, scratch_dir: &Path, source_root: &Path) -> Result<PathBuf, FetchError> {
    info!(name = %spec.name, version = %spec.version, url = %spec.url, "downloading dependency");
    warn!(url = %spec.url, "archive integrity is not verified (no checksum is pinned)");

    let archive_path = scratch_dir.join(spec.archive_file_name());
    self.download(&spec.url, &archive_path)?;

    info!(name = %spec.name, version = %spec.version, "extracting dependency");
    unpack_archive(&archive_path, &spec.extract_root(source_root))?;

    let source_dir = spec.source_dir(source_root);
    if !source_dir.is_dir() {
      return Err(FetchError::MissingSourceTree(source_dir));
    }

    debug!(path = ?source_dir, "dependency sources ready");
    Ok(source_dir)
  }
}
