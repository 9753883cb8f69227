//! The native dependency built ahead of the extension.

pub mod archive;
pub mod fetch;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::SUBMODULES_DIR;

pub use fetch::{FetchError, HttpFetcher, SourceFetcher};

/// OpenCV release the extension is built against.
pub const OPENCV_VERSION: &str = "4.8.1";

/// OpenCV modules the extension does not use.
pub const OPENCV_EXCLUDED_MODULES: &[&str] = &["ts", "stitching", "objdetect", "photo", "ml", "python3"];

/// A pinned third-party source archive and how to trim its build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
  pub name: String,
  pub version: String,
  pub url: String,
  /// Optional sub-components switched off at configure time. Never contains duplicates.
  pub exclusions: Vec<String>,
}

impl DependencySpec {
  /// Describe a dependency; repeated exclusions are dropped, first occurrence wins.
  pub fn new<I, S>(name: impl Into<String>, version: impl Into<String>, url: impl Into<String>, exclusions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut unique: Vec<String> = Vec::new();
    for exclusion in exclusions {
      let exclusion = exclusion.into();
      if !unique.contains(&exclusion) {
        unique.push(exclusion);
      }
    }

    Self {
      name: name.into(),
      version: version.into(),
      url: url.into(),
      exclusions: unique,
    }
  }

  /// The OpenCV release the extension links against.
  pub fn opencv() -> Self {
    Self::new(
      "opencv",
      OPENCV_VERSION,
      format!("https://github.com/opencv/opencv/archive/refs/tags/{}.zip", OPENCV_VERSION),
      OPENCV_EXCLUDED_MODULES.iter().copied(),
    )
  }

  /// Directory the archive extracts into below `source_root`.
  pub fn extract_root(&self, source_root: &Path) -> PathBuf {
    source_root.join(SUBMODULES_DIR)
  }

  /// Source tree the archive unpacks to, e.g. `submodules/opencv-4.8.1`.
  pub fn source_dir(&self, source_root: &Path) -> PathBuf {
    self
      .extract_root(source_root)
      .join(format!("{}-{}", self.name, self.version))
  }

  /// File name the downloaded archive is stored under.
  pub fn archive_file_name(&self) -> String {
    let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
    let extension = if path.ends_with(".tar.gz") {
      "tar.gz"
    } else if path.ends_with(".tgz") {
      "tgz"
    } else if path.ends_with(".tar") {
      "tar"
    } else {
      "zip"
    };
    format!("{}.{}", self.name, extension)
  }

  /// One `-DBUILD_<name>_<module>=OFF` flag per exclusion.
  pub fn exclusion_args(&self) -> Vec<String> {
    self
      .exclusions
      .iter()
      .map(|module| format!("-DBUILD_{}_{}=OFF", self.name, module))
      .collect()
  }
}
