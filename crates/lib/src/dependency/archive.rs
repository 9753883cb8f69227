//! Source archive extraction.
//!
//! Archives are unpacked as-is: release archives carry a single
//! `<name>-<version>/` top-level directory and the configure step points at it.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use super::fetch::FetchError;

/// Unpack an archive into the destination directory
///
/// Supports:
/// - `.zip`
/// - `.tar.gz` / `.tgz`
/// - `.tar`
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<(), FetchError> {
  let name = archive_path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| FetchError::UnsupportedArchive(archive_path.display().to_string()))?;

  fs::create_dir_all(dest).map_err(|e| FetchError::io(dest, e))?;

  if name.ends_with(".zip") {
    unpack_zip(archive_path, dest)?;
  } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
    let file = File::open(archive_path).map_err(|e| FetchError::io(archive_path, e))?;
    unpack_tar(Archive::new(GzDecoder::new(BufReader::new(file))), archive_path, dest)?;
  } else if name.ends_with(".tar") {
    let file = File::open(archive_path).map_err(|e| FetchError::io(archive_path, e))?;
    unpack_tar(Archive::new(BufReader::new(file)), archive_path, dest)?;
  } else {
    return Err(FetchError::UnsupportedArchive(name.to_string()));
  }

  info!(archive = ?archive_path, dest = ?dest, "unpacked archive");
  Ok(())
}

fn unpack_tar<R: std::io::Read>(mut archive: Archive<R>, archive_path: &Path, dest: &Path) -> Result<(), FetchError> {
  archive.unpack(dest).map_err(|e| FetchError::Archive {
    path: archive_path.to_path_buf(),
    message: e.to_string(),
  })
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<(), FetchError> {
  let corrupt = |message: String| FetchError::Archive {
    path: archive_path.to_path_buf(),
    message,
  };

  let file = File::open(archive_path).map_err(|e| FetchError::io(archive_path, e))?;
  let mut archive =
    zip::ZipArchive::new(BufReader::new(file)).map_err(|e| corrupt(format!("failed to open zip: {}", e)))?;

  debug!(entries = archive.len(), "extracting zip");

  for i in 0..archive.len() {
    let mut entry = archive
      .by_index(i)
      .map_err(|e| corrupt(format!("failed to read zip entry: {}", e)))?;

    let path = entry
      .enclosed_name()
      .ok_or_else(|| corrupt(format!("unsafe zip entry name: {}", entry.name())))?;

    let dest_path = dest.join(path);

    if entry.is_dir() {
      fs::create_dir_all(&dest_path).map_err(|e| FetchError::io(&dest_path, e))?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
    }

    let mut outfile = File::create(&dest_path).map_err(|e| FetchError::io(&dest_path, e))?;
    std::io::copy(&mut entry, &mut outfile).map_err(|e| corrupt(format!("failed to inflate {}: {}", entry.name(), e)))?;

    // Keep executable bits on build scripts
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode)).map_err(|e| FetchError::io(&dest_path, e))?;
      }
    }
  }

  Ok(())
}
