//! Writing the finished bundle to disk.
//!
//! The bundle goes to a temporary sibling and is renamed into place. A failed
//! write removes whatever is left at the destination.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, warn};

use crate::orchestrator::BundleOutcome;
use crate::{Error, Result};

/// Everything the writer needs from a finished bundle step.
#[derive(Debug)]
pub struct BundleWrite<'a> {
    /// Set when bundling failed; nothing is written.
    pub error: Option<Error>,
    pub buffer: Option<Vec<u8>>,
    pub source: &'a Path,
    pub destination: &'a Path,
}

impl<'a> BundleWrite<'a> {
    pub fn from_result(result: Result<Vec<u8>>, source: &'a Path, destination: &'a Path) -> Self {
        let (error, buffer) = match result {
            Ok(buffer) => (None, Some(buffer)),
            Err(e) => (Some(e), None),
        };
        Self {
            error,
            buffer,
            source,
            destination,
        }
    }
}

/// Write a bundle, or report why there is nothing to write.
///
/// Never returns an error; every failure is logged and carried in the
/// returned [`BundleOutcome`].
pub async fn write_bundle_file(write: BundleWrite<'_>) -> BundleOutcome {
    let BundleWrite {
        error,
        buffer,
        source,
        destination,
    } = write;

    if let Some(err) = error {
        error!("Build error: {}", err);
        return BundleOutcome::Failed { error: err };
    }

    let Some(buffer) = buffer else {
        let err = Error::WriteFailure("bundler produced no output".to_string());
        error!("Build error: {}", err);
        return BundleOutcome::Failed { error: err };
    };

    match write_atomic(destination, &buffer).await {
        Ok(()) => {
            info!(
                "Build success: '{}' bundled as '{}'!",
                source.display(),
                destination.display()
            );
            BundleOutcome::Written {
                path: destination.to_path_buf(),
                bytes: buffer.len(),
            }
        }
        Err(err) => {
            error!("Write error: {}", err);
            remove_mangled(destination).await;
            BundleOutcome::Failed { error: err }
        }
    }
}

/// Hidden sibling `.<name>.tmp`, so an existing `<stem>.tmp` is never touched.
fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    destination.with_file_name(format!(".{name}.tmp"))
}

async fn write_atomic(destination: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(destination);
    if let Err(e) = fs::write(&temp_path, content).await {
        cleanup_temp_file(&temp_path).await;
        return Err(Error::WriteFailure(format!(
            "Failed to write temporary file '{}': {}",
            temp_path.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&temp_path, destination).await {
        cleanup_temp_file(&temp_path).await;
        return Err(Error::WriteFailure(format!(
            "Failed to rename '{}' to '{}': {}",
            temp_path.display(),
            destination.display(),
            e
        )));
    }

    Ok(())
}

async fn cleanup_temp_file(temp_path: &Path) {
    if fs::try_exists(temp_path).await.unwrap_or(false) {
        if let Err(e) = fs::remove_file(temp_path).await {
            warn!(
                "Failed to clean up temporary file '{}': {}",
                temp_path.display(),
                e
            );
        }
    }
}

async fn remove_mangled(destination: &Path) {
    if !fs::try_exists(destination).await.unwrap_or(false) {
        return;
    }
    // Only regular files; a directory in the way is the caller's problem.
    let is_file = fs::metadata(destination)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if is_file && fs::remove_file(destination).await.is_err() {
        error!("Failed to unlink mangled file.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_buffer_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src/index.js");
        let dest = dir.path().join("dist/nested/bundle.js");

        let outcome = write_bundle_file(BundleWrite::from_result(
            Ok(b"bundle".to_vec()),
            &src,
            &dest,
        ))
        .await;

        assert!(outcome.is_success());
        assert_eq!(std::fs::read(&dest).unwrap(), b"bundle");
        assert!(!temp_path_for(&dest).exists());
        match outcome {
            BundleOutcome::Written { path, bytes } => {
                assert_eq!(path, dest);
                assert_eq!(bytes, 6);
            }
            BundleOutcome::Failed { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_error_skips_write() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("bundle.js");

        let outcome = write_bundle_file(BundleWrite::from_result(
            Err(Error::PostProcess("boom".into())),
            Path::new("src/index.js"),
            &dest,
        ))
        .await;

        assert!(!outcome.is_success());
        assert!(!dest.exists());
        assert!(matches!(outcome.error(), Some(Error::PostProcess(_))));
    }

    #[tokio::test]
    async fn test_error_leaves_previous_bundle_alone() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("bundle.js");
        std::fs::write(&dest, "old").unwrap();

        let outcome = write_bundle_file(BundleWrite::from_result(
            Err(Error::PostProcess("boom".into())),
            Path::new("src/index.js"),
            &dest,
        ))
        .await;

        assert!(!outcome.is_success());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // Destination is an existing directory, so the rename fails.
        let dest = dir.path().join("bundle.js");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep.txt"), "x").unwrap();

        let outcome = write_bundle_file(BundleWrite::from_result(
            Ok(b"bundle".to_vec()),
            Path::new("src/index.js"),
            &dest,
        ))
        .await;

        assert!(matches!(outcome.error(), Some(Error::WriteFailure(_))));
        assert!(dest.join("keep.txt").exists());
        assert!(!temp_path_for(&dest).exists());
    }

    #[tokio::test]
    async fn test_sibling_tmp_file_survives_write() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("bundle.js");
        let sibling = dir.path().join("bundle.tmp");
        std::fs::write(&sibling, "user data").unwrap();

        let outcome = write_bundle_file(BundleWrite::from_result(
            Ok(b"bundle".to_vec()),
            Path::new("src/index.js"),
            &dest,
        ))
        .await;

        assert!(outcome.is_success());
        assert_eq!(temp_path_for(&dest), dir.path().join(".bundle.js.tmp"));
        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "user data");
        assert_eq!(std::fs::read(&dest).unwrap(), b"bundle");
    }

    #[tokio::test]
    async fn test_missing_buffer_without_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("bundle.js");
        let outcome = write_bundle_file(BundleWrite {
            error: None,
            buffer: None,
            source: Path::new("src/index.js"),
            destination: &dest,
        })
        .await;
        assert!(!outcome.is_success());
        assert!(!dest.exists());
    }
}
