use crate::error::{BuildError, CliError, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a path against the project root. Absolute paths are kept.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// The project root: `--cwd` when given (relative to the current
/// directory), otherwise the current directory.
pub fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = get_cwd()?;
    let root = match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }

    Ok(root)
}

/// Check that the Snap's source file exists and is a file.
pub fn validate_entry(entry: &Path) -> Result<()> {
    if !entry.exists() {
        return Err(BuildError::EntryNotFound(entry.to_path_buf()).into());
    }

    if !entry.is_file() {
        return Err(BuildError::EntryNotAFile(entry.to_path_buf()).into());
    }

    Ok(())
}

/// Create the output directory if needed.
pub fn ensure_output_dir(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        if let Err(e) = fs::create_dir_all(out_dir) {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                return Err(BuildError::OutputNotWritable(out_dir.to_path_buf()).into());
            }
            return Err(e).context(format!(
                "Failed to create output directory {}",
                out_dir.display()
            ));
        }
    } else if !out_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }

    Ok(())
}

pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current directory")
}

/// Display `path` relative to `root` when it lives under it.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
