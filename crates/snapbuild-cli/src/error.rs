//! Error types for the snapbuild CLI.
//!
//! `CliError` is what commands return. Configuration and build problems get
//! their own enums so each message can carry a hint the user can act on.
//! Failures from the bundler itself travel as [`snapbuild_bundler::Error`] so
//! that its miette diagnostic survives to the terminal.
//!
//! ```rust,no_run
//! use snapbuild_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_entry(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod report;

pub use report::{bundler_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// The bundle orchestrator reported a failure.
    #[error(transparent)]
    Bundle(#[from] snapbuild_bundler::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}\n\nHint: Create a snap.config.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid JSON in config file: {0}\n\nHint: Use a JSON validator to check syntax")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Conflicting options: {0}\n\nHint: These options cannot be used together")]
    ConflictingOptions(String),

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised around a build, before or after the bundler runs.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Source file not found: {}\n\nHint: Check the 'src' field in snap.config.json or the --src argument", .0.display())]
    EntryNotFound(PathBuf),

    #[error("Source is not a file: {}\n\nHint: Point --src at the Snap's entry file, not a directory", .0.display())]
    EntryNotAFile(PathBuf),

    #[error("Output directory is not writable: {}\n\nHint: Check directory permissions or choose a different --dist", .0.display())]
    OutputNotWritable(PathBuf),

    #[error("{0}")]
    Custom(String),
}

/// Result alias with `CliError` as the default error.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Context helpers for `Result`s that convert into `CliError`.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into `CliError::FileNotFound(path)`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("snap.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("snap.config.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_build_error_entry_not_found() {
        let err = BuildError::EntryNotFound(PathBuf::from("src/index.js"));
        let msg = err.to_string();
        assert!(msg.contains("Source file not found"));
        assert!(msg.contains("src/index.js"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "outfileName".to_string(),
            value: "bundle.ts".to_string(),
            hint: "Use a .js file name".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'outfileName': bundle.ts"));
        assert!(msg.contains("Hint: Use a .js file name"));
    }

    #[test]
    fn test_bundle_error_is_transparent() {
        let err: CliError = snapbuild_bundler::Error::PostProcess("empty".into()).into();
        assert!(matches!(err, CliError::Bundle(_)));
        assert_eq!(err.to_string(), "Post-processing error: empty");
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/path.js").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_path_keeps_other_io_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_path("/test/path.js").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("snap.config.json")));

        let err = result.with_hint("Try creating the file").unwrap_err();
        assert!(err.to_string().contains("Hint: Try creating the file"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), BuildError> =
            Err(BuildError::Custom("boom".to_string()));

        let err = result.context("Failed to start watcher").unwrap_err();
        assert_eq!(err.to_string(), "Failed to start watcher: Build error: boom");
    }
}
