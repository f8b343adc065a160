#![cfg_attr(docsrs, feature(doc_cfg))]

//! # snapbuild-bundler
//!
//! Builds a single Snap bundle file from a JavaScript or TypeScript source.
//!
//! The heavy lifting is delegated: Rolldown bundles, oxc transpiles, and the
//! post-processing plugin rewrites the output so it evaluates under SES. This
//! crate wires those collaborators together and writes the result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use snapbuild_bundler::{BuildOptions, TranspilationMode};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let options = BuildOptions::new()
//!     .source_maps(false)
//!     .transpilation_mode(TranspilationMode::LocalOnly);
//!
//! let outcome = snapbuild_bundler::bundle(
//!     Path::new("src/index.js"),
//!     Path::new("dist/bundle.js"),
//!     &options,
//!     None,
//! )
//! .await;
//!
//! assert!(outcome.is_success());
//! # }
//! ```
//!
//! ### Customizing the bundler
//!
//! A hook receives the bundler after transpilation is configured and before
//! the post-processing plugin is attached:
//!
//! ```no_run
//! use snapbuild_bundler::{BuildOptions, Bundler, BundlerHook};
//! use std::path::Path;
//!
//! # async fn example() {
//! let hook = |bundler: &mut dyn Bundler| {
//!     tracing::debug!("customizing {}", bundler.source().display());
//! };
//!
//! let outcome = snapbuild_bundler::bundle(
//!     Path::new("src/index.ts"),
//!     Path::new("dist/bundle.js"),
//!     &BuildOptions::default(),
//!     Some(&hook as &dyn BundlerHook),
//! )
//! .await;
//! # }
//! ```

pub mod bundler;
pub mod deps;
pub mod diagnostics;
pub mod options;
pub mod orchestrator;
pub mod plugins;
pub mod transpile;
pub mod writer;

pub use bundler::{
    BundlePlugin, Bundler, BundlerConfig, BundlerFactory, BundlerHook, RolldownBundler,
    RolldownFactory, STANDALONE_NAME, SourceTransform, TransformedSource,
};
pub use deps::{DependencyFilter, TranspileOverrides, process_dependencies};
pub use options::{BuildOptions, TranspilationMode};
pub use orchestrator::{BundleOutcome, bundle, bundle_with};
pub use plugins::{PostProcessOptions, PostProcessPlugin, post_process};
pub use transpile::{PLUGINS, PRESETS, Preset, SyntaxPlugin, TranspileConfig, TranspileTransform};
pub use writer::{BundleWrite, write_bundle_file};

// Re-export core Rolldown types for library users
pub use rolldown::{OutputFormat, Platform, SourceMapType};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

/// Error types for snapbuild-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reported by the Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<diagnostics::ExtractedDiagnostic>),

    /// A module could not be transpiled.
    #[error("Transform error in {file}: {message}")]
    Transform { file: String, message: String },

    /// The finished bundle could not be post-processed.
    #[error("Post-processing error: {0}")]
    PostProcess(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type alias for snapbuild-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error.
    ///
    /// Extracts structured diagnostics from Rolldown's error types.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(error))
    }
}

/// Format bundler error diagnostics for display.
fn format_bundler_error(diagnostics: &[diagnostics::ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [diag] => format!("{}: {}", diag.kind, diag.message),
        many => format!(
            "{} errors: {}",
            many.len(),
            many.iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::Transform { .. } => "TRANSFORM_ERROR",
            Error::PostProcess(_) => "POST_PROCESS_ERROR",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::WriteFailure(_) => "WRITE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Transform { file, .. } => Some(Box::new(format!(
                "Check '{}' for syntax the transpiler cannot handle, or set --transpilation-mode none.",
                file
            ))),
            Error::PostProcess(_) => Some(Box::new(
                "The bundle must contain code after comments are stripped. Check that the entry exports something.",
            )),
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your configuration file for syntax errors.\nError: {}",
                msg
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Bundler(diagnostics) => match diagnostics.as_slice() {
                [diag] => diag
                    .help
                    .as_ref()
                    .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>),
                [] => None,
                _ => Some(Box::new(
                    "Multiple bundler errors occurred. See details below.".to_string(),
                )),
            },
            Error::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::{DiagnosticKind, ExtractedDiagnostic};
    use miette::Diagnostic;

    fn diag(kind: DiagnosticKind, message: &str) -> ExtractedDiagnostic {
        ExtractedDiagnostic {
            kind,
            message: message.to_string(),
            file: None,
            help: None,
        }
    }

    #[test]
    fn test_bundler_error_display_single() {
        let err = Error::Bundler(vec![diag(DiagnosticKind::ParseError, "Unexpected token")]);
        assert_eq!(
            err.to_string(),
            "Rolldown bundler error: ParseError: Unexpected token"
        );
    }

    #[test]
    fn test_bundler_error_display_multiple() {
        let err = Error::Bundler(vec![
            diag(DiagnosticKind::UnresolvedImport, "a"),
            diag(DiagnosticKind::Transform, "b"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 errors"));
        assert!(msg.contains("UnresolvedImport: a"));
        assert!(msg.contains("Transform: b"));
    }

    #[test]
    fn test_bundler_error_display_empty() {
        let err = Error::Bundler(vec![]);
        assert!(err.to_string().contains("Unknown bundler error"));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = Error::PostProcess("empty".into());
        assert_eq!(err.code().unwrap().to_string(), "POST_PROCESS_ERROR");
        assert!(err.help().is_some());

        let err = Error::Io(std::io::Error::other("boom"));
        assert_eq!(err.code().unwrap().to_string(), "IO_ERROR");
        assert!(err.help().is_none());
    }
}
