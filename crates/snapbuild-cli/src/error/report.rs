//! Conversion of CLI errors into miette reports.

use crate::error::CliError;
use miette::Report;

/// Convert a `CliError` into a report for `main` to print.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundle(e) => bundler_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

/// Keep the bundler's own diagnostic (code, help) in the report.
pub fn bundler_error_to_miette(err: snapbuild_bundler::Error) -> Report {
    Report::new(err)
}
