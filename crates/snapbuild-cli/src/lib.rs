//! snapbuild CLI.
//!
//! Command-line front end for `snapbuild-bundler`: turns flags, environment
//! variables and `snap.config.json` into a [`config::SnapConfig`], checks the
//! paths, and runs the bundle orchestrator once (`build`) or on every source
//! change (`watch`).
//!
//! - [`cli`] - argument definitions
//! - [`config`] - layered configuration
//! - [`commands`] - `build` and `watch`
//! - [`error`] - error types and miette conversion
//! - [`logger`] / [`ui`] - tracing setup and status lines

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watcher;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
