use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::TranspilationMode;
use crate::cli::validation::{parse_dependency, parse_outfile_name};

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle the Snap
    ///
    /// Reads the source file, bundles it with its dependencies and writes
    /// `<dist>/<outfile-name>`.
    Build(BuildArgs),

    /// Bundle the Snap and rebuild when sources change
    Watch(WatchArgs),
}

/// Arguments for the build command.
///
/// Every option is optional here: a flag that is not given leaves the value
/// from `snap.config.json`, the environment, or the default in place.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Source file of the Snap [default: src/index.js]
    #[arg(short, long, value_name = "FILE")]
    pub src: Option<PathBuf>,

    /// Output directory [default: dist]
    #[arg(short, long, value_name = "DIR")]
    pub dist: Option<PathBuf>,

    /// Name of the bundle file inside the output directory [default: bundle.js]
    #[arg(short, long, value_name = "NAME", value_parser = parse_outfile_name)]
    pub outfile_name: Option<String>,

    /// Emit an inline source map [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub source_maps: Option<bool>,

    /// Remove comments from the bundle [default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub strip_comments: Option<bool>,

    /// Break up HTML comment tokens that SES rejects [default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub transform_html_comments: Option<bool>,

    /// Which sources are transpiled [default: localOnly]
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub transpilation_mode: Option<TranspilationMode>,

    /// Dependencies to transpile, by package name (requires localAndDeps)
    ///
    /// Examples:
    ///   snapbuild build --transpilation-mode localAndDeps --deps-to-transpile foo @scope/bar
    #[arg(long, value_name = "PKG", num_args = 1.., value_parser = parse_dependency)]
    pub deps_to_transpile: Vec<String>,

    /// Path to the config file [default: snap.config.json, when present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root that relative paths resolve against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the watch command
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Quiet period after a change before rebuilding, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub debounce_ms: u64,
}
