//! Layered configuration for snapbuild.
//!
//! Sources, lowest priority first:
//! defaults, `snap.config.json`, `SNAPBUILD_*` environment variables, CLI flags.

mod conversions;
mod defaults;
mod loading;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::cli::TranspilationMode;
pub use defaults::*;
pub use loading::CONFIG_FILE_NAME;

/// Snap build configuration, as read from `snap.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SnapConfig {
    /// Source file of the Snap
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Output directory
    #[serde(default = "default_dist")]
    pub dist: PathBuf,

    /// Bundle file name inside `dist`
    #[serde(default = "default_outfile_name")]
    pub outfile_name: String,

    /// Emit an inline source map
    #[serde(default)]
    pub source_maps: bool,

    /// Remove comments from the bundle
    #[serde(default = "default_true")]
    pub strip_comments: bool,

    /// Break up HTML comment tokens
    #[serde(default = "default_true")]
    pub transform_html_comments: bool,

    /// Which sources are transpiled
    #[serde(default = "default_transpilation_mode")]
    pub transpilation_mode: TranspilationMode,

    /// Dependencies to transpile when `transpilationMode` is `localAndDeps`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps_to_transpile: Vec<String>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl SnapConfig {
    /// Where the bundle is written: `<dist>/<outfileName>`.
    pub fn destination(&self) -> PathBuf {
        self.dist.join(&self.outfile_name)
    }

    /// Source and destination resolved against `root`.
    pub fn resolve_paths(&self, root: &Path) -> (PathBuf, PathBuf) {
        (root.join(&self.src), root.join(self.destination()))
    }

    /// Options for the bundle orchestrator.
    pub fn to_build_options(&self) -> snapbuild_bundler::BuildOptions {
        snapbuild_bundler::BuildOptions::new()
            .source_maps(self.source_maps)
            .strip_comments(self.strip_comments)
            .transform_html_comments(self.transform_html_comments)
            .transpilation_mode(self.transpilation_mode.into())
            .deps_to_transpile(self.deps_to_transpile.iter())
    }
}
