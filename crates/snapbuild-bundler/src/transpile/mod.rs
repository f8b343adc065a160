//! Source transpilation for Snap bundles.
//!
//! Snaps run in browser-grade engines no newer than Chrome 66 / Firefox 68,
//! so project sources (and optionally dependencies) are lowered before
//! bundling. The preset and plugin sets are fixed; only `global` and the
//! dependency ignore filter vary per build.

mod oxc;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::Result;
use crate::bundler::{SourceTransform, TransformedSource};
use crate::deps::{DependencyFilter, TranspileOverrides};

pub use oxc::lower;

/// File extensions the transpiler picks up.
pub const EXTENSIONS: &[&str] = &[".js", ".ts"];

/// A preset: a bundle of syntax lowering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "preset")]
pub enum Preset {
    /// Strip TypeScript syntax.
    TypeScript,
    /// Lower syntax the listed browsers do not support.
    Env {
        browsers: &'static [BrowserTarget],
    },
}

/// Minimum browser version, e.g. `chrome >= 66`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrowserTarget {
    pub name: &'static str,
    pub version: u32,
}

impl fmt::Display for BrowserTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} >= {}", self.name, self.version)
    }
}

/// Individual syntax transforms enabled on top of the presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxPlugin {
    /// Import helpers from `@babel/runtime` instead of inlining them.
    TransformRuntime,
    ClassProperties,
    ObjectRestSpread,
    OptionalChaining,
    NullishCoalescingOperator,
}

pub const BROWSER_TARGETS: &[BrowserTarget] = &[
    BrowserTarget {
        name: "chrome",
        version: 66,
    },
    BrowserTarget {
        name: "firefox",
        version: 68,
    },
];

pub const PRESETS: &[Preset] = &[
    Preset::TypeScript,
    Preset::Env {
        browsers: BROWSER_TARGETS,
    },
];

pub const PLUGINS: &[SyntaxPlugin] = &[
    SyntaxPlugin::TransformRuntime,
    SyntaxPlugin::ClassProperties,
    SyntaxPlugin::ObjectRestSpread,
    SyntaxPlugin::OptionalChaining,
    SyntaxPlugin::NullishCoalescingOperator,
];

/// Transpiler configuration for one build.
#[derive(Debug, Clone, PartialEq)]
pub struct TranspileConfig {
    /// Also transpile modules below `node_modules`.
    pub global: bool,
    pub extensions: &'static [&'static str],
    pub presets: &'static [Preset],
    pub plugins: &'static [SyntaxPlugin],
    /// Dependencies to leave alone even when `global` is set.
    pub ignore: Option<DependencyFilter>,
    /// Emit a source map for every lowered module.
    pub source_map: bool,
}

impl TranspileConfig {
    pub fn new(global: bool) -> Self {
        Self {
            global,
            extensions: EXTENSIONS,
            presets: PRESETS,
            plugins: PLUGINS,
            ignore: None,
            source_map: false,
        }
    }

    pub fn with_source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    /// Merge settings computed by dependency processing.
    pub fn with_overrides(mut self, overrides: TranspileOverrides) -> Self {
        if overrides.ignore.is_some() {
            self.ignore = overrides.ignore;
        }
        self
    }

    pub fn has_plugin(&self, plugin: SyntaxPlugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Browserslist-style target string for the env preset, if any.
    pub fn target(&self) -> Option<String> {
        self.presets.iter().find_map(|preset| match preset {
            Preset::Env { browsers } => Some(
                browsers
                    .iter()
                    .map(|b| format!("{}{}", b.name, b.version))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Preset::TypeScript => None,
        })
    }

    fn handles_extension(&self, id: &str) -> bool {
        Path::new(id)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.strip_prefix('.') == Some(ext))
            })
    }
}

/// [`SourceTransform`] that lowers modules with oxc.
#[derive(Debug, Clone)]
pub struct TranspileTransform {
    config: TranspileConfig,
}

impl TranspileTransform {
    pub fn new(config: TranspileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranspileConfig {
        &self.config
    }
}

impl SourceTransform for TranspileTransform {
    fn name(&self) -> &str {
        "transpile"
    }

    fn applies_to(&self, id: &str) -> bool {
        if !self.config.handles_extension(id) {
            return false;
        }
        match &self.config.ignore {
            Some(filter) => !filter.is_ignored(id),
            None => true,
        }
    }

    fn transform(&self, id: &str, code: &str) -> Result<Option<TransformedSource>> {
        lower(Path::new(id), code, &self.config).map(Some)
    }

    fn global(&self) -> bool {
        self.config.global
    }

    fn options(&self) -> serde_json::Value {
        json!({
            "global": self.config.global,
            "extensions": self.config.extensions,
            "presets": self.config.presets,
            "plugins": self.config.plugins,
            "ignore": self.config.ignore.as_ref().map(|f| f.packages().to_vec()),
        })
    }
}
