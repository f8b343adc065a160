use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which sources get run through the transpiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranspilationMode {
    /// Bundle sources as written.
    None,
    /// Transpile the project's own files, leave `node_modules` alone.
    #[default]
    LocalOnly,
    /// Transpile project files and dependencies.
    LocalAndDeps,
}

impl TranspilationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranspilationMode::None => "none",
            TranspilationMode::LocalOnly => "localOnly",
            TranspilationMode::LocalAndDeps => "localAndDeps",
        }
    }
}

impl fmt::Display for TranspilationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranspilationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TranspilationMode::None),
            "localOnly" => Ok(TranspilationMode::LocalOnly),
            "localAndDeps" => Ok(TranspilationMode::LocalAndDeps),
            other => Err(format!(
                "Invalid transpilation mode '{}'. Expected one of: none, localOnly, localAndDeps",
                other
            )),
        }
    }
}

/// Options controlling a single bundle build.
///
/// Fields are public for direct construction; the builder methods exist for
/// call sites that only touch one or two settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Emit an inline source map (default: false).
    pub source_maps: bool,

    /// Remove comments from the finished bundle (default: true).
    pub strip_comments: bool,

    /// Break up `<!--` and `-->` so SES accepts the bundle (default: true).
    pub transform_html_comments: bool,

    /// Transpilation scope (default: [`TranspilationMode::LocalOnly`]).
    pub transpilation_mode: TranspilationMode,

    /// Packages under `node_modules` to transpile in
    /// [`TranspilationMode::LocalAndDeps`] mode. Empty means all of them.
    pub deps_to_transpile: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source_maps: false,
            strip_comments: true,
            transform_html_comments: true,
            transpilation_mode: TranspilationMode::LocalOnly,
            deps_to_transpile: Vec::new(),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_maps(mut self, enabled: bool) -> Self {
        self.source_maps = enabled;
        self
    }

    pub fn strip_comments(mut self, enabled: bool) -> Self {
        self.strip_comments = enabled;
        self
    }

    pub fn transform_html_comments(mut self, enabled: bool) -> Self {
        self.transform_html_comments = enabled;
        self
    }

    pub fn transpilation_mode(mut self, mode: TranspilationMode) -> Self {
        self.transpilation_mode = mode;
        self
    }

    /// Set the dependency allow-list used in [`TranspilationMode::LocalAndDeps`].
    pub fn deps_to_transpile<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps_to_transpile = deps.into_iter().map(Into::into).collect();
        self
    }
}
