//! Which `node_modules` packages get transpiled.
//!
//! In [`TranspilationMode::LocalAndDeps`] mode the transpiler runs over
//! dependencies too. A non-empty `deps_to_transpile` narrows that down: any
//! module below a `node_modules/` directory whose package is not on the list
//! is ignored.

use crate::options::{BuildOptions, TranspilationMode};
use regex::Regex;

const NODE_MODULES_SEGMENT: &str = "/node_modules/";

/// Ignore rule handed to the transpiler.
///
/// A module path is ignored when some `/node_modules/` segment in it is not
/// immediately followed by one of the allowed package names.
#[derive(Debug, Clone)]
pub struct DependencyFilter {
    allowed: Regex,
    packages: Vec<String>,
}

impl DependencyFilter {
    fn new(packages: Vec<String>) -> Option<Self> {
        let alternation = packages
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let allowed = Regex::new(&format!("^(?:{alternation})")).ok()?;
        Some(Self { allowed, packages })
    }

    /// Package names (sanitized) this filter lets through.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Returns true if the transpiler should skip this module.
    pub fn is_ignored(&self, path: &str) -> bool {
        let normalized = path.replace('\\', "/");
        normalized
            .match_indices(NODE_MODULES_SEGMENT)
            .any(|(idx, seg)| !self.allowed.is_match(&normalized[idx + seg.len()..]))
    }
}

impl PartialEq for DependencyFilter {
    fn eq(&self, other: &Self) -> bool {
        self.packages == other.packages
    }
}

/// Transpiler settings derived from [`BuildOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranspileOverrides {
    pub ignore: Option<DependencyFilter>,
}

/// Strip leading and trailing path separators from each dependency name.
pub fn sanitize_dependency_paths(deps: &[String]) -> Vec<String> {
    deps.iter()
        .map(|dep| dep.trim_matches(|c| c == '/' || c == '\\').to_string())
        .collect()
}

/// Build the ignore filter for a dependency allow-list.
///
/// Returns `None` when every dependency should be transpiled: the list is
/// empty, or it contains `"."`.
pub fn dependency_filter(deps: &[String]) -> Option<DependencyFilter> {
    if deps.is_empty() || deps.iter().any(|d| d == ".") {
        return None;
    }
    let sanitized = sanitize_dependency_paths(deps);
    DependencyFilter::new(sanitized)
}

/// Compute transpiler overrides for a build.
pub fn process_dependencies(options: &BuildOptions) -> TranspileOverrides {
    match options.transpilation_mode {
        TranspilationMode::LocalAndDeps => TranspileOverrides {
            ignore: dependency_filter(&options.deps_to_transpile),
        },
        TranspilationMode::None | TranspilationMode::LocalOnly => TranspileOverrides::default(),
    }
}
