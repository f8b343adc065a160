use crate::cli::{BuildArgs, TranspilationMode};
use crate::config::SnapConfig;
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the project root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "snap.config.json";

/// Prefix of the environment variables read into the config.
pub const ENV_PREFIX: &str = "SNAPBUILD_";

/// Flags that were actually passed on the command line.
///
/// Unset flags are skipped during serialization so they do not shadow lower
/// layers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    src: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dist: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outfile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_maps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strip_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transform_html_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transpilation_mode: Option<TranspilationMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deps_to_transpile: Vec<String>,
}

impl From<&BuildArgs> for CliOverrides {
    fn from(args: &BuildArgs) -> Self {
        Self {
            src: args.src.clone(),
            dist: args.dist.clone(),
            outfile_name: args.outfile_name.clone(),
            source_maps: args.source_maps,
            strip_comments: args.strip_comments,
            transform_html_comments: args.transform_html_comments,
            transpilation_mode: args.transpilation_mode,
            deps_to_transpile: args.deps_to_transpile.clone(),
        }
    }
}

impl SnapConfig {
    /// Load configuration for the project rooted at `root`.
    ///
    /// Priority: CLI args > environment variables > config file > defaults.
    /// An explicit `--config` path must exist; the default
    /// `snap.config.json` is optional.
    pub fn load(args: &BuildArgs, root: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = Self::config_file(args, root)? {
            tracing::debug!("Loading config from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // SNAPBUILD_OUTFILE_NAME -> outfileName
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| snake_to_camel(key.as_str()).into())
                .lowercase(false),
        );

        figment = figment.merge(Serialized::defaults(CliOverrides::from(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
            }
            .into()
        })
    }

    fn config_file(args: &BuildArgs, root: &Path) -> Result<Option<PathBuf>> {
        match &args.config {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Ok(Some(path))
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                Ok(default_path.is_file().then_some(default_path))
            }
        }
    }

    /// Default configuration values.
    pub(crate) fn default_config() -> Self {
        use crate::config::defaults::*;

        Self {
            src: default_src(),
            dist: default_dist(),
            outfile_name: default_outfile_name(),
            source_maps: false,
            strip_comments: true,
            transform_html_comments: true,
            transpilation_mode: default_transpilation_mode(),
            deps_to_transpile: Vec::new(),
        }
    }
}

/// `outfile_name` -> `outfileName`. Input is lowercased first.
pub(crate) fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}
