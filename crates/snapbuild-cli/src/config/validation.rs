use crate::cli::{TranspilationMode, parse_dependency, parse_outfile_name};
use crate::config::SnapConfig;
use crate::error::{ConfigError, Result};

impl SnapConfig {
    /// Validate configuration for logical consistency.
    ///
    /// Flags are checked by clap at parse time; this repeats the checks for
    /// values that came from the config file or the environment.
    pub fn validate(&self) -> Result<()> {
        if let Err(hint) = parse_outfile_name(&self.outfile_name) {
            return Err(ConfigError::InvalidValue {
                field: "outfileName".to_string(),
                value: self.outfile_name.clone(),
                hint,
            }
            .into());
        }

        if self.src.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "src".to_string(),
                value: String::new(),
                hint: "Point src at the Snap's entry file".to_string(),
            }
            .into());
        }

        if !self.deps_to_transpile.is_empty()
            && self.transpilation_mode != TranspilationMode::LocalAndDeps
        {
            return Err(ConfigError::ConflictingOptions(format!(
                "depsToTranspile requires transpilationMode localAndDeps (got {})",
                mode_name(self.transpilation_mode)
            ))
            .into());
        }

        for dep in &self.deps_to_transpile {
            if let Err(hint) = parse_dependency(dep) {
                return Err(ConfigError::InvalidValue {
                    field: "depsToTranspile".to_string(),
                    value: dep.clone(),
                    hint,
                }
                .into());
            }
        }

        Ok(())
    }
}

fn mode_name(mode: TranspilationMode) -> &'static str {
    snapbuild_bundler::TranspilationMode::from(mode).as_str()
}
