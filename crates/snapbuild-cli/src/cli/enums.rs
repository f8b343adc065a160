use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which sources are run through the transpiler
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TranspilationMode {
    /// Bundle sources as written
    #[value(name = "none")]
    None,

    /// Transpile the project's own files only
    #[value(name = "localOnly")]
    LocalOnly,

    /// Transpile project files and dependencies
    ///
    /// Restricted to the packages in --deps-to-transpile when given.
    #[value(name = "localAndDeps")]
    LocalAndDeps,
}
