use std::path::PathBuf;

use crate::config::TranspilationMode;

pub fn default_src() -> PathBuf {
    PathBuf::from("src/index.js")
}

pub fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_outfile_name() -> String {
    "bundle.js".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_transpilation_mode() -> TranspilationMode {
    TranspilationMode::LocalOnly
}
