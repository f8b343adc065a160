use crate::cli::TranspilationMode;

impl From<TranspilationMode> for snapbuild_bundler::TranspilationMode {
    fn from(mode: TranspilationMode) -> Self {
        match mode {
            TranspilationMode::None => snapbuild_bundler::TranspilationMode::None,
            TranspilationMode::LocalOnly => snapbuild_bundler::TranspilationMode::LocalOnly,
            TranspilationMode::LocalAndDeps => snapbuild_bundler::TranspilationMode::LocalAndDeps,
        }
    }
}
