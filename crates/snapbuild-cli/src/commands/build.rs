//! `snapbuild build`.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::SnapConfig;
use crate::error::{CliError, Result};
use crate::ui;
use snapbuild_bundler::BundleOutcome;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the build command.
///
/// 1. Load and validate configuration (CLI > Env > File > Defaults)
/// 2. Check the source file and prepare the output directory
/// 3. Run the bundle orchestrator
/// 4. Report the written file
///
/// A failed bundle is returned as an error so the process exits non-zero.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let root = utils::project_root(args.cwd.as_deref())?;
    let config = SnapConfig::load(&args, &root)?;
    config.validate()?;

    let report = run(&config, &root).await?;
    tracing::debug!(
        destination = %report.destination.display(),
        bytes = report.bytes,
        "Build finished"
    );
    Ok(())
}

/// A successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub destination: PathBuf,
    pub bytes: usize,
}

/// Build once with a loaded configuration. Shared with `watch`.
pub(crate) async fn run(config: &SnapConfig, root: &Path) -> Result<BuildReport> {
    let start_time = Instant::now();

    let (source, destination) = config.resolve_paths(root);

    utils::validate_entry(&source)?;
    if let Some(out_dir) = destination.parent() {
        utils::ensure_output_dir(out_dir)?;
    }

    ui::info(&format!(
        "Building {} (transpilation: {})",
        utils::display_relative(&source, root),
        snapbuild_bundler::TranspilationMode::from(config.transpilation_mode)
    ));

    let options = config.to_build_options();
    tracing::debug!(?options, "Build options");

    match snapbuild_bundler::bundle(&source, &destination, &options, None).await {
        BundleOutcome::Written { path, bytes } => {
            ui::success(&format!(
                "Wrote {} ({}) in {}",
                utils::display_relative(&path, root),
                ui::format_size(bytes as u64),
                ui::format_duration(start_time.elapsed())
            ));
            Ok(BuildReport {
                destination: path,
                bytes,
            })
        }
        BundleOutcome::Failed { error } => Err(CliError::Bundle(error)),
    }
}
