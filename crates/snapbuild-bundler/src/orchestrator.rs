//! Bundle orchestration.
//!
//! Wires a bundler up for a Snap build and hands the result to the writer:
//!
//! 1. create the bundler (`source_maps`, standalone name `snap`)
//! 2. attach the transpile transform unless the mode is `none`
//! 3. run the caller's hook, if any
//! 4. attach the post-processing plugin
//! 5. bundle and write

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use crate::Error;
use crate::bundler::{BundlerConfig, BundlerFactory, BundlerHook, RolldownFactory, SourceTransform};
use crate::deps::process_dependencies;
use crate::options::{BuildOptions, TranspilationMode};
use crate::plugins::{PostProcessOptions, PostProcessPlugin};
use crate::transpile::{TranspileConfig, TranspileTransform};
use crate::writer::{BundleWrite, write_bundle_file};

/// Result of a bundle call.
#[derive(Debug)]
pub enum BundleOutcome {
    /// The bundle was written.
    Written { path: PathBuf, bytes: usize },
    /// Bundling or writing failed. Already logged.
    Failed { error: Error },
}

impl BundleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BundleOutcome::Written { .. })
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            BundleOutcome::Failed { error } => Some(error),
            BundleOutcome::Written { .. } => None,
        }
    }

    pub fn into_result(self) -> crate::Result<PathBuf> {
        match self {
            BundleOutcome::Written { path, .. } => Ok(path),
            BundleOutcome::Failed { error } => Err(error),
        }
    }
}

/// Bundle `source` into `destination` with Rolldown.
pub async fn bundle(
    source: &Path,
    destination: &Path,
    options: &BuildOptions,
    hook: Option<&dyn BundlerHook>,
) -> BundleOutcome {
    bundle_with(&RolldownFactory, source, destination, options, hook).await
}

/// Like [`bundle`], with an explicit bundler factory.
pub async fn bundle_with(
    factory: &dyn BundlerFactory,
    source: &Path,
    destination: &Path,
    options: &BuildOptions,
    hook: Option<&dyn BundlerHook>,
) -> BundleOutcome {
    let span = info_span!(
        "bundle",
        source = %source.display(),
        destination = %destination.display()
    );

    async move {
        let mut bundler = factory.create(source, BundlerConfig::new(options.source_maps));

        if let Some(transform) = transpile_transform(options) {
            debug!(options = %transform.options(), "attaching transpile transform");
            bundler.transform(Arc::new(transform));
        }

        if let Some(hook) = hook {
            debug!("running bundler hook");
            hook.customize(&mut *bundler);
        }

        let post_process = PostProcessOptions {
            strip_comments: options.strip_comments,
            transform_html_comments: options.transform_html_comments,
        };
        debug!(?post_process, "attaching post-process plugin");
        bundler.plugin(Arc::new(PostProcessPlugin::new(post_process)));

        let result = bundler.bundle().await;
        write_bundle_file(BundleWrite::from_result(result, source, destination)).await
    }
    .instrument(span)
    .await
}

fn transpile_transform(options: &BuildOptions) -> Option<TranspileTransform> {
    let global = match options.transpilation_mode {
        TranspilationMode::None => return None,
        TranspilationMode::LocalOnly => false,
        TranspilationMode::LocalAndDeps => true,
    };
    let config = TranspileConfig::new(global)
        .with_overrides(process_dependencies(options))
        .with_source_map(options.source_maps);
    Some(TranspileTransform::new(config))
}
