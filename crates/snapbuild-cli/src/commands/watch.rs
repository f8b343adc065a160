//! `snapbuild watch`.

use crate::cli::WatchArgs;
use crate::commands::{build, utils};
use crate::config::SnapConfig;
use crate::error::{Result, ResultExt};
use crate::ui;
use crate::watcher::{FileChange, FileWatcher};
use std::path::Path;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// Execute the watch command.
///
/// Builds once, then rebuilds after each batch of source changes until
/// Ctrl+C. Build failures are reported and the watch keeps running;
/// configuration errors end it. Rebuilds run one at a time.
pub async fn execute(args: WatchArgs) -> Result<()> {
    let root = utils::project_root(args.build.cwd.as_deref())?;
    let config = SnapConfig::load(&args.build, &root)?;
    config.validate()?;

    rebuild(&config, &root).await;

    let debounce = Duration::from_millis(args.debounce_ms);
    let (watcher, mut change_rx) = FileWatcher::new(root.clone(), ignore_patterns(&config), debounce)
        .with_hint("On Linux, raise fs.inotify.max_user_watches if the watch limit is reached")?;

    ui::info(&format!("Watching for changes in {}", watcher.root().display()));
    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            change = change_rx.recv() => {
                let Some(change) = change else {
                    ui::warning("File watcher stopped");
                    break;
                };
                let skipped = drain_batch(&mut change_rx, debounce).await;
                ui::info(&describe(&change, skipped, &root));
                rebuild(&config, &root).await;
            }

            _ = signal::ctrl_c() => {
                ui::info("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

async fn rebuild(config: &SnapConfig, root: &Path) {
    match build::run(config, root).await {
        Ok(report) => tracing::debug!(
            destination = %report.destination.display(),
            bytes = report.bytes,
            "Rebuild finished"
        ),
        Err(e) => ui::error(&format!("Build failed: {}", e)),
    }
}

/// Wait out the debounce window, swallowing changes that arrive in it.
async fn drain_batch(rx: &mut mpsc::Receiver<FileChange>, debounce: Duration) -> usize {
    let mut skipped = 0;
    let deadline = tokio::time::Instant::now() + debounce;

    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(_)) => skipped += 1,
            Ok(None) | Err(_) => break,
        }
    }

    skipped
}

/// Paths the watcher skips: build output and dependencies.
fn ignore_patterns(config: &SnapConfig) -> Vec<String> {
    let mut patterns = vec!["node_modules".to_string()];
    if config.dist.is_relative() {
        let dist = config.dist.to_string_lossy().replace('\\', "/");
        let dist = dist.trim_start_matches("./").trim_end_matches('/');
        if !dist.is_empty() && dist != "." {
            patterns.push(dist.to_string());
        }
    }
    patterns.push("*.map".to_string());
    patterns
}

fn describe(change: &FileChange, skipped: usize, root: &Path) -> String {
    let verb = match change {
        FileChange::Modified(_) => "changed",
        FileChange::Created(_) => "created",
        FileChange::Removed(_) => "removed",
    };
    let path = utils::display_relative(change.path(), root);

    match skipped {
        0 => format!("File {}: {}", verb, path),
        n => format!("File {}: {} (+{} more)", verb, path, n),
    }
}
