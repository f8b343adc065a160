//! File system watcher for `snapbuild watch`.
//!
//! Watches the project root and forwards changes to Snap sources, skipping
//! dependencies, build output and hidden paths.

use crate::error::{CliError, Result, ResultExt};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Extensions that can affect the bundle.
pub const WATCHED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "json"];

/// A change to a watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive watcher feeding a channel of [`FileChange`]s.
///
/// Repeated events for the same path inside the debounce window are dropped.
/// The watch stops when this value is dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`.
    ///
    /// `ignore` holds paths relative to `root` (`dist`, `node_modules`) or
    /// extension patterns (`*.map`).
    pub fn new(
        root: PathBuf,
        ignore: Vec<String>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !std::fs::metadata(&root).with_path(&root)?.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "Watch root is not a directory: {}",
                root.display()
            )));
        }

        let (tx, rx) = mpsc::channel(100);

        let mut last_event: Option<(PathBuf, Instant)> = None;
        let handler_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("File watcher error: {}", e);
                    return;
                }
            };

            for path in &event.paths {
                if should_ignore(path, &handler_root, &ignore) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // The receiver is gone once the watch loop exits.
                let _ = tx.blocking_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether a change under `root` should be dropped.
pub fn should_ignore(path: &Path, root: &Path, ignore: &[String]) -> bool {
    let Ok(rel_path) = path.strip_prefix(root) else {
        return true;
    };

    let is_source = rel_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext));
    if !is_source {
        return true;
    }

    let path_str = rel_path.to_string_lossy().replace('\\', "/");

    for pattern in ignore {
        if let Some(ext) = pattern.strip_prefix('*') {
            if path_str.ends_with(ext) {
                return true;
            }
        } else {
            let pattern = pattern.trim_end_matches('/');
            if path_str == pattern
                || path_str.starts_with(&format!("{}/", pattern))
                || path_str.contains(&format!("/{}/", pattern))
            {
                return true;
            }
        }
    }

    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
