//! Shared fixtures for snapbuild-bundler integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use snapbuild_bundler::{
    BundlePlugin, Bundler, BundlerConfig, BundlerFactory, Error, Result, SourceTransform,
};
use tempfile::TempDir;

/// Something the recording bundler saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created {
        source: PathBuf,
        config: BundlerConfig,
    },
    Transform {
        name: String,
        global: bool,
        options: serde_json::Value,
    },
    Hook,
    Plugin {
        name: String,
        options: serde_json::Value,
    },
    Bundle,
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// Factory whose bundlers record every call instead of bundling.
pub struct RecordingFactory {
    pub events: EventLog,
    code: String,
    fail: bool,
}

impl RecordingFactory {
    /// Bundlers that "bundle" to `code`, passed through registered plugins.
    pub fn succeeding(code: &str) -> Self {
        Self {
            events: Arc::default(),
            code: code.to_string(),
            fail: false,
        }
    }

    /// Bundlers whose bundle step fails.
    pub fn failing() -> Self {
        Self {
            events: Arc::default(),
            code: String::new(),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl BundlerFactory for RecordingFactory {
    fn create(&self, source: &Path, config: BundlerConfig) -> Box<dyn Bundler> {
        self.events.lock().push(Event::Created {
            source: source.to_path_buf(),
            config,
        });
        Box::new(RecordingBundler {
            source: source.to_path_buf(),
            config,
            events: Arc::clone(&self.events),
            plugins: Vec::new(),
            code: self.code.clone(),
            fail: self.fail,
        })
    }
}

struct RecordingBundler {
    source: PathBuf,
    config: BundlerConfig,
    events: EventLog,
    plugins: Vec<Arc<dyn BundlePlugin>>,
    code: String,
    fail: bool,
}

#[async_trait(?Send)]
impl Bundler for RecordingBundler {
    fn source(&self) -> &Path {
        &self.source
    }

    fn config(&self) -> &BundlerConfig {
        &self.config
    }

    fn transform(&mut self, transform: Arc<dyn SourceTransform>) {
        self.events.lock().push(Event::Transform {
            name: transform.name().to_string(),
            global: transform.global(),
            options: transform.options(),
        });
    }

    fn plugin(&mut self, plugin: Arc<dyn BundlePlugin>) {
        self.events.lock().push(Event::Plugin {
            name: plugin.name().to_string(),
            options: plugin.options(),
        });
        self.plugins.push(plugin);
    }

    async fn bundle(self: Box<Self>) -> Result<Vec<u8>> {
        self.events.lock().push(Event::Bundle);
        if self.fail {
            return Err(Error::InvalidConfig("bundler exploded".to_string()));
        }
        let mut code = self.code.clone();
        for plugin in &self.plugins {
            code = plugin.process(code)?;
        }
        Ok(code.into_bytes())
    }
}

/// A scratch project with `src/index.js` containing `code`.
pub fn project_with_entry(code: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).expect("create src");
    let entry = src.join("index.js");
    std::fs::write(&entry, code).expect("write entry");
    (dir, entry)
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

/// Install a CommonJS package under `root/node_modules/name`.
pub fn install_package(root: &Path, name: &str, index: &str) {
    write_file(
        root,
        &format!("node_modules/{name}/package.json"),
        &format!(r#"{{"name": "{name}", "version": "1.0.0", "main": "index.js"}}"#),
    );
    write_file(root, &format!("node_modules/{name}/index.js"), index);
}
