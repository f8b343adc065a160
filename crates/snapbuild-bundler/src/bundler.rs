//! The bundler surface the orchestrator configures, and its Rolldown backend.
//!
//! A [`Bundler`] takes source transforms and output plugins, then runs once.
//! [`RolldownBundler`] maps that onto Rolldown, adapting each [`SourceTransform`] into a Rolldown `transform` hook and
//! running every [`BundlePlugin`] over the generated entry chunk.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use oxc_sourcemap::SourceMap;
use path_clean::PathClean;
use rolldown::{
    BundlerBuilder as RolldownBundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform,
    ResolveOptions, SourceMapType,
};
use rolldown_common::{ModuleType, Output};
use rolldown_plugin::{
    __inner::SharedPluginable, HookTransformArgs, HookTransformOutput, HookTransformReturn,
    HookUsage, Plugin, SharedTransformPluginContext,
};
use tracing::{debug, trace};

use crate::diagnostics::{DiagnosticKind, ExtractedDiagnostic};
use crate::{Error, Result};

/// Name of the UMD global the bundle registers itself under.
pub const STANDALONE_NAME: &str = "snap";

const BROWSER_CONDITIONS: &[&str] = &["browser", "import", "require", "module", "default"];
const BROWSER_MAIN_FIELDS: &[&str] = &["browser", "module", "main"];
const RESOLVE_EXTENSIONS: &[&str] = &[".js", ".json", ".mjs", ".cjs", ".ts"];

/// Settings a bundler is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundlerConfig {
    /// Inline source maps into the bundle.
    pub source_maps: bool,
    /// Global name for the standalone (UMD) wrapper.
    pub standalone: &'static str,
}

impl BundlerConfig {
    pub fn new(source_maps: bool) -> Self {
        Self {
            source_maps,
            standalone: STANDALONE_NAME,
        }
    }
}

/// Rewritten module text and, when the rewrite can produce one, a map back
/// to the text it was given.
#[derive(Debug, Clone)]
pub struct TransformedSource {
    pub code: String,
    pub map: Option<SourceMap>,
}

impl TransformedSource {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            map: None,
        }
    }

    pub fn with_map(mut self, map: Option<SourceMap>) -> Self {
        self.map = map;
        self
    }
}

/// A per-module source rewrite run while the bundle is assembled.
pub trait SourceTransform: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Whether this module id should be handed to [`SourceTransform::transform`].
    fn applies_to(&self, id: &str) -> bool;

    /// Rewrite a module. `Ok(None)` leaves it untouched.
    ///
    /// A returned map is chained by Rolldown into the bundle's source map.
    fn transform(&self, id: &str, code: &str) -> Result<Option<TransformedSource>>;

    /// Global transforms also run on modules below `node_modules`.
    fn global(&self) -> bool {
        false
    }

    /// Effective configuration, for logging and inspection.
    fn options(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// A rewrite of the finished bundle text.
pub trait BundlePlugin: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn process(&self, code: String) -> Result<String>;

    fn options(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// A single-use bundler instance.
///
/// Transforms and plugins run in the order they were registered.
#[async_trait(?Send)]
pub trait Bundler: Send {
    /// Entry file this bundler was created for.
    fn source(&self) -> &Path;

    fn config(&self) -> &BundlerConfig;

    fn transform(&mut self, transform: Arc<dyn SourceTransform>);

    fn plugin(&mut self, plugin: Arc<dyn BundlePlugin>);

    /// Consume the bundler and produce the bundle bytes.
    async fn bundle(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Creates bundler instances.
pub trait BundlerFactory: Send + Sync {
    fn create(&self, source: &Path, config: BundlerConfig) -> Box<dyn Bundler>;
}

/// Caller-supplied customization applied before the output plugin is attached.
pub trait BundlerHook: Send + Sync {
    fn customize(&self, bundler: &mut dyn Bundler);
}

impl<F> BundlerHook for F
where
    F: Fn(&mut dyn Bundler) + Send + Sync,
{
    fn customize(&self, bundler: &mut dyn Bundler) {
        self(bundler)
    }
}

/// Factory for [`RolldownBundler`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownFactory;

impl BundlerFactory for RolldownFactory {
    fn create(&self, source: &Path, config: BundlerConfig) -> Box<dyn Bundler> {
        Box::new(RolldownBundler::new(source, config))
    }
}

/// [`Bundler`] backed by Rolldown, emitting a single UMD bundle.
#[derive(Debug)]
pub struct RolldownBundler {
    source: PathBuf,
    config: BundlerConfig,
    transforms: Vec<Arc<dyn SourceTransform>>,
    plugins: Vec<Arc<dyn BundlePlugin>>,
}

impl RolldownBundler {
    pub fn new(source: impl AsRef<Path>, config: BundlerConfig) -> Self {
        Self {
            source: absolute_entry_path(source.as_ref()),
            config,
            transforms: Vec::new(),
            plugins: Vec::new(),
        }
    }

    fn bundler_options(&self) -> BundlerOptions {
        let cwd = self
            .source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        BundlerOptions {
            input: Some(vec![InputItem {
                name: None,
                import: self.source.to_string_lossy().into_owned(),
            }]),
            cwd: Some(cwd),
            format: Some(OutputFormat::Umd),
            name: Some(self.config.standalone.to_string()),
            platform: Some(Platform::Browser),
            sourcemap: self.config.source_maps.then_some(SourceMapType::Inline),
            resolve: Some(browser_resolution()),
            ..Default::default()
        }
    }

    fn rolldown_plugins(&self) -> Vec<SharedPluginable> {
        self.transforms
            .iter()
            .map(|t| Arc::new(TransformAdapterPlugin::new(Arc::clone(t))) as SharedPluginable)
            .collect()
    }
}

#[async_trait(?Send)]
impl Bundler for RolldownBundler {
    fn source(&self) -> &Path {
        &self.source
    }

    fn config(&self) -> &BundlerConfig {
        &self.config
    }

    fn transform(&mut self, transform: Arc<dyn SourceTransform>) {
        debug!(transform = transform.name(), "registering source transform");
        self.transforms.push(transform);
    }

    fn plugin(&mut self, plugin: Arc<dyn BundlePlugin>) {
        debug!(plugin = plugin.name(), "registering bundle plugin");
        self.plugins.push(plugin);
    }

    async fn bundle(self: Box<Self>) -> Result<Vec<u8>> {
        if !tokio::fs::try_exists(&self.source).await.unwrap_or(false) {
            return Err(Error::Bundler(vec![ExtractedDiagnostic {
                kind: DiagnosticKind::UnresolvedEntry,
                message: format!("Cannot find entry module '{}'", self.source.display()),
                file: Some(self.source.to_string_lossy().into_owned()),
                help: Some("Check that the --src file exists and is readable.".to_string()),
            }]));
        }

        let mut bundler = RolldownBundlerBuilder::default()
            .with_options(self.bundler_options())
            .with_plugins(self.rolldown_plugins())
            .build()
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let output = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let mut code = entry_chunk_code(&output.assets).ok_or_else(|| {
            Error::Bundler(vec![ExtractedDiagnostic {
                kind: DiagnosticKind::Other("EmptyOutput".to_string()),
                message: "Rolldown produced no JavaScript chunk".to_string(),
                file: Some(self.source.to_string_lossy().into_owned()),
                help: None,
            }])
        })?;

        for plugin in &self.plugins {
            trace!(plugin = plugin.name(), bytes = code.len(), "running bundle plugin");
            code = plugin.process(code)?;
        }

        Ok(code.into_bytes())
    }
}

/// Rolldown `transform` hook wrapping a [`SourceTransform`].
#[derive(Debug)]
pub struct TransformAdapterPlugin {
    inner: Arc<dyn SourceTransform>,
}

impl TransformAdapterPlugin {
    pub fn new(inner: Arc<dyn SourceTransform>) -> Self {
        Self { inner }
    }

    fn should_run(&self, id: &str) -> bool {
        // Virtual modules start with a NUL byte.
        if id.starts_with('\0') {
            return false;
        }
        if is_dependency(id) && !self.inner.global() {
            return false;
        }
        self.inner.applies_to(id)
    }
}

impl Plugin for TransformAdapterPlugin {
    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("snapbuild:{}", self.inner.name()))
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let id = args.id.to_string();
        let code = args.code.to_string();
        let run = self.should_run(&id);
        let inner = Arc::clone(&self.inner);

        async move {
            if !run {
                return Ok(None);
            }

            let transformed = inner
                .transform(&id, &code)
                .with_context(|| format!("{} failed on {}", inner.name(), id))?;

            match transformed {
                Some(TransformedSource { code, map }) => Ok(Some(HookTransformOutput {
                    code: Some(code),
                    map,
                    side_effects: None,
                    module_type: Some(ModuleType::Js),
                })),
                None => Ok(None),
            }
        }
    }
}

/// True if the module lives below a `node_modules` directory.
pub(crate) fn is_dependency(id: &str) -> bool {
    Path::new(id)
        .components()
        .any(|c| c.as_os_str() == "node_modules")
}

fn absolute_entry_path(source: &Path) -> PathBuf {
    let absolute = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
    absolute.clean()
}

fn browser_resolution() -> ResolveOptions {
    let to_vec = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

    ResolveOptions {
        main_fields: Some(to_vec(BROWSER_MAIN_FIELDS)),
        condition_names: Some(to_vec(BROWSER_CONDITIONS)),
        extensions: Some(to_vec(RESOLVE_EXTENSIONS)),
        symlinks: Some(true),
        ..Default::default()
    }
}

fn entry_chunk_code(assets: &[Output]) -> Option<String> {
    let chunks = || {
        assets.iter().filter_map(|asset| match asset {
            Output::Chunk(chunk) => Some(chunk),
            Output::Asset(_) => None,
        })
    };

    chunks()
        .find(|chunk| chunk.is_entry)
        .or_else(|| chunks().next())
        .map(|chunk| chunk.code.clone())
}
