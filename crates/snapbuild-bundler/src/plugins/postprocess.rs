//! Rewrites that make a bundle acceptable to SES.
//!
//! SES rejects source containing the `import(` and `eval(` tokens in forms it
//! can mistake for dynamic import or direct eval, as well as HTML comment
//! tokens. The rules below rewrite those into equivalent code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::comments::strip_comments;
use crate::bundler::BundlePlugin;
use crate::{Error, Result};

static IMPORT_MEMBER_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.import\(").expect("static regex"));

static MEMBER_EVAL_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:\b[\w\d]*[\]\)]?\.)+eval)(\([^)]*\))").expect("static regex")
});

static DIRECT_EVAL_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\b)(eval)(\([^)]*\))").expect("static regex"));

static BUFFER_WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\(function \(Buffer\)\{$").expect("static regex"));

const REGENERATOR_DECLARATION: &str = "var regeneratorRuntime;\n";

/// Which optional rewrites to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessOptions {
    pub strip_comments: bool,
    pub transform_html_comments: bool,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            strip_comments: true,
            transform_html_comments: true,
        }
    }
}

/// Post-process bundled code.
///
/// Fails if nothing is left once comments and whitespace are gone.
pub fn post_process(code: &str, options: &PostProcessOptions) -> Result<String> {
    let mut processed = code.trim().to_string();

    if options.strip_comments {
        processed = strip_comments(&processed)?;
    }

    processed = IMPORT_MEMBER_CALL
        .replace_all(&processed, r#"["import"]("#)
        .into_owned();

    // Member calls first. Once wrapped, `eval` is followed by `)` and the
    // direct-call rule no longer matches it.
    processed = MEMBER_EVAL_CALL
        .replace_all(&processed, "(1, ${1})${2}")
        .into_owned();
    processed = DIRECT_EVAL_CALL
        .replace_all(&processed, "${1}(1, ${2})${3}")
        .into_owned();

    if options.transform_html_comments {
        processed = processed.replace("<!--", "< !--").replace("-->", "-- >");
    }

    processed = BUFFER_WRAPPER
        .replace_all(&processed, "(function (){")
        .into_owned();

    if processed.trim().is_empty() {
        return Err(Error::PostProcess(
            "Bundled code is empty after postprocessing.".to_string(),
        ));
    }

    if processed.contains("regeneratorRuntime") {
        processed.insert_str(0, REGENERATOR_DECLARATION);
    }

    Ok(processed)
}

/// [`BundlePlugin`] wrapper around [`post_process`].
#[derive(Debug, Clone, Default)]
pub struct PostProcessPlugin {
    options: PostProcessOptions,
}

impl PostProcessPlugin {
    pub fn new(options: PostProcessOptions) -> Self {
        Self { options }
    }

    pub fn post_process_options(&self) -> &PostProcessOptions {
        &self.options
    }
}

impl BundlePlugin for PostProcessPlugin {
    fn name(&self) -> &str {
        "snaps-post-process"
    }

    fn process(&self, code: String) -> Result<String> {
        let before = code.len();
        let processed = post_process(&code, &self.options)?;
        debug!(before, after = processed.len(), "post-processed bundle");
        Ok(processed)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(self.options).unwrap_or(serde_json::Value::Null)
    }
}
