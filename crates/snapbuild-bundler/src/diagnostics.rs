//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown's error types change between releases, so errors are reduced to
//! a small serializable record before they leave the bundler backend.

use serde::{Deserialize, Serialize};

/// Extracted diagnostic information from Rolldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub file: Option<String>,
    pub help: Option<String>,
}

/// Diagnostic kind (mirrors the subset of Rolldown's EventKind a Snap build can hit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    Plugin,
    Transform,
    Other(String),
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::ParseError => write!(f, "ParseError"),
            DiagnosticKind::UnresolvedEntry => write!(f, "UnresolvedEntry"),
            DiagnosticKind::UnresolvedImport => write!(f, "UnresolvedImport"),
            DiagnosticKind::Plugin => write!(f, "Plugin"),
            DiagnosticKind::Transform => write!(f, "Transform"),
            DiagnosticKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Extract diagnostics from Rolldown error types.
///
/// Works off the debug representation; batched errors are split into one
/// diagnostic per entry.
pub fn extract_from_rolldown_error(error: &dyn std::fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let error_str = format!("{error:?}");

    let parts: Vec<&str> = error_str
        .split("BatchedBuildDiagnostic")
        .filter(|s| !s.trim().is_empty())
        .collect();

    if parts.len() > 1 {
        parts.iter().map(|part| extract_single(part)).collect()
    } else {
        vec![extract_single(&error_str)]
    }
}

fn extract_single(error_str: &str) -> ExtractedDiagnostic {
    let kind = classify(error_str);
    let file = extract_file_path(error_str);
    let help = extract_help_text(error_str).or_else(|| default_help(&kind));

    ExtractedDiagnostic {
        kind,
        message: error_str.trim().to_string(),
        file,
        help,
    }
}

fn classify(error_str: &str) -> DiagnosticKind {
    if error_str.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if error_str.contains("UnresolvedImport") || error_str.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if error_str.contains("Parse error")
        || error_str.contains("Syntax")
        || error_str.contains("Expected")
        || error_str.contains("Unexpected token")
    {
        DiagnosticKind::ParseError
    } else if error_str.contains("Transform") || error_str.contains("transform") {
        DiagnosticKind::Transform
    } else if error_str.contains("Plugin") {
        DiagnosticKind::Plugin
    } else {
        DiagnosticKind::Other("BundleError".to_string())
    }
}

fn default_help(kind: &DiagnosticKind) -> Option<String> {
    match kind {
        DiagnosticKind::UnresolvedEntry => {
            Some("Check that the --src file exists and is readable.".to_string())
        }
        DiagnosticKind::UnresolvedImport => Some(
            "Install the missing dependency or fix the import specifier.".to_string(),
        ),
        _ => None,
    }
}

/// Extract file path from error message.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in &[".js", ".ts", ".mjs", ".cjs"] {
        if let Some(pos) = text.find(ext) {
            let before = &text[..pos + ext.len()];
            for indicator in &["\"", "'", "in ", "at "] {
                if let Some(start) = before.rfind(indicator) {
                    let path_str = before[start + indicator.len()..].trim();
                    if !path_str.is_empty() {
                        return Some(path_str.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Extract help text from error message.
fn extract_help_text(text: &str) -> Option<String> {
    for indicator in &["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help_str = text[pos + indicator.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            if !help_str.is_empty() {
                return Some(help_str);
            }
        }
    }
    None
}
