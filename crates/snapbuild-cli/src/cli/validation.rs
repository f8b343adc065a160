/// Parse the bundle file name.
///
/// The name is joined onto the output directory, so it must be a bare file
/// name ending in `.js`.
///
/// # Errors
///
/// Returns an error message for empty names, names containing a path
/// separator, and names without a `.js` extension.
pub fn parse_outfile_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Outfile name cannot be empty".to_string());
    }

    if s.contains('/') || s.contains('\\') {
        return Err(format!(
            "Outfile name must be a file name, not a path: '{}'",
            s
        ));
    }

    if !s.ends_with(".js") || s == ".js" {
        return Err(format!("Outfile name must end in .js: '{}'", s));
    }

    Ok(s.to_string())
}

/// Parse a dependency name for `--deps-to-transpile`.
///
/// Accepts package names (`lodash`, `@scope/pkg`) and `.`, which disables
/// filtering.
pub fn parse_dependency(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Dependency name cannot be empty".to_string());
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(format!(
            "Dependency name cannot contain whitespace: '{}'",
            s
        ));
    }

    Ok(trimmed.to_string())
}
