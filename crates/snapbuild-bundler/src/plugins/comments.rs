//! JavaScript comment removal.
//!
//! The bundle is parsed with oxc and the comment spans the parser collected
//! are cut out of the text. Everything else, including string, template and
//! regular-expression literals, is copied through byte for byte. Inline
//! source map comments are kept.

use oxc_allocator::Allocator;
use oxc_parser::{ParseOptions, Parser, ParserReturn};
use oxc_span::SourceType;

use crate::{Error, Result};

const SOURCE_MAP_MARKERS: &[&str] = &["//# sourceMappingURL=", "//@ sourceMappingURL="];

/// Remove `//` and `/* */` comments from JavaScript source.
///
/// A block comment spanning lines becomes a newline, any other comment a
/// single space, so adjacent tokens never merge. Source that does not parse
/// is an error rather than a guess.
pub fn strip_comments(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, source, SourceType::cjs())
        .with_options(ParseOptions {
            allow_return_outside_function: true,
            ..ParseOptions::default()
        })
        .parse();

    if panicked || !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        return Err(Error::PostProcess(format!(
            "Cannot strip comments, bundle does not parse: {message}"
        )));
    }

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for comment in program.comments.iter() {
        let text = comment.span.source_text(source);
        if SOURCE_MAP_MARKERS.iter().any(|m| text.starts_with(m)) {
            continue;
        }
        let (start, end) = (comment.span.start as usize, comment.span.end as usize);
        out.push_str(&source[last..start]);
        if comment.is_block() && text.contains('\n') {
            out.push('\n');
        } else {
            out.push(' ');
        }
        last = end;
    }
    out.push_str(&source[last..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(source: &str) -> String {
        strip_comments(source).unwrap()
    }

    #[test]
    fn test_removes_line_and_block_comments() {
        assert_eq!(strip("a(); // trailing\nb();"), "a(); \nb();");
        assert_eq!(strip("a(/* x */1);"), "a( 1);");
        assert_eq!(strip("a();\n/**\n * doc\n */\nb();"), "a();\n\nb();");
    }

    #[test]
    fn test_comment_does_not_merge_tokens() {
        assert_eq!(strip("return/**/x"), "return x");
        assert_eq!(strip("a/*\n*/b"), "a\nb");
    }

    #[test]
    fn test_keeps_comment_markers_in_strings() {
        let src = r#"const u = "http://x.com/*y*/"; const s = '//no';"#;
        assert_eq!(strip(src), src);
    }

    #[test]
    fn test_keeps_escaped_quotes() {
        let src = r#"const s = "a\"//b"; // gone"#;
        assert_eq!(strip(src), r#"const s = "a\"//b"; "#);
    }

    #[test]
    fn test_template_literals_and_substitutions() {
        let src = "const t = `a // b ${ x /* c */ + `//${y}` } /* d */`;";
        assert_eq!(strip(src), "const t = `a // b ${ x  + `//${y}` } /* d */`;");
    }

    #[test]
    fn test_object_braces_inside_substitution() {
        let src = "`${ {a: 1}.a }` // c";
        assert_eq!(strip(src), "`${ {a: 1}.a }` ");
    }

    #[test]
    fn test_regex_literals_survive() {
        let src = r"const re = /\/\/[/*]+/g; x = a / b; // c";
        assert_eq!(strip(src), r"const re = /\/\/[/*]+/g; x = a / b; ");
        assert_eq!(strip("return /a*/.test(s)"), "return /a*/.test(s)");
    }

    #[test]
    fn test_regex_after_if_condition_survives() {
        let src = "if (ok) /^\\/*$/.test(p) && run(); // go\nnext();";
        assert_eq!(strip(src), "if (ok) /^\\/*$/.test(p) && run(); \nnext();");
    }

    #[test]
    fn test_division_is_not_regex() {
        assert_eq!(strip("x = (a) / 2 // half"), "x = (a) / 2 ");
    }

    #[test]
    fn test_keeps_source_map_comment() {
        let src = "a();\n//# sourceMappingURL=data:application/json;base64,e30=";
        assert_eq!(strip(src), src);
        let legacy = "a();\n//@ sourceMappingURL=bundle.js.map";
        assert_eq!(strip(legacy), legacy);
    }

    #[test]
    fn test_unparsable_source_is_error() {
        let err = strip_comments("a(); /* open").unwrap_err();
        assert!(matches!(err, Error::PostProcess(_)));
        assert!(err.to_string().contains("does not parse"));
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(strip("const s = 'héllo'; // ünï"), "const s = 'héllo'; ");
        assert_eq!(strip("/* ü */ f('é');"), "  f('é');");
    }
}
