use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{HelperLoaderMode, TransformOptions, Transformer};

use super::{SyntaxPlugin, TranspileConfig};
use crate::bundler::TransformedSource;
use crate::{Error, Result};

const RUNTIME_MODULE: &str = "@babel/runtime";

/// Lower a single module to the configured browser baseline.
///
/// A module without `import`/`export` is parsed as a script, so helpers it
/// needs are pulled in with `require` and `module.exports` keeps working.
pub fn lower(path: &Path, code: &str, config: &TranspileConfig) -> Result<TransformedSource> {
    let file = path.to_string_lossy().into_owned();
    let options = transform_options(config)?;

    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path)
        .unwrap_or_else(|_| SourceType::mjs())
        .with_unambiguous(true);

    let ParserReturn {
        mut program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, code, source_type).parse();

    if panicked || !errors.is_empty() {
        return Err(Error::Transform {
            file,
            message: join_messages(errors.iter()),
        });
    }

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let ret = Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(Error::Transform {
            file,
            message: join_messages(ret.errors.iter()),
        });
    }

    let codegen = Codegen::new()
        .with_options(CodegenOptions {
            source_map_path: config.source_map.then(|| path.to_path_buf()),
            ..CodegenOptions::default()
        })
        .build(&program);

    Ok(TransformedSource::new(codegen.code).with_map(codegen.map))
}

fn transform_options(config: &TranspileConfig) -> Result<TransformOptions> {
    let mut options = match config.target() {
        Some(target) => TransformOptions::from_target(&target).map_err(Error::InvalidConfig)?,
        None => TransformOptions::default(),
    };

    for plugin in config.plugins {
        match plugin {
            SyntaxPlugin::TransformRuntime => {
                options.helper_loader.mode = HelperLoaderMode::Runtime;
                options.helper_loader.module_name = RUNTIME_MODULE.into();
            }
            SyntaxPlugin::ClassProperties => {
                options.env.es2022.class_properties = Some(Default::default());
            }
            SyntaxPlugin::ObjectRestSpread => {
                options.env.es2018.object_rest_spread = Some(Default::default());
            }
            SyntaxPlugin::OptionalChaining => {
                options.env.es2020.optional_chaining = true;
            }
            SyntaxPlugin::NullishCoalescingOperator => {
                options.env.es2020.nullish_coalescing_operator = true;
            }
        }
    }

    Ok(options)
}

fn join_messages<T: std::fmt::Display>(errors: impl Iterator<Item = T>) -> String {
    errors.map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TranspileConfig {
        TranspileConfig::new(false)
    }

    #[test]
    fn test_lowers_optional_chaining_and_nullish() {
        let out = lower(
            Path::new("/p/src/index.js"),
            "export const v = a?.b ?? 1;\n",
            &config(),
        )
        .unwrap();
        assert!(!out.code.contains("?."));
        assert!(!out.code.contains("??"));
        assert!(out.map.is_none());
    }

    #[test]
    fn test_strips_typescript() {
        let out = lower(
            Path::new("/p/src/index.ts"),
            "export const n: number = 1;\ninterface Foo { a: string }\n",
            &config(),
        )
        .unwrap();
        assert!(!out.code.contains(": number"));
        assert!(!out.code.contains("interface"));
    }

    #[test]
    fn test_leaves_supported_syntax() {
        let out = lower(Path::new("/p/a.js"), "module.exports = 1;\n", &config()).unwrap();
        assert!(out.code.contains("module.exports = 1"));
    }

    #[test]
    fn test_source_map_points_at_input() {
        let input = "export const v = a?.b;\n";
        let out = lower(
            Path::new("/p/src/index.js"),
            input,
            &config().with_source_map(true),
        )
        .unwrap();
        let map = out.map.expect("source map");
        let sources: Vec<_> = map.get_sources().map(|s| s.to_string()).collect();
        assert_eq!(sources, vec!["/p/src/index.js".to_string()]);
        assert_eq!(map.get_source_content(0).map(|c| c.as_ref()), Some(input));
    }

    #[test]
    fn test_commonjs_helpers_use_require() {
        let out = lower(
            Path::new("/p/src/index.js"),
            "class A { x = 1; }\nmodule.exports = A;\n",
            &config(),
        )
        .unwrap();
        assert!(out.code.contains("require(\"@babel/runtime/helpers/"));
        assert!(!out.code.contains("import "));
        assert!(out.code.contains("module.exports = A"));
    }

    #[test]
    fn test_esm_helpers_use_import() {
        let out = lower(
            Path::new("/p/src/index.js"),
            "export class A { x = 1; }\n",
            &config(),
        )
        .unwrap();
        assert!(out.code.contains("from \"@babel/runtime/helpers/"));
        assert!(!out.code.contains("require("));
    }

    #[test]
    fn test_parse_error_is_reported_per_file() {
        let err = lower(Path::new("/p/bad.js"), "const = ;", &config()).unwrap_err();
        match err {
            Error::Transform { file, message } => {
                assert_eq!(file, "/p/bad.js");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
