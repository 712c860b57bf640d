//! SafeScript transformer as a WASM module for browser tooling.
//!
//! This crate exposes the transform pipeline and the source-map composer
//! via `wasm-bindgen`. Every entry point returns JSON text, except
//! [`transform_value`], which hands back a JS object directly.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { transform } from 'safescript-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(transform("let s = a + b;", "app.js", '{"module":"commonjs"}'));
//! console.log(result.code);
//! // const module_runtime_safescript = require("@redradist/commonjs-runtime-safescript");
//! // let s = SafeScript.add(a, b);
//! ```

use safescript_compiler::TransformOptions;
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

/// Transform a source file.
///
/// `options` is an optional JSON `TransformOptions`; missing fields take
/// their defaults. Returns a JSON `TransformResult`:
/// ```json
/// {
///   "success": true,
///   "code": "import \"@redradist/module-runtime-safescript\";\n...",
///   "source_map": { "version": 3, "file": "app.js", ... },
///   "errors": { "errors": [], "warnings": [], "total_errors": 0, "total_warnings": 0 },
///   "changed": true,
///   "passes": 2,
///   "module": "es",
///   "output_hash": "..."
/// }
/// ```
#[wasm_bindgen]
pub fn transform(source: &str, filename: &str, options: Option<String>) -> String {
    let options = match options.as_deref().map(serde_json::from_str::<TransformOptions>) {
        None => TransformOptions::default(),
        Some(Ok(options)) => options,
        Some(Err(e)) => return invalid_options(&e.to_string()),
    };
    let result = safescript_compiler::transform(source, filename, &options);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"code":null,"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"warnings":[],"total_errors":1,"total_warnings":0}}}}"#,
            e
        )
    })
}

/// Like [`transform`], taking the options as a JS object and returning the
/// result as one.
#[wasm_bindgen]
pub fn transform_value(source: &str, filename: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let options: TransformOptions = if options.is_undefined() || options.is_null() {
        TransformOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    let result = safescript_compiler::transform(source, filename, &options);
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Diagnostics only, without rewriting.
///
/// Returns a JSON `CompileErrors`.
#[wasm_bindgen]
pub fn check(source: &str, filename: &str) -> String {
    let errors = safescript_compiler::check(source, filename);
    serde_json::to_string(&errors).unwrap_or_else(|e| {
        format!(
            r#"{{"errors":[{{"message":"Serialization error: {}"}}],"warnings":[],"total_errors":1,"total_warnings":0}}"#,
            e
        )
    })
}

/// Compose two source-map files: `first` maps an intermediate file back to
/// the original, `second` maps the final output back to the intermediate.
///
/// Returns the composed map, or `{"error": "..."}`.
#[wasm_bindgen]
pub fn compose_source_maps(first: &str, second: &str) -> String {
    let composed = safescript_codegen::SourceMap::from_json(first)
        .and_then(|first| {
            let second = safescript_codegen::SourceMap::from_json(second)?;
            safescript_codegen::compose_source_maps(&first, &second)
        })
        .and_then(|map| map.to_json());
    composed.unwrap_or_else(|e| error_json(&e.to_string()))
}

/// Compile transformed TypeScript to JavaScript, composing `rewrite_map`
/// (a source-map JSON) onto the compile stage's own mapping.
///
/// Returns `{"code": "...", "source_map": {...} | null}` or
/// `{"error": "...", "errors": {...}}`.
#[wasm_bindgen]
pub fn compile_javascript(
    code: &str,
    filename: &str,
    output_file: &str,
    rewrite_map: Option<String>,
) -> String {
    let rewrite_map = match rewrite_map
        .as_deref()
        .map(safescript_codegen::SourceMap::from_json)
        .transpose()
    {
        Ok(map) => map,
        Err(e) => return error_json(&e.to_string()),
    };
    match safescript_compiler::compile_javascript(code, filename, output_file, rewrite_map.as_ref())
    {
        Ok(output) => to_json(&output),
        Err(safescript_compiler::PipelineError::Diagnostics { file, errors }) => json!({
            "error": format!("{} error(s) while compiling {file}", errors.total_errors),
            "errors": errors,
        })
        .to_string(),
    }
}

/// Append the `//# sourceMappingURL=` trailer to emitted text.
#[wasm_bindgen]
pub fn with_source_mapping_url(text: &str, map_file: &str) -> String {
    safescript_codegen::with_source_mapping_url(text, map_file)
}

/// Return the transformer version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(&format!("Serialization error: {e}")))
}

fn error_json(message: &str) -> String {
    json!({ "error": message }).to_string()
}

fn invalid_options(message: &str) -> String {
    json!({
        "success": false,
        "code": null,
        "errors": {
            "errors": [{ "message": format!("invalid options: {message}") }],
            "warnings": [],
            "total_errors": 1,
            "total_warnings": 0,
        },
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_transform_returns_result_json() {
        let result = parse(&transform("let s = a + b;", "app.js", None));
        assert_eq!(result["success"], true);
        assert_eq!(result["module"], "es");
        assert_eq!(result["source_map"]["version"], 3);
        let code = result["code"].as_str().unwrap();
        assert!(code.contains("SafeScript.add(a, b)"), "{code}");
    }

    #[test]
    fn test_transform_partial_options() {
        let options = Some(r#"{"module":"commonjs","source_map":false}"#.to_string());
        let result = parse(&transform("let s = a + b;", "app.js", options));
        assert_eq!(result["module"], "commonjs");
        assert!(result["source_map"].is_null());
    }

    #[test]
    fn test_transform_invalid_options() {
        let result = parse(&transform("let s = 1;", "app.js", Some("{".to_string())));
        assert_eq!(result["success"], false);
        assert_eq!(result["errors"]["total_errors"], 1);
    }

    #[test]
    fn test_check_reports_syntax_errors() {
        let errors = parse(&check("let = ;", "bad.js"));
        assert!(errors["total_errors"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn test_compose_source_maps() {
        let first = r#"{"version":3,"file":"mid.js","sources":["orig.ts"],"names":[],"mappings":"AAAA"}"#;
        let second = r#"{"version":3,"file":"out.js","sources":["mid.js"],"names":[],"mappings":"AAAA"}"#;
        let map = parse(&compose_source_maps(first, second));
        assert_eq!(map["file"], "out.js");
        assert_eq!(map["sources"][0], "orig.ts");
        assert_eq!(map["mappings"], "AAAA");
    }

    #[test]
    fn test_compose_rejects_bad_map() {
        let first = r#"{"version":2,"sources":[],"mappings":""}"#;
        let result = parse(&compose_source_maps(first, first));
        assert!(result["error"].as_str().unwrap().contains("version 2"));
    }

    #[test]
    fn test_compile_javascript_without_map() {
        let output = parse(&compile_javascript("let x: number = 1;", "a.ts", "a.js", None));
        assert_eq!(output["code"], "let x = 1;\n");
        assert!(output["source_map"].is_null());
    }

    #[test]
    fn test_compile_javascript_reports_malformed_map() {
        let rewrite_map = r#"{"version":3,"file":"a.ts","sources":["a.ts"],"names":[],"mappings":"A!AA"}"#;
        let output = parse(&compile_javascript(
            "let x: number = 1;",
            "a.ts",
            "a.js",
            Some(rewrite_map.to_string()),
        ));
        assert_eq!(output["errors"]["total_errors"], 1);
        assert_eq!(output["errors"]["errors"][0]["code"], 400);
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
