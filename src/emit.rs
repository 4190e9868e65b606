//! Schema assembly: root handling, banner, and hand-off to the SDL printer
//! (`graphql_parser`'s `Display` impl).

use crate::ast::Ast;
use crate::declare::{Declarator, Document, TranslateError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub const DEFAULT_BANNER_COMMENT: &str =
    "# Generated by json-schema-to-graphql.\n# DON'T EDIT BY HAND!";

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Prepended verbatim to the printed schema text, separated by a blank
    /// line. Empty means no banner and no leading blank line.
    pub banner_comment: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self { banner_comment: DEFAULT_BANNER_COMMENT.to_string() }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Translate the root AST into a GraphQL schema document. An anonymous root
/// cannot become a named type, so it yields no schema at all (not an error).
pub fn generate_schema(ast: &Ast) -> Result<Option<Document>, TranslateError> {
    let Some(raw_name) = ast.root_node().standalone_name.clone() else {
        return Ok(None);
    };
    let mut declarator = Declarator::new(ast);
    declarator.declare_named(ast.root, &raw_name)?;
    Ok(Some(declarator.into_document()))
}

/// Translate and print: banner and schema text joined by a blank line, with
/// absent parts skipped.
pub fn generate(ast: &Ast, options: &GeneratorOptions) -> Result<String, TranslateError> {
    let schema = generate_schema(ast)?;
    let mut parts = Vec::new();
    if !options.banner_comment.is_empty() {
        parts.push(options.banner_comment.clone());
    }
    if let Some(schema) = schema {
        parts.push(schema.to_string().trim_end().to_string());
    }
    Ok(parts.join("\n\n"))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ast(fixture: serde_json::Value) -> Ast {
        Ast::from_json_str(&fixture.to_string()).unwrap()
    }

    fn options(banner: &str) -> GeneratorOptions {
        GeneratorOptions { banner_comment: banner.to_string() }
    }

    fn car_model() -> serde_json::Value {
        json!({
            "root": 0,
            "nodes": [
                { "kind": "OBJECT", "standaloneName": "CarModel", "fields": [
                    { "keyName": "model", "ast": 1 }
                ]},
                { "kind": "STRING", "keyName": "model" }
            ]
        })
    }

    #[test]
    fn anonymous_root_renders_only_the_banner() {
        let ast = ast(json!({ "root": 0, "nodes": [ { "kind": "NULL" } ] }));
        let out = generate(&ast, &options("# I was generated")).unwrap();
        assert_eq!(out, "# I was generated");
    }

    #[test]
    fn anonymous_root_without_banner_renders_nothing() {
        let ast = ast(json!({ "root": 0, "nodes": [ { "kind": "NULL" } ] }));
        assert_eq!(generate(&ast, &options("")).unwrap(), "");
        assert!(generate_schema(&ast).unwrap().is_none());
    }

    #[test]
    fn banner_is_separated_by_a_blank_line() {
        let out = generate(&ast(car_model()), &options("# banner")).unwrap();
        assert!(out.starts_with("# banner\n\ntype CarModel"), "{out}");
    }

    #[test]
    fn empty_banner_yields_no_leading_blank_line() {
        let out = generate(&ast(car_model()), &options("")).unwrap();
        assert!(out.starts_with("type CarModel"), "{out}");
    }

    #[test]
    fn default_banner_marks_generated_output() {
        let options = GeneratorOptions::default();
        assert!(options.banner_comment.starts_with('#'));
        let out = generate(&ast(car_model()), &options).unwrap();
        assert!(out.contains("DON'T EDIT BY HAND"), "{out}");
    }

    #[test]
    fn two_runs_produce_identical_text() {
        // Separate runs, separate memo tables: no hidden state may leak.
        let fixture = json!({
            "root": 0,
            "nodes": [
                { "kind": "UNION", "standaloneName": "Vehicle", "members": [1, 2] },
                { "kind": "OBJECT", "standaloneName": "Car", "fields": [
                    { "keyName": "carID", "ast": 3, "isRequired": true }
                ]},
                { "kind": "OBJECT", "standaloneName": "Bike", "fields": [
                    { "keyName": "gears", "ast": 4 }
                ]},
                { "kind": "STRING", "keyName": "carID" },
                { "kind": "NUMBER", "keyName": "gears", "isInteger": true }
            ]
        });
        let ast = ast(fixture);
        let first = generate(&ast, &GeneratorOptions::default()).unwrap();
        let second = generate(&ast, &GeneratorOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn translation_errors_abort_with_no_partial_output() {
        let ast = ast(json!({
            "root": 0,
            "nodes": [
                { "kind": "OBJECT", "standaloneName": "Broken", "fields": [
                    { "keyName": "pair", "ast": 1 }
                ]},
                { "kind": "TUPLE", "keyName": "pair", "items": [2, 3] },
                { "kind": "STRING" },
                { "kind": "NUMBER" }
            ]
        }));
        assert!(generate(&ast, &GeneratorOptions::default()).is_err());
    }
}
