//! Typed JSON-Schema AST — the input boundary.
//!
//! Produced by an external schema compiler and handed over as JSON. The tree
//! is arena-encoded: children are `NodeId` indices, so shared sub-schemas and
//! reference cycles are expressible and node identity is a plain index.
//! Attributes beyond the ones modeled here are ignored on deserialization.

use serde::Deserialize;
use serde_json::Value;

pub type NodeId = usize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ast {
    pub nodes: Vec<AstNode>,
    #[serde(default)]
    pub root: NodeId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstNode {
    /// Present iff the node denotes a named, reusable type.
    #[serde(default)]
    pub standalone_name: Option<String>,
    /// Property name under which this node was reached; absent for root and
    /// array-item nodes.
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub kind: AstKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AstKind {
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        fields: Vec<ObjectField>,
        #[serde(default)]
        super_types: Vec<NodeId>,
    },
    Array {
        items: NodeId,
    },
    Tuple {
        #[serde(default)]
        items: Vec<NodeId>,
    },
    Union {
        #[serde(default)]
        members: Vec<NodeId>,
    },
    Intersection {
        #[serde(default)]
        members: Vec<NodeId>,
    },
    Enum {
        #[serde(default)]
        members: Vec<EnumMember>,
    },
    String,
    #[serde(rename_all = "camelCase")]
    Number {
        #[serde(default)]
        is_integer: bool,
    },
    Boolean,
    Literal {
        value: Value,
    },
    Null,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectField {
    pub key_name: String,
    pub ast: NodeId,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_pattern_property: bool,
    #[serde(default)]
    pub is_unreachable_definition: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    pub key_name: String,
    #[serde(default)]
    pub value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Ast {
    /// Deserialize the boundary JSON with JSON-path context in error messages
    /// and validate node indices. The translator itself indexes unchecked.
    pub fn from_json_str(src: &str) -> Result<Self, String> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let ast: Ast = match serde_path_to_error::deserialize(de) {
            Ok(v) => v,
            Err(err) => {
                let path = err.path().to_string();
                return Err(format!("at JSON path {path}: {}", err.into_inner()));
            }
        };
        ast.validate()?;
        Ok(ast)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    pub fn root_node(&self) -> &AstNode {
        self.node(self.root)
    }

    /// Every child reference must point into the arena.
    pub fn validate(&self) -> Result<(), String> {
        let bound = self.nodes.len();
        let check = |id: NodeId, what: &str| {
            if id < bound {
                Ok(())
            } else {
                Err(format!("{what} node id {id} out of bounds (arena has {bound} nodes)"))
            }
        };
        check(self.root, "root")?;
        for node in &self.nodes {
            match &node.kind {
                AstKind::Object { fields, super_types } => {
                    for field in fields {
                        check(field.ast, "field")?;
                    }
                    for &id in super_types {
                        check(id, "super type")?;
                    }
                }
                AstKind::Array { items } => check(*items, "array item")?,
                AstKind::Tuple { items } => {
                    for &id in items {
                        check(id, "tuple item")?;
                    }
                }
                AstKind::Union { members } | AstKind::Intersection { members } => {
                    for &id in members {
                        check(id, "member")?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl AstNode {
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            AstKind::Object { .. } => "OBJECT",
            AstKind::Array { .. } => "ARRAY",
            AstKind::Tuple { .. } => "TUPLE",
            AstKind::Union { .. } => "UNION",
            AstKind::Intersection { .. } => "INTERSECTION",
            AstKind::Enum { .. } => "ENUM",
            AstKind::String => "STRING",
            AstKind::Number { .. } => "NUMBER",
            AstKind::Boolean => "BOOLEAN",
            AstKind::Literal { .. } => "LITERAL",
            AstKind::Null => "NULL",
        }
    }

    /// Only string literals are meaningful to the translator.
    pub fn string_literal(&self) -> Option<&str> {
        match &self.kind {
            AstKind::Literal { value: Value::String(s) } => Some(s),
            _ => None,
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_arena_wire_format() {
        let src = json!({
            "root": 0,
            "nodes": [
                {
                    "kind": "OBJECT",
                    "standaloneName": "Car",
                    "comment": "A car",
                    "fields": [
                        { "keyName": "model", "ast": 1, "isRequired": true },
                        { "keyName": "year", "ast": 2 }
                    ]
                },
                { "kind": "STRING", "keyName": "model" },
                { "kind": "NUMBER", "keyName": "year", "isInteger": true }
            ]
        })
        .to_string();
        let ast = Ast::from_json_str(&src).unwrap();
        assert_eq!(ast.nodes.len(), 3);
        let root = ast.root_node();
        assert_eq!(root.standalone_name.as_deref(), Some("Car"));
        assert_eq!(root.kind_name(), "OBJECT");
        match &root.kind {
            AstKind::Object { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert!(fields[0].is_required);
                assert!(!fields[1].is_required);
            }
            other => panic!("expected object, got {other:?}"),
        }
        match &ast.node(2).kind {
            AstKind::Number { is_integer } => assert!(is_integer),
            other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let src = json!({
            "root": 0,
            "nodes": [
                { "kind": "STRING", "standaloneName": "S", "deprecated": true, "minLength": 3 }
            ]
        })
        .to_string();
        let ast = Ast::from_json_str(&src).unwrap();
        assert_eq!(ast.root_node().standalone_name.as_deref(), Some("S"));
    }

    #[test]
    fn out_of_bounds_child_is_rejected() {
        let src = json!({
            "root": 0,
            "nodes": [
                { "kind": "ARRAY", "items": 7 }
            ]
        })
        .to_string();
        let err = Ast::from_json_str(&src).unwrap_err();
        assert!(err.contains("out of bounds"), "{err}");
    }

    #[test]
    fn deserialize_errors_carry_json_path() {
        let src = json!({
            "root": 0,
            "nodes": [
                { "kind": "OBJECT", "fields": [ { "keyName": 42, "ast": 0 } ] }
            ]
        })
        .to_string();
        let err = Ast::from_json_str(&src).unwrap_err();
        assert!(err.contains("at JSON path"), "{err}");
    }

    #[test]
    fn string_literal_predicate() {
        let src = json!({
            "nodes": [
                { "kind": "LITERAL", "value": "red" },
                { "kind": "LITERAL", "value": 3 }
            ]
        })
        .to_string();
        let ast = Ast::from_json_str(&src).unwrap();
        assert_eq!(ast.node(0).string_literal(), Some("red"));
        assert_eq!(ast.node(1).string_literal(), None);
    }
}
