//! The Type Declarator: a depth-first, memoized walk that turns the typed
//! JSON-Schema AST into GraphQL named type definitions.
//!
//! Core invariants:
//! - At most one GraphQL type per AST identity (the memo is keyed by `NodeId`).
//! - A node is registered in the memo, and its output slot reserved, *before*
//!   its children are resolved, so reference cycles land on the in-progress
//!   type instead of recursing forever.
//! - Field, union member and enum value order follows AST declaration order;
//!   definition order is discovery order.

use graphql_parser::Pos;
use graphql_parser::schema as gql;
use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::{Ast, AstKind, AstNode, NodeId, ObjectField};
use crate::name::{NamePool, concat_name, is_identifier_field, sanitize_name};

pub type Document = gql::Document<'static, String>;
pub type GqlType = gql::Type<'static, String>;
type GqlTypeDefinition = gql::TypeDefinition<'static, String>;

/// Synthetic key the external compiler uses for open/map-like members.
/// GraphQL has no equivalent, so such fields are dropped.
const WILDCARD_KEY: &str = "[k: string]";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("not a supported named type: {kind}")]
    UnsupportedNamedType { kind: &'static str },
    #[error("intersection contains a non-object member: {kind}")]
    UnsupportedIntersection { kind: &'static str },
    #[error("tuples containing multiple types are not supported")]
    UnsupportedTuple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Object,
    Union,
    Enum,
}

#[derive(Debug, Clone)]
struct Declared {
    name: String,
    kind: DeclaredKind,
}

/// One translation run. Owns the memo, the name pool, and the ordered list of
/// produced definitions; discarded when the run completes.
pub struct Declarator<'a> {
    ast: &'a Ast,
    memo: IndexMap<NodeId, Declared>,
    names: NamePool,
    // Option so a slot can be reserved before the definition is finished.
    definitions: Vec<Option<GqlTypeDefinition>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Declarator<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            memo: IndexMap::new(),
            names: NamePool::new(),
            definitions: Vec::new(),
        }
    }

    /// Consume the run, yielding every declared named type in discovery order.
    pub fn into_document(self) -> Document {
        Document {
            definitions: self
                .definitions
                .into_iter()
                .flatten()
                .map(gql::Definition::TypeDefinition)
                .collect(),
        }
    }

    /// Declare `id` as a standalone named type under `raw_name` (the node's
    /// own standalone name, or one inferred from parent context). Idempotent
    /// per identity: repeat calls return the cached name.
    pub fn declare_named(
        &mut self,
        id: NodeId,
        raw_name: &str,
    ) -> Result<(String, DeclaredKind), TranslateError> {
        if let Some(declared) = self.memo.get(&id) {
            return Ok((declared.name.clone(), declared.kind));
        }
        let ast = self.ast;
        let node = ast.node(id);
        let name = self.names.claim(&sanitize_name(raw_name));
        let description = node.comment.clone();
        match &node.kind {
            AstKind::Object { fields, .. } => {
                let fields = fields.clone();
                self.declare_object(id, name, description, &fields)
            }
            AstKind::Union { members } => {
                let members = members.clone();
                if members.iter().all(|&m| ast.node(m).string_literal().is_some()) {
                    // Closed string sets have no GraphQL union form; rewrite
                    // the literal union as an enum.
                    let values: Vec<String> = members
                        .iter()
                        .filter_map(|&m| ast.node(m).string_literal())
                        .map(str::to_string)
                        .collect();
                    Ok(self.declare_enum(id, name, description, &values))
                } else {
                    self.declare_union(id, name, description, &members)
                }
            }
            AstKind::Enum { members } => {
                let values: Vec<String> =
                    members.iter().map(|member| member.key_name.clone()).collect();
                Ok(self.declare_enum(id, name, description, &values))
            }
            AstKind::Intersection { members } => {
                // GraphQL cannot express intersections; flatten all member
                // field lists into one object under the intersection's name.
                let fields = self.merged_intersection_fields(members)?;
                self.declare_object(id, name, description, &fields)
            }
            _ => Err(TranslateError::UnsupportedNamedType { kind: node.kind_name() }),
        }
    }

    /// The scalar/field mapper plus named-type delegation: resolve the GraphQL
    /// output type for a node in field position. `Ok(None)` drops the field.
    fn declare_standalone(
        &mut self,
        id: NodeId,
        parent_name: &str,
    ) -> Result<Option<GqlType>, TranslateError> {
        let ast = self.ast;
        let node = ast.node(id);
        // Discriminant tags are redundant next to GraphQL's __typename.
        if is_discriminant_tag(ast, node) {
            return Ok(None);
        }
        if let Some(raw_name) = named_context(node, parent_name) {
            let (name, _) = self.declare_named(id, &raw_name)?;
            return Ok(Some(GqlType::NamedType(name)));
        }
        match &node.kind {
            AstKind::String => {
                let scalar = if node.key_name.as_deref().is_some_and(is_identifier_field) {
                    "ID"
                } else {
                    "String"
                };
                Ok(Some(named(scalar)))
            }
            AstKind::Number { is_integer } => {
                Ok(Some(named(if *is_integer { "Int" } else { "Float" })))
            }
            AstKind::Boolean => Ok(Some(named("Boolean"))),
            AstKind::Array { items } => {
                let item_name = list_item_name(node, parent_name);
                Ok(self.declare_standalone(*items, &item_name)?.map(list_of_non_null))
            }
            AstKind::Tuple { items } => {
                // No heterogeneous tuples in GraphQL; a homogeneous tuple is
                // representable as a list of its element type.
                let Some((&first, rest)) = items.split_first() else {
                    return Ok(None);
                };
                let first_kind = ast.node(first).kind_name();
                if rest.iter().any(|&m| ast.node(m).kind_name() != first_kind) {
                    return Err(TranslateError::UnsupportedTuple);
                }
                let item_name = list_item_name(node, parent_name);
                Ok(self.declare_standalone(first, &item_name)?.map(list_of_non_null))
            }
            _ => Ok(None),
        }
    }

    fn declare_object(
        &mut self,
        id: NodeId,
        name: String,
        description: Option<String>,
        fields: &[ObjectField],
    ) -> Result<(String, DeclaredKind), TranslateError> {
        // Register before resolving fields: recursive references must resolve
        // to this name, not re-enter.
        self.memo.insert(id, Declared { name: name.clone(), kind: DeclaredKind::Object });
        let slot = self.reserve();
        let mut out_fields = Vec::new();
        for field in fields {
            if field.is_pattern_property
                || field.is_unreachable_definition
                || field.key_name == WILDCARD_KEY
            {
                continue;
            }
            let Some(field_type) = self.declare_standalone(field.ast, &name)? else {
                continue;
            };
            let field_type = if field.is_required {
                GqlType::NonNullType(Box::new(field_type))
            } else {
                field_type
            };
            out_fields.push(gql::Field {
                position: pos(),
                description: self.ast.node(field.ast).comment.clone(),
                name: field.key_name.clone(),
                arguments: Vec::new(),
                field_type,
                directives: Vec::new(),
            });
        }
        self.definitions[slot] = Some(GqlTypeDefinition::Object(gql::ObjectType {
            position: pos(),
            description,
            name: name.clone(),
            implements_interfaces: Vec::new(),
            directives: Vec::new(),
            fields: out_fields,
        }));
        Ok((name, DeclaredKind::Object))
    }

    fn declare_union(
        &mut self,
        id: NodeId,
        name: String,
        description: Option<String>,
        members: &[NodeId],
    ) -> Result<(String, DeclaredKind), TranslateError> {
        self.memo.insert(id, Declared { name: name.clone(), kind: DeclaredKind::Union });
        let slot = self.reserve();
        let mut types = Vec::new();
        for &member in members {
            if self.declare_standalone(member, &name)?.is_none() {
                continue;
            }
            // GraphQL unions may only contain object members; anything else
            // declared here (enums, scalar-typed members) is dropped.
            if let Some(declared) = self.memo.get(&member) {
                if declared.kind == DeclaredKind::Object {
                    types.push(declared.name.clone());
                }
            }
        }
        self.definitions[slot] = Some(GqlTypeDefinition::Union(gql::UnionType {
            position: pos(),
            description,
            name: name.clone(),
            directives: Vec::new(),
            types,
        }));
        Ok((name, DeclaredKind::Union))
    }

    fn declare_enum(
        &mut self,
        id: NodeId,
        name: String,
        description: Option<String>,
        values: &[String],
    ) -> (String, DeclaredKind) {
        self.memo.insert(id, Declared { name: name.clone(), kind: DeclaredKind::Enum });
        let values = values
            .iter()
            .map(|value| gql::EnumValue {
                position: pos(),
                description: None,
                name: sanitize_name(value),
                directives: Vec::new(),
            })
            .collect();
        self.definitions.push(Some(GqlTypeDefinition::Enum(gql::EnumType {
            position: pos(),
            description,
            name: name.clone(),
            directives: Vec::new(),
            values,
        })));
        (name, DeclaredKind::Enum)
    }

    fn merged_intersection_fields(
        &self,
        members: &[NodeId],
    ) -> Result<Vec<ObjectField>, TranslateError> {
        let mut fields = Vec::new();
        for &member in members {
            let node = self.ast.node(member);
            match &node.kind {
                AstKind::Object { fields: member_fields, .. } => {
                    fields.extend(member_fields.iter().cloned());
                }
                _ => {
                    return Err(TranslateError::UnsupportedIntersection {
                        kind: node.kind_name(),
                    });
                }
            }
        }
        Ok(fields)
    }

    fn reserve(&mut self) -> usize {
        self.definitions.push(None);
        self.definitions.len() - 1
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// If the node must be handled as a named type, return the raw name to declare
/// it under. Unions and intersections cannot be inlined in GraphQL, and
/// anonymous enums only occur as literal leaves, so all three get an inferred
/// name from parent context. Lists stay structurally anonymous.
fn named_context(node: &AstNode, parent_name: &str) -> Option<String> {
    match &node.kind {
        AstKind::Array { .. } => None,
        AstKind::Union { .. } | AstKind::Intersection { .. } | AstKind::Enum { .. } => Some(
            node.standalone_name
                .clone()
                .unwrap_or_else(|| inferred_name(node, parent_name)),
        ),
        _ => node.standalone_name.clone(),
    }
}

fn inferred_name(node: &AstNode, parent_name: &str) -> String {
    match &node.key_name {
        Some(key) => concat_name(&[parent_name, key]),
        None => parent_name.to_string(),
    }
}

/// Lists themselves cannot be named in GraphQL; the *item* type is named
/// `<ListName>Item` instead.
fn list_item_name(node: &AstNode, parent_name: &str) -> String {
    let base = node
        .standalone_name
        .clone()
        .unwrap_or_else(|| inferred_name(node, parent_name));
    concat_name(&[&base, "item"])
}

/// A union of string literals with at most one member, or an enum with at
/// most one value, carries no information beyond its type: it is the source
/// schema's variant tag, already covered by __typename.
fn is_discriminant_tag(ast: &Ast, node: &AstNode) -> bool {
    match &node.kind {
        AstKind::Union { members } => {
            members.len() <= 1 && members.iter().all(|&m| ast.node(m).string_literal().is_some())
        }
        AstKind::Enum { members } => members.len() <= 1,
        _ => false,
    }
}

fn named(scalar: &str) -> GqlType {
    GqlType::NamedType(scalar.to_string())
}

fn list_of_non_null(item: GqlType) -> GqlType {
    GqlType::ListType(Box::new(GqlType::NonNullType(Box::new(item))))
}

fn pos() -> Pos {
    Pos { line: 0, column: 0 }
}

// ------------------------------- Tests ------------------------------------ //
