//! Named-type substitution.
//!
//! Every word in type position that is not a builtin tag must name an entry
//! of the types table, and is replaced by that entry's resolved form. Keys are
//! never rewritten. Each type is resolved once and memoized; a name that is
//! reached again while it is still being expanded is a cycle. The expanded
//! tree may hold at most [`MAX_MODEL_NODES`] nodes.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use super::ast::{Expr, Member};
use crate::error::{CStructError, Result};
use crate::tags::{is_buffer_type, is_string_type, LengthType, Tag};

pub(crate) type TypeTable = IndexMap<String, Expr>;

/// Upper bound on the node count of a resolved model.
pub(crate) const MAX_MODEL_NODES: usize = 1 << 20;

/// Resolves `root` against `table` into canonical JSON.
pub(crate) fn resolve(root: &Expr, table: &TypeTable) -> Result<Json> {
    Resolver {
        table,
        done: HashMap::new(),
        stack: Vec::new(),
        nodes: 0,
    }
    .expr(root)
}

struct Resolver<'t> {
    table: &'t TypeTable,
    done: HashMap<&'t str, (Json, usize)>,
    stack: Vec<&'t str>,
    nodes: usize,
}

impl<'t> Resolver<'t> {
    fn expr(&mut self, expr: &'t Expr) -> Result<Json> {
        match expr {
            Expr::Word { text, pos } => self.word(text, *pos),
            Expr::Object(members) => {
                let mut map = Map::with_capacity(members.len());
                for member in members {
                    let value = match (check_key(member)?, &member.value) {
                        (true, Expr::Word { text, .. }) if is_string_type(text) || is_buffer_type(text) => {
                            Json::String(text.clone())
                        }
                        _ => self.expr(&member.value)?,
                    };
                    map.insert(member.key.clone(), value);
                }
                Ok(Json::Object(map))
            }
            Expr::Array(items) => items
                .iter()
                .map(|item| self.expr(item))
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
        }
    }

    fn word(&mut self, text: &'t str, pos: usize) -> Result<Json> {
        match Tag::parse(text) {
            Some(Tag::Str(None) | Tag::Buf(None)) => {
                return Err(CStructError::grammar(
                    format!("`{text}` has no length; use a sized tag or a dynamic key"),
                    pos,
                ))
            }
            Some(_) => {
                self.charge(1, pos)?;
                return Ok(Json::String(text.to_string()));
            }
            None => {}
        }
        // Charge a memoized type before cloning it.
        if let Some((resolved, weight)) = self.done.get(text) {
            if self.nodes.saturating_add(*weight) > MAX_MODEL_NODES {
                return Err(too_large(pos));
            }
            self.nodes += *weight;
            return Ok(resolved.clone());
        }
        let Some((name, definition)) = self.table.get_key_value(text) else {
            return Err(CStructError::UnresolvedType {
                name: text.to_string(),
            });
        };
        if let Some(start) = self.stack.iter().position(|open| *open == text) {
            let mut chain: Vec<String> = self.stack[start..].iter().map(|s| s.to_string()).collect();
            chain.push(text.to_string());
            return Err(CStructError::CyclicType { chain });
        }

        self.stack.push(name.as_str());
        let resolved = self.expr(definition);
        self.stack.pop();
        let resolved = resolved?;
        self.done.insert(name.as_str(), (resolved.clone(), node_count(&resolved)));
        Ok(resolved)
    }

    fn charge(&mut self, nodes: usize, pos: usize) -> Result<()> {
        self.nodes = self.nodes.saturating_add(nodes);
        if self.nodes > MAX_MODEL_NODES {
            return Err(too_large(pos));
        }
        Ok(())
    }
}

fn too_large(pos: usize) -> CStructError {
    CStructError::grammar(
        format!("model expands to more than {MAX_MODEL_NODES} nodes"),
        pos,
    )
}

fn node_count(json: &Json) -> usize {
    match json {
        Json::Array(items) => items.iter().fold(1, |sum, item| sum.saturating_add(node_count(item))),
        Json::Object(map) => map.values().fold(1, |sum, value| sum.saturating_add(node_count(value))),
        _ => 1,
    }
}

/// A dotted key `name.tag` declares a dynamic-length field; `tag` must be a
/// length type. Returns whether the key is dynamic.
fn check_key(member: &Member) -> Result<bool> {
    let Some((name, tag)) = member.key.rsplit_once('.') else {
        return Ok(false);
    };
    if name.is_empty() {
        return Err(CStructError::grammar(
            format!("field name missing in `{}`", member.key),
            member.pos,
        ));
    }
    if LengthType::parse(tag).is_none() {
        return Err(CStructError::grammar(
            format!("unsupported dynamic length type `{tag}` in `{}`", member.key),
            member.pos,
        ));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parser::parse;
    use serde_json::json;

    fn table(input: &str) -> TypeTable {
        match parse(input).unwrap() {
            Expr::Object(members) => members.into_iter().map(|m| (m.key, m.value)).collect(),
            other => panic!("types must be an object, got {other:?}"),
        }
    }

    #[test]
    fn substitutes_in_type_position_only() {
        let types = table("{Abc: {x: u8, y: u8}, Xyz: [2/Abc]}");
        let root = parse("{Abc: Abc, list: Xyz}").unwrap();
        assert_eq!(
            resolve(&root, &types).unwrap(),
            json!({
                "Abc": {"x": "u8", "y": "u8"},
                "list": [{"x": "u8", "y": "u8"}, {"x": "u8", "y": "u8"}]
            })
        );
    }

    #[test]
    fn builtin_tags_shadow_type_names() {
        let types = table("{u8: {x: u16}}");
        let root = parse("{a: u8}").unwrap();
        assert_eq!(resolve(&root, &types).unwrap(), json!({"a": "u8"}));
    }

    #[test]
    fn unresolved_name() {
        let root = parse("{a: Missing}").unwrap();
        assert!(matches!(
            resolve(&root, &TypeTable::new()),
            Err(CStructError::UnresolvedType { name }) if name == "Missing"
        ));
    }

    #[test]
    fn cycles_are_reported_with_chain() {
        let types = table("{A: {b: B}, B: {a: [1/A]}}");
        let root = parse("{x: A}").unwrap();
        match resolve(&root, &types) {
            Err(CStructError::CyclicType { chain }) => assert_eq!(chain, ["A", "B", "A"]),
            other => panic!("expected cycle, got {other:?}"),
        }
        let types = table("{Self: {next: Self}}");
        let root = parse("Self").unwrap();
        assert!(matches!(resolve(&root, &types), Err(CStructError::CyclicType { .. })));
    }

    #[test]
    fn unsized_payload_needs_a_dynamic_key() {
        let root = parse("{a: u8, b: s}").unwrap();
        assert!(matches!(
            resolve(&root, &TypeTable::new()),
            Err(CStructError::Grammar { position: 11, .. })
        ));
        let root = parse(r#"{"v.u8": ["buf"]}"#).unwrap();
        assert!(matches!(
            resolve(&root, &TypeTable::new()),
            Err(CStructError::Grammar { .. })
        ));
    }

    #[test]
    fn expansion_is_bounded() {
        let types = table("{T1: [65536/u8], T2: [65536/T1], T3: [65536/T2]}");
        let root = parse("{x: T3}").unwrap();
        match resolve(&root, &types) {
            Err(CStructError::Grammar { message, .. }) => assert!(message.contains("more than"), "{message}"),
            other => panic!("expected grammar error, got {:?}", other.map(|_| ())),
        }

        let root = parse("{x: [15/T1]}").unwrap();
        let Json::Object(map) = resolve(&root, &types).unwrap() else {
            panic!("expected an object");
        };
        assert_eq!(node_count(&map["x"]), 1 + 15 * 65537);
    }

    #[test]
    fn unreferenced_types_are_not_checked() {
        let types = table("{Broken: {a: Missing}, Ok: {a: u8}}");
        let root = parse("{x: Ok}").unwrap();
        assert_eq!(resolve(&root, &types).unwrap(), json!({"x": {"a": "u8"}}));
    }

    #[test]
    fn dotted_keys_are_validated() {
        let root = parse(r#"{"n.x8": "buf"}"#).unwrap();
        assert!(matches!(
            resolve(&root, &TypeTable::new()),
            Err(CStructError::Grammar { position: 2, .. })
        ));
        let root = parse(r#"{"a.u8": "buffer", "b.i8": "s"}"#).unwrap();
        assert_eq!(
            resolve(&root, &TypeTable::new()).unwrap(),
            json!({"a.u8": "buffer", "b.i8": "s"})
        );
        let root = parse(r#"{".u8": "buf"}"#).unwrap();
        assert!(matches!(
            resolve(&root, &TypeTable::new()),
            Err(CStructError::Grammar { .. })
        ));
    }
}
