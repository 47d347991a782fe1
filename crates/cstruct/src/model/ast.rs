//! Syntax tree of a model after shorthand expansion.
//!
//! Shorthands never survive parsing: `[N/T]`, `key:T[N]`, `T a,b;` and
//! `typedef struct {..} Name;` are rewritten into these three node kinds, so
//! later passes only see the canonical shape.

use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    /// A tag, alias or type name in type position.
    Word { text: String, pos: usize },
    Object(Vec<Member>),
    Array(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Member {
    pub key: String,
    pub pos: usize,
    pub value: Expr,
}

impl Expr {
    pub(crate) fn word(text: impl Into<String>, pos: usize) -> Self {
        Expr::Word {
            text: text.into(),
            pos,
        }
    }

    /// JSON form without named-type substitution.
    pub(crate) fn to_json(&self) -> Json {
        match self {
            Expr::Word { text, .. } => Json::String(text.clone()),
            Expr::Object(members) => {
                let mut map = Map::with_capacity(members.len());
                for member in members {
                    map.insert(member.key.clone(), member.value.to_json());
                }
                Json::Object(map)
            }
            Expr::Array(items) => Json::Array(items.iter().map(Expr::to_json).collect()),
        }
    }
}
