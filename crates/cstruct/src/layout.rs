//! Compiled layout tree.
//!
//! The canonical model is lowered once into [`Node`]s; every read, write and
//! make call walks this tree by shared reference.

use serde_json::Value as Json;

use crate::error::{CStructError, Result};
use crate::tags::{is_buffer_type, is_string_type, LengthType, Scalar, Tag};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    /// Fixed-length text, zero padded.
    Str(usize),
    /// Fixed-length raw bytes.
    Buf(usize),
    /// Named fields in model order.
    Struct(Vec<Field>),
    /// Unnamed sub-layouts back to back.
    Seq(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Fixed(Node),
    /// A `len`-typed count followed by that many payload bytes or items.
    Dynamic { len: LengthType, payload: Payload },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Str,
    Buf,
    Items(Node),
}

impl Node {
    /// Lowers a canonical model.
    pub fn from_model(model: &Json) -> Result<Node> {
        match model {
            Json::String(word) => lower_tag(word),
            Json::Array(items) => items.iter().map(Node::from_model).collect::<Result<_>>().map(Node::Seq),
            Json::Object(map) => map
                .iter()
                .map(|(key, value)| lower_field(key, value))
                .collect::<Result<_>>()
                .map(Node::Struct),
            other => Err(CStructError::grammar(
                format!("expected a type, found `{other}`"),
                0,
            )),
        }
    }

    /// Encoded size when the layout has no dynamic field.
    pub fn static_size(&self) -> Option<usize> {
        match self {
            Node::Scalar(scalar) => Some(scalar.width()),
            Node::Str(size) | Node::Buf(size) => Some(*size),
            Node::Struct(fields) => fields.iter().try_fold(0usize, |sum, field| match &field.kind {
                FieldKind::Fixed(node) => sum.checked_add(node.static_size()?),
                FieldKind::Dynamic { .. } => None,
            }),
            Node::Seq(items) => items
                .iter()
                .try_fold(0usize, |sum, item| sum.checked_add(item.static_size()?)),
        }
    }
}

fn lower_tag(word: &str) -> Result<Node> {
    match Tag::parse(word) {
        Some(Tag::Scalar(scalar)) => Ok(Node::Scalar(scalar)),
        Some(Tag::Str(Some(size))) => Ok(Node::Str(size)),
        Some(Tag::Buf(Some(size))) => Ok(Node::Buf(size)),
        Some(Tag::Str(None) | Tag::Buf(None)) => Err(CStructError::grammar(
            format!("`{word}` has no length; use a sized tag or a dynamic key"),
            0,
        )),
        None => Err(CStructError::UnresolvedType {
            name: word.to_string(),
        }),
    }
}

fn lower_field(key: &str, value: &Json) -> Result<Field> {
    let Some((name, tag)) = key.rsplit_once('.') else {
        return Ok(Field {
            name: key.to_string(),
            kind: FieldKind::Fixed(Node::from_model(value)?),
        });
    };
    let len = LengthType::parse(tag).ok_or_else(|| {
        CStructError::grammar(format!("unsupported dynamic length type `{tag}` in `{key}`"), 0)
    })?;
    let payload = match value {
        Json::String(word) if is_string_type(word) => Payload::Str,
        Json::String(word) if is_buffer_type(word) => Payload::Buf,
        other => {
            let node = Node::from_model(other)?;
            // Elements must consume input, or a count alone sizes the result.
            if node.static_size() == Some(0) {
                return Err(CStructError::grammar(
                    format!("dynamic field `{key}` has zero-width elements"),
                    0,
                ));
            }
            Payload::Items(node)
        }
    };
    Ok(Field {
        name: name.to_string(),
        kind: FieldKind::Dynamic { len, payload },
    })
}
