use std::borrow::Cow;

use cstruct_buffers::{BufferError, Writer};
use tracing::warn;

use super::scalar::{write_length, write_scalar, ScalarError};
use super::{shortfall, Path};
use crate::error::{CStructError, Result};
use crate::layout::{Field, FieldKind, Node, Payload};
use crate::tags::{LengthType, Scalar};
use crate::value::Value;

static NULL: Value = Value::Null;

pub(crate) struct Encoder<'a, 'm> {
    writer: Writer<'a>,
    path: Path<'m>,
}

impl<'a, 'm> Encoder<'a, 'm> {
    pub(crate) fn new(writer: Writer<'a>) -> Self {
        Self {
            writer,
            path: Path::default(),
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.writer.x
    }

    pub(crate) fn node(&mut self, node: &'m Node, value: &Value) -> Result<()> {
        match node {
            Node::Scalar(scalar) => self.scalar(*scalar, value),
            Node::Str(size) => {
                let bytes = text_bytes(value).ok_or_else(|| self.mismatch("a string"))?;
                let used = bytes.len().min(*size);
                if used < bytes.len() {
                    warn!(
                        field = %self.path,
                        len = bytes.len(),
                        size = *size,
                        "fixed string truncated"
                    );
                }
                self.bytes(&bytes[..used])?;
                self.zeros(*size - used)
            }
            Node::Buf(size) => {
                if value.is_null() {
                    return self.zeros(*size);
                }
                let bytes = raw_bytes(value).ok_or_else(|| self.mismatch("bytes"))?;
                if bytes.len() < *size {
                    return Err(CStructError::SizeMismatch {
                        field: self.path.to_string(),
                        expected: *size,
                        actual: bytes.len(),
                    });
                }
                self.bytes(&bytes[..*size])
            }
            Node::Struct(fields) => {
                let map = match value {
                    Value::Object(map) => Some(map),
                    Value::Null => None,
                    _ => return Err(self.mismatch("an object")),
                };
                for field in fields {
                    let value = map.and_then(|m| m.get(&field.name)).unwrap_or(&NULL);
                    self.path.key(&field.name);
                    self.field(field, value)?;
                    self.path.pop();
                }
                Ok(())
            }
            Node::Seq(items) => {
                let values = array_items(value).ok_or_else(|| self.mismatch("an array"))?;
                for (i, item) in items.iter().enumerate() {
                    self.path.index(i);
                    self.node(item, values.get(i).unwrap_or(&NULL))?;
                    self.path.pop();
                }
                Ok(())
            }
        }
    }

    fn field(&mut self, field: &'m Field, value: &Value) -> Result<()> {
        let (len, payload) = match &field.kind {
            FieldKind::Fixed(node) => return self.node(node, value),
            FieldKind::Dynamic { len, payload } => (*len, payload),
        };
        match payload {
            Payload::Str => {
                let bytes = text_bytes(value).ok_or_else(|| self.mismatch("a string"))?;
                self.length(len, bytes.len())?;
                self.bytes(bytes)
            }
            Payload::Buf => {
                let bytes = raw_bytes(value).ok_or_else(|| self.mismatch("bytes"))?;
                self.length(len, bytes.len())?;
                self.bytes(&bytes)
            }
            Payload::Items(node) => {
                let values = array_items(value).ok_or_else(|| self.mismatch("an array"))?;
                self.length(len, values.len())?;
                for (i, item) in values.iter().enumerate() {
                    self.path.index(i);
                    self.node(node, item)?;
                    self.path.pop();
                }
                Ok(())
            }
        }
    }

    fn length(&mut self, len: LengthType, count: usize) -> Result<()> {
        if count as u64 > len.max() {
            return Err(CStructError::LengthOverflow {
                field: self.path.to_string(),
                len: count,
                max: len.max(),
            });
        }
        write_length(&mut self.writer, len, count).map_err(|e| self.scalar_error(e, len.scalar()))
    }

    fn scalar(&mut self, scalar: Scalar, value: &Value) -> Result<()> {
        write_scalar(&mut self.writer, scalar, value).map_err(|e| self.scalar_error(e, scalar))
    }

    fn bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.buf(bytes).map_err(|e| self.overflow(&e))
    }

    fn zeros(&mut self, count: usize) -> Result<()> {
        self.writer.zeros(count).map_err(|e| self.overflow(&e))
    }

    fn scalar_error(&self, err: ScalarError, scalar: Scalar) -> CStructError {
        match err {
            ScalarError::Mismatch(expected) => self.mismatch(expected),
            ScalarError::OutOfRange => CStructError::ValueOutOfRange {
                field: self.path.to_string(),
                tag: scalar.tag(),
            },
            ScalarError::Buffer(err) => self.overflow(&err),
        }
    }

    fn mismatch(&self, expected: &'static str) -> CStructError {
        CStructError::ValueMismatch {
            field: self.path.to_string(),
            expected,
        }
    }

    fn overflow(&self, err: &BufferError) -> CStructError {
        let (required, available) = shortfall(err);
        CStructError::BufferOverflow {
            field: self.path.to_string(),
            required,
            available,
        }
    }
}

/// Encoded size of `value` under `node`.
///
/// Values the encoder would reject measure as if absent; the encoder reports
/// the error with its field path.
pub(crate) fn measure(node: &Node, value: &Value) -> usize {
    match node {
        Node::Scalar(scalar) => scalar.width(),
        Node::Str(size) | Node::Buf(size) => *size,
        Node::Struct(fields) => fields.iter().fold(0usize, |sum, field| {
            let value = value.get(&field.name).unwrap_or(&NULL);
            sum.saturating_add(measure_field(field, value))
        }),
        Node::Seq(items) => {
            let values = array_items(value).unwrap_or(&[]);
            items.iter().enumerate().fold(0usize, |sum, (i, item)| {
                sum.saturating_add(measure(item, values.get(i).unwrap_or(&NULL)))
            })
        }
    }
}

fn measure_field(field: &Field, value: &Value) -> usize {
    let (len, payload) = match &field.kind {
        FieldKind::Fixed(node) => return measure(node, value),
        FieldKind::Dynamic { len, payload } => (len, payload),
    };
    let body = match payload {
        Payload::Str => text_bytes(value).map_or(0, <[u8]>::len),
        Payload::Buf => raw_bytes(value).map_or(0, |bytes| bytes.len()),
        Payload::Items(node) => array_items(value)
            .unwrap_or(&[])
            .iter()
            .fold(0usize, |sum, item| sum.saturating_add(measure(node, item))),
    };
    len.scalar().width().saturating_add(body)
}

/// Bytes of a string field: text as UTF-8, raw bytes as given.
fn text_bytes(value: &Value) -> Option<&[u8]> {
    match value {
        Value::Null => Some(&[]),
        Value::Str(s) => Some(s.as_bytes()),
        Value::Bytes(bytes) => Some(bytes),
        _ => None,
    }
}

/// Bytes of a buffer field. Arrays must hold integers in `0..=255`.
fn raw_bytes(value: &Value) -> Option<Cow<'_, [u8]>> {
    match value {
        Value::Null => Some(Cow::Borrowed(&[])),
        Value::Bytes(bytes) => Some(Cow::Borrowed(bytes)),
        Value::Str(s) => Some(Cow::Borrowed(s.as_bytes())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Cow::Owned),
        _ => None,
    }
}

fn array_items(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Null => Some(&[]),
        Value::Array(items) => Some(items),
        _ => None,
    }
}
