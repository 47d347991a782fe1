use cstruct_buffers::{BufferError, Reader};
use indexmap::IndexMap;

use super::scalar::{read_length, read_scalar};
use super::{shortfall, Path};
use crate::error::{CStructError, Result};
use crate::layout::{Field, FieldKind, Node, Payload};
use crate::tags::LengthType;
use crate::value::Value;

pub(crate) struct Decoder<'a, 'm> {
    reader: Reader<'a>,
    path: Path<'m>,
}

impl<'a, 'm> Decoder<'a, 'm> {
    pub(crate) fn new(reader: Reader<'a>) -> Self {
        Self {
            reader,
            path: Path::default(),
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.reader.x
    }

    pub(crate) fn node(&mut self, node: &'m Node) -> Result<Value> {
        match node {
            Node::Scalar(scalar) => read_scalar(&mut self.reader, *scalar).map_err(|e| self.underflow(&e)),
            Node::Str(size) => self.take(*size).map(text),
            Node::Buf(size) => self.take(*size).map(|bytes| Value::Bytes(bytes.to_vec())),
            Node::Struct(fields) => {
                let mut map = IndexMap::with_capacity(fields.len());
                for field in fields {
                    self.path.key(&field.name);
                    let value = self.field(field)?;
                    self.path.pop();
                    map.insert(field.name.clone(), value);
                }
                Ok(Value::Object(map))
            }
            Node::Seq(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    self.path.index(i);
                    out.push(self.node(item)?);
                    self.path.pop();
                }
                Ok(Value::Array(out))
            }
        }
    }

    fn field(&mut self, field: &'m Field) -> Result<Value> {
        let (len, payload) = match &field.kind {
            FieldKind::Fixed(node) => return self.node(node),
            FieldKind::Dynamic { len, payload } => (*len, payload),
        };
        let count = self.length(len)?;
        match payload {
            Payload::Str => self.take(count).map(text),
            Payload::Buf => self.take(count).map(|bytes| Value::Bytes(bytes.to_vec())),
            Payload::Items(node) => {
                // A corrupt count must not drive the allocation.
                let mut items = Vec::with_capacity(count.min(self.reader.size()));
                for i in 0..count {
                    self.path.index(i);
                    items.push(self.node(node)?);
                    self.path.pop();
                }
                Ok(Value::Array(items))
            }
        }
    }

    fn length(&mut self, len: LengthType) -> Result<usize> {
        let count = read_length(&mut self.reader, len).map_err(|e| self.underflow(&e))?;
        usize::try_from(count).map_err(|_| CStructError::InvalidLength {
            field: self.path.to_string(),
            len: count,
        })
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8]> {
        self.reader.buf(size).map_err(|e| self.underflow(&e))
    }

    fn underflow(&self, err: &BufferError) -> CStructError {
        let (required, available) = shortfall(err);
        CStructError::BufferUnderflow {
            field: self.path.to_string(),
            required,
            available,
        }
    }
}

/// Text up to the first zero byte. The cursor has already moved past the
/// whole field.
fn text(bytes: &[u8]) -> Value {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Value::Str(String::from_utf8_lossy(&bytes[..end]).into_owned())
}
