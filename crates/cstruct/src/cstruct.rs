//! Compiled layout handle.

use cstruct_buffers::ByteOrder;
use serde_json::Value as Json;
use tracing::trace;

use crate::codec;
use crate::error::Result;
use crate::layout::Node;
use crate::model::{Compiler, ModelSource};
use crate::value::Value;

/// Outcome of [`CStruct::read`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    pub value: Value,
    /// Cursor after the last byte read.
    pub offset: usize,
    /// Bytes consumed.
    pub size: usize,
}

/// Outcome of [`CStruct::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    /// Cursor after the last byte written.
    pub offset: usize,
    /// Bytes written.
    pub size: usize,
}

/// Outcome of [`CStruct::make`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeResult {
    pub buffer: Vec<u8>,
    pub offset: usize,
    pub size: usize,
}

/// A model compiled once for one byte order.
///
/// Calls never mutate the handle, so one `CStruct` can serve any number of
/// threads at once.
///
/// ```
/// use cstruct::{CStruct, Value};
/// use serde_json::json;
///
/// let header = CStruct::le("{u16 id; name: string[u8]}").unwrap();
/// let made = header.make(&Value::from(json!({"id": 7, "name": "abc"}))).unwrap();
/// assert_eq!(made.buffer, [7, 0, 3, b'a', b'b', b'c']);
///
/// let read = header.read(&made.buffer, 0).unwrap();
/// assert_eq!(read.value["name"].as_str(), Some("abc"));
/// assert_eq!((read.offset, read.size), (6, 6));
/// ```
#[derive(Debug, Clone)]
pub struct CStruct {
    json_model: String,
    model: Json,
    json_types: Option<String>,
    layout: Node,
    order: ByteOrder,
}

impl CStruct {
    pub fn new(
        model: impl Into<ModelSource>,
        types: Option<ModelSource>,
        order: ByteOrder,
    ) -> Result<Self> {
        let builder = Self::builder(model).byte_order(order);
        match types {
            Some(types) => builder.types(types).build(),
            None => builder.build(),
        }
    }

    /// Big-endian layout without named types.
    pub fn be(model: impl Into<ModelSource>) -> Result<Self> {
        Self::new(model, None, ByteOrder::BigEndian)
    }

    /// Little-endian layout without named types.
    pub fn le(model: impl Into<ModelSource>) -> Result<Self> {
        Self::new(model, None, ByteOrder::LittleEndian)
    }

    pub fn builder(model: impl Into<ModelSource>) -> CStructBuilder {
        CStructBuilder {
            model: model.into(),
            types: None,
            nested: Vec::new(),
            order: ByteOrder::default(),
        }
    }

    /// Canonical model text.
    pub fn json_model(&self) -> &str {
        &self.json_model
    }

    /// A fresh copy of the canonical model.
    pub fn model_clone(&self) -> Json {
        self.model.clone()
    }

    /// Canonical text of the named-types table, without substitution.
    pub fn json_types(&self) -> Option<&str> {
        self.json_types.as_deref()
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn layout(&self) -> &Node {
        &self.layout
    }

    /// Encoded size, when it does not depend on the value.
    pub fn static_size(&self) -> Option<usize> {
        self.layout.static_size()
    }

    /// Decodes one value from `buffer` starting at `offset`.
    pub fn read(&self, buffer: &[u8], offset: usize) -> Result<ReadResult> {
        let (value, end) = codec::read(&self.layout, buffer, offset, self.order)?;
        let size = end - offset;
        trace!(offset, size, order = %self.order, "read");
        Ok(ReadResult {
            value,
            offset: end,
            size,
        })
    }

    /// Encodes `value` into `buffer` starting at `offset`.
    ///
    /// Fails without modifying `buffer` when the encoded value does not fit.
    pub fn write(&self, buffer: &mut [u8], value: &Value, offset: usize) -> Result<WriteResult> {
        let size = codec::write(&self.layout, value, buffer, offset, self.order)?;
        trace!(offset, size, order = %self.order, "write");
        Ok(WriteResult {
            offset: offset + size,
            size,
        })
    }

    /// Encodes `value` into a new buffer of exactly the encoded size.
    pub fn make(&self, value: &Value) -> Result<MakeResult> {
        let buffer = codec::make(&self.layout, value, self.order)?;
        let size = buffer.len();
        trace!(size, order = %self.order, "make");
        Ok(MakeResult {
            buffer,
            offset: size,
            size,
        })
    }
}

/// Builder for a [`CStruct`].
///
/// ```
/// use cstruct::{ByteOrder, CStruct};
///
/// let lcd = CStruct::be("{line: u8, text: s4}").unwrap();
/// let display = CStruct::builder("{print: [2/LCD]}")
///     .nested("LCD", &lcd)
///     .byte_order(ByteOrder::LittleEndian)
///     .build()
///     .unwrap();
/// assert_eq!(display.static_size(), Some(10));
/// ```
#[derive(Debug, Clone)]
pub struct CStructBuilder {
    model: ModelSource,
    types: Option<ModelSource>,
    nested: Vec<(String, String)>,
    order: ByteOrder,
}

impl CStructBuilder {
    /// Named-types table; its root must be an object.
    pub fn types(mut self, types: impl Into<ModelSource>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// Makes another layout's model available as type `name`. Nested
    /// layouts override same-named entries of the types table.
    pub fn nested(mut self, name: &str, layout: &CStruct) -> Self {
        self.nested
            .push((name.to_string(), layout.json_model().to_string()));
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn build(self) -> Result<CStruct> {
        let mut compiler = match self.types {
            Some(types) => Compiler::with_types(types)?,
            None => Compiler::new(),
        };
        for (name, model) in &self.nested {
            compiler.define(name, model)?;
        }
        let (json_model, model) = compiler.compile_with_text(self.model)?;
        let layout = Node::from_model(&model)?;
        Ok(CStruct {
            json_model,
            model,
            json_types: compiler.types_json(),
            layout,
            order: self.order,
        })
    }
}
