//! Codec engine: one recursive walk per call over a compiled [`Node`] tree.
//!
//! Reads never mutate the input. Writes measure first and fail with
//! `BufferOverflow` before touching the destination when the encoded value
//! does not fit.

mod read;
mod scalar;
mod write;

use std::fmt;

use cstruct_buffers::{BufferError, ByteOrder, Reader, Writer};

use crate::error::{CStructError, Result};
use crate::layout::Node;
use crate::value::Value;

pub(crate) use write::measure;

/// Location of the field being processed, e.g. `print[1].text`.
#[derive(Debug, Default)]
pub(crate) struct Path<'m>(Vec<Segment<'m>>);

#[derive(Debug, Clone, Copy)]
enum Segment<'m> {
    Key(&'m str),
    Index(usize),
}

impl<'m> Path<'m> {
    pub(crate) fn key(&mut self, key: &'m str) {
        self.0.push(Segment::Key(key));
    }

    pub(crate) fn index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// `(required, available)` of a failed primitive access.
fn shortfall(err: &BufferError) -> (usize, usize) {
    match *err {
        BufferError::EndOfBuffer { needed, remaining } | BufferError::Overflow { needed, remaining } => {
            (needed, remaining)
        }
        BufferError::InvalidHex { .. } => (0, 0),
    }
}

/// Decodes `layout` from `buffer` at `offset`. Returns the value and the
/// cursor after the last consumed byte.
pub(crate) fn read(layout: &Node, buffer: &[u8], offset: usize, order: ByteOrder) -> Result<(Value, usize)> {
    let mut decoder = read::Decoder::new(Reader::at(buffer, offset, order));
    let value = decoder.node(layout)?;
    Ok((value, decoder.offset()))
}

/// Encodes `value` into `buffer` at `offset`. Returns the number of bytes
/// written.
pub(crate) fn write(
    layout: &Node,
    value: &Value,
    buffer: &mut [u8],
    offset: usize,
    order: ByteOrder,
) -> Result<usize> {
    let size = measure(layout, value);
    let available = buffer.len().saturating_sub(offset);
    if size > available {
        return Err(CStructError::BufferOverflow {
            field: Path::default().to_string(),
            required: size,
            available,
        });
    }
    let mut encoder = write::Encoder::new(Writer::at(buffer, offset, order));
    encoder.node(layout, value)?;
    Ok(encoder.offset() - offset)
}

/// Encodes `value` into a buffer of exactly the encoded size.
pub(crate) fn make(layout: &Node, value: &Value, order: ByteOrder) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; measure(layout, value)];
    write(layout, value, &mut buffer, 0, order)?;
    Ok(buffer)
}
