//! Byte-order aware binary buffers for cstruct.
//!
//! This crate is the primitive layer underneath the cstruct codec engine: it
//! reads and writes fixed-width integers and IEEE-754 floats at a cursor, in
//! either byte order, and never touches memory outside the slice it was given.
//!
//! # Overview
//!
//! - [`Reader`] - Reads scalars from a borrowed byte slice with cursor tracking
//! - [`Writer`] - Writes scalars into a caller-provided mutable byte slice
//! - [`ByteOrder`] - Big-endian or little-endian encoding of multi-byte scalars
//! - [`hex_to_buffer`] / [`print_octets`] - Hex helpers for fixtures and diagnostics
//!
//! # Example
//!
//! ```
//! use cstruct_buffers::{ByteOrder, Reader, Writer};
//!
//! let mut data = [0u8; 7];
//! let mut writer = Writer::new(&mut data, ByteOrder::LittleEndian);
//! writer.u8(0x01).unwrap();
//! writer.u16(0x0203).unwrap();
//! writer.buf(b"abcd").unwrap();
//! assert_eq!(data, [0x01, 0x03, 0x02, b'a', b'b', b'c', b'd']);
//!
//! let mut reader = Reader::new(&data, ByteOrder::LittleEndian);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.u16().unwrap(), 0x0203);
//! assert_eq!(reader.buf(4).unwrap(), b"abcd");
//! ```

mod hex;
mod reader;
mod writer;

pub use hex::{hex_to_buffer, print_octets};
pub use reader::Reader;
pub use writer::Writer;

/// Byte order used for multi-byte scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte first (network order).
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// Short tag used in diagnostics (`"BE"` / `"LE"`).
    pub fn tag(self) -> &'static str {
        match self {
            ByteOrder::BigEndian => "BE",
            ByteOrder::LittleEndian => "LE",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer { needed: usize, remaining: usize },
    /// Attempted to write past the end of the destination.
    Overflow { needed: usize, remaining: usize },
    /// Hex text contains a non-hex character or an odd number of digits.
    InvalidHex { position: usize },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { needed, remaining } => write!(
                f,
                "end of buffer: needed {needed} bytes, {remaining} remaining"
            ),
            BufferError::Overflow { needed, remaining } => write!(
                f,
                "buffer overflow: needed {needed} bytes, {remaining} remaining"
            ),
            BufferError::InvalidHex { position } => {
                write!(f, "invalid hex digit at position {position}")
            }
        }
    }
}

impl std::error::Error for BufferError {}
