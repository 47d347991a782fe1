//! Binary buffer reader with cursor tracking.

use crate::{BufferError, ByteOrder};

/// Generates checked fixed-width readers that honor the reader's byte order.
macro_rules! read_scalar {
    ($($(#[$doc:meta])* $name:ident -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&mut self) -> Result<$ty, BufferError> {
                let bytes = self.take::<{ std::mem::size_of::<$ty>() }>()?;
                Ok(match self.order {
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(bytes),
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(bytes),
                })
            }
        )*
    };
}

/// A binary buffer reader over a borrowed byte slice.
///
/// The reader keeps a cursor `x` and an exclusive `end`. Every read is bounds
/// checked: asking for more bytes than `end - x` fails with
/// [`BufferError::EndOfBuffer`] and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use cstruct_buffers::{ByteOrder, Reader};
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data, ByteOrder::BigEndian);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u16().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
    /// Byte order of multi-byte scalars.
    pub order: ByteOrder,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8], order: ByteOrder) -> Self {
        Self::at(uint8, 0, order)
    }

    /// Creates a reader positioned at `x`. A cursor past the end is allowed;
    /// any non-empty read from it fails.
    pub fn at(uint8: &'a [u8], x: usize, order: ByteOrder) -> Self {
        Self {
            uint8,
            x,
            end: uint8.len(),
            order,
        }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Advances the cursor by `length` bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.buf(length).map(|_| ())
    }

    /// Returns the next `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        if size == 0 {
            return Ok(&[]);
        }
        let remaining = self.size();
        if size > remaining {
            return Err(BufferError::EndOfBuffer {
                needed: size,
                remaining,
            });
        }
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    read_scalar! {
        /// Reads an unsigned 8-bit integer.
        u8 -> u8;
        /// Reads a signed 8-bit integer.
        i8 -> i8;
        /// Reads an unsigned 16-bit integer.
        u16 -> u16;
        /// Reads a signed 16-bit integer.
        i16 -> i16;
        /// Reads an unsigned 32-bit integer.
        u32 -> u32;
        /// Reads a signed 32-bit integer.
        i32 -> i32;
        /// Reads an unsigned 64-bit integer.
        u64 -> u64;
        /// Reads a signed 64-bit integer.
        i64 -> i64;
        /// Reads a 32-bit IEEE-754 float.
        f32 -> f32;
        /// Reads a 64-bit IEEE-754 float.
        f64 -> f64;
    }
}
