//! Binary buffer writer over caller-provided storage.

use crate::{BufferError, ByteOrder};

/// Generates checked fixed-width writers that honor the writer's byte order.
macro_rules! write_scalar {
    ($($(#[$doc:meta])* $name:ident($ty:ty);)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(&mut self, value: $ty) -> Result<(), BufferError> {
                let bytes = match self.order {
                    ByteOrder::BigEndian => value.to_be_bytes(),
                    ByteOrder::LittleEndian => value.to_le_bytes(),
                };
                self.buf(&bytes)
            }
        )*
    };
}

/// A binary writer over a mutable byte slice.
///
/// The writer never grows its destination: a write that does not fit in the
/// remaining capacity fails with [`BufferError::Overflow`] and writes
/// nothing. Bytes the writer does not reach are left untouched.
///
/// # Example
///
/// ```
/// use cstruct_buffers::{ByteOrder, Writer};
///
/// let mut data = [0xcc; 4];
/// let mut writer = Writer::at(&mut data, 1, ByteOrder::BigEndian);
/// writer.u16(0x1234).unwrap();
/// assert!(writer.u16(0).is_err());
/// assert_eq!(data, [0xcc, 0x12, 0x34, 0xcc]);
/// ```
#[derive(Debug)]
pub struct Writer<'a> {
    /// The destination slice.
    pub uint8: &'a mut [u8],
    /// Current cursor position.
    pub x: usize,
    /// Byte order of multi-byte scalars.
    pub order: ByteOrder,
}

impl<'a> Writer<'a> {
    /// Creates a writer positioned at the start of `uint8`.
    pub fn new(uint8: &'a mut [u8], order: ByteOrder) -> Self {
        Self::at(uint8, 0, order)
    }

    /// Creates a writer positioned at `x`.
    pub fn at(uint8: &'a mut [u8], x: usize, order: ByteOrder) -> Self {
        Self { uint8, x, order }
    }

    /// Returns the remaining capacity in bytes.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    /// Copies `data` at the cursor and advances past it.
    pub fn buf(&mut self, data: &[u8]) -> Result<(), BufferError> {
        if data.is_empty() {
            return Ok(());
        }
        let remaining = self.size();
        if data.len() > remaining {
            return Err(BufferError::Overflow {
                needed: data.len(),
                remaining,
            });
        }
        let start = self.x;
        self.x += data.len();
        self.uint8[start..self.x].copy_from_slice(data);
        Ok(())
    }

    /// Writes `count` zero bytes.
    pub fn zeros(&mut self, count: usize) -> Result<(), BufferError> {
        if count == 0 {
            return Ok(());
        }
        let remaining = self.size();
        if count > remaining {
            return Err(BufferError::Overflow {
                needed: count,
                remaining,
            });
        }
        let start = self.x;
        self.x += count;
        self.uint8[start..self.x].fill(0);
        Ok(())
    }

    write_scalar! {
        /// Writes an unsigned 8-bit integer.
        u8(u8);
        /// Writes a signed 8-bit integer.
        i8(i8);
        /// Writes an unsigned 16-bit integer.
        u16(u16);
        /// Writes a signed 16-bit integer.
        i16(i16);
        /// Writes an unsigned 32-bit integer.
        u32(u32);
        /// Writes a signed 32-bit integer.
        i32(i32);
        /// Writes an unsigned 64-bit integer.
        u64(u64);
        /// Writes a signed 64-bit integer.
        i64(i64);
        /// Writes a 32-bit IEEE-754 float.
        f32(f32);
        /// Writes a 64-bit IEEE-754 float.
        f64(f64);
    }
}
