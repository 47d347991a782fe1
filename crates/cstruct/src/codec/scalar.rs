//! Scalar leaves: tag-directed reads and coercing writes.

use cstruct_buffers::{BufferError, Reader, Writer};

use crate::tags::{LengthType, Scalar};
use crate::value::Value;

/// Why a scalar could not be written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScalarError {
    Mismatch(&'static str),
    OutOfRange,
    Buffer(BufferError),
}

impl From<BufferError> for ScalarError {
    fn from(err: BufferError) -> Self {
        ScalarError::Buffer(err)
    }
}

pub(crate) fn read_scalar(reader: &mut Reader<'_>, scalar: Scalar) -> Result<Value, BufferError> {
    Ok(match scalar {
        Scalar::U8 => Value::UInt(reader.u8()?.into()),
        Scalar::I8 => Value::Int(reader.i8()?.into()),
        Scalar::U16 => Value::UInt(reader.u16()?.into()),
        Scalar::I16 => Value::Int(reader.i16()?.into()),
        Scalar::B16 => Value::Bool(reader.u16()? != 0),
        Scalar::U32 => Value::UInt(reader.u32()?.into()),
        Scalar::I32 => Value::Int(reader.i32()?.into()),
        Scalar::B32 => Value::Bool(reader.u32()? != 0),
        Scalar::U64 => Value::UInt(reader.u64()?),
        Scalar::I64 => Value::Int(reader.i64()?),
        Scalar::B64 => Value::Bool(reader.u64()? != 0),
        Scalar::F32 => Value::Float(reader.f32()?.into()),
        Scalar::F64 => Value::Float(reader.f64()?),
    })
}

/// Reads a dynamic-length prefix as a signed wide integer so negative
/// counts can be reported.
pub(crate) fn read_length(reader: &mut Reader<'_>, len: LengthType) -> Result<i128, BufferError> {
    Ok(match len {
        LengthType::U8 => reader.u8()?.into(),
        LengthType::U16 => reader.u16()?.into(),
        LengthType::U32 => reader.u32()?.into(),
        LengthType::U64 => reader.u64()?.into(),
        LengthType::I8 => reader.i8()?.into(),
        LengthType::I16 => reader.i16()?.into(),
        LengthType::I32 => reader.i32()?.into(),
        LengthType::I64 => reader.i64()?.into(),
    })
}

pub(crate) fn write_scalar(
    writer: &mut Writer<'_>,
    scalar: Scalar,
    value: &Value,
) -> Result<(), ScalarError> {
    match scalar {
        Scalar::U8 => writer.u8(narrow(value)?)?,
        Scalar::I8 => writer.i8(narrow(value)?)?,
        Scalar::U16 => writer.u16(narrow(value)?)?,
        Scalar::I16 => writer.i16(narrow(value)?)?,
        Scalar::B16 => writer.u16(flag(value)?.into())?,
        Scalar::U32 => writer.u32(narrow(value)?)?,
        Scalar::I32 => writer.i32(narrow(value)?)?,
        Scalar::B32 => writer.u32(flag(value)?.into())?,
        Scalar::U64 => writer.u64(narrow(value)?)?,
        Scalar::I64 => writer.i64(narrow(value)?)?,
        Scalar::B64 => writer.u64(flag(value)?.into())?,
        Scalar::F32 => writer.f32(float(value)? as f32)?,
        Scalar::F64 => writer.f64(float(value)?)?,
    }
    Ok(())
}

/// Writes a dynamic-length prefix. The caller checks `count` against
/// [`LengthType::max`] first.
pub(crate) fn write_length(
    writer: &mut Writer<'_>,
    len: LengthType,
    count: usize,
) -> Result<(), ScalarError> {
    write_scalar(writer, len.scalar(), &Value::UInt(count as u64))
}

/// Integer view of a value: absent is 0, booleans are 0/1, floats are
/// truncated toward zero.
fn integer(value: &Value) -> Result<i128, ScalarError> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Int(n) => Ok(i128::from(*n)),
        Value::UInt(n) => Ok(i128::from(*n)),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i128),
        Value::Float(_) => Err(ScalarError::OutOfRange),
        _ => Err(ScalarError::Mismatch("a number")),
    }
}

fn narrow<T: TryFrom<i128>>(value: &Value) -> Result<T, ScalarError> {
    T::try_from(integer(value)?).map_err(|_| ScalarError::OutOfRange)
}

fn flag(value: &Value) -> Result<u8, ScalarError> {
    let set = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::UInt(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        _ => return Err(ScalarError::Mismatch("a boolean")),
    };
    Ok(u8::from(set))
}

fn float(value: &Value) -> Result<f64, ScalarError> {
    match value {
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Int(n) => Ok(*n as f64),
        Value::UInt(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        _ => Err(ScalarError::Mismatch("a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstruct_buffers::ByteOrder;

    fn encode(scalar: Scalar, value: Value, order: ByteOrder) -> Result<Vec<u8>, ScalarError> {
        let mut out = vec![0u8; scalar.width()];
        write_scalar(&mut Writer::new(&mut out, order), scalar, &value)?;
        Ok(out)
    }

    #[test]
    fn coercions() {
        let be = ByteOrder::BigEndian;
        assert_eq!(encode(Scalar::U16, Value::Null, be).unwrap(), [0, 0]);
        assert_eq!(encode(Scalar::U16, Value::Bool(true), be).unwrap(), [0, 1]);
        assert_eq!(encode(Scalar::I8, Value::Float(-3.9), be).unwrap(), [0xfd]);
        assert_eq!(encode(Scalar::B32, Value::UInt(9), be).unwrap(), [0, 0, 0, 1]);
        assert_eq!(
            encode(Scalar::F64, Value::Int(1), be).unwrap(),
            1.0f64.to_be_bytes()
        );
        assert_eq!(
            encode(Scalar::U64, Value::UInt(u64::MAX), ByteOrder::LittleEndian).unwrap(),
            [0xff; 8]
        );
    }

    #[test]
    fn range_and_type_errors() {
        let be = ByteOrder::BigEndian;
        assert_eq!(encode(Scalar::U8, Value::Int(256), be), Err(ScalarError::OutOfRange));
        assert_eq!(encode(Scalar::U8, Value::Int(-1), be), Err(ScalarError::OutOfRange));
        assert_eq!(encode(Scalar::I64, Value::UInt(u64::MAX), be), Err(ScalarError::OutOfRange));
        assert_eq!(encode(Scalar::U32, Value::Float(f64::INFINITY), be), Err(ScalarError::OutOfRange));
        assert_eq!(
            encode(Scalar::U32, Value::from("7"), be),
            Err(ScalarError::Mismatch("a number"))
        );
        assert_eq!(
            encode(Scalar::B16, Value::Bytes(vec![1]), be),
            Err(ScalarError::Mismatch("a boolean"))
        );
    }

    #[test]
    fn reads_by_tag() {
        let data = [0xff, 0xfe, 0x00, 0x02];
        let mut reader = Reader::new(&data, ByteOrder::BigEndian);
        assert_eq!(read_scalar(&mut reader, Scalar::I8).unwrap(), Value::Int(-1));
        assert_eq!(read_scalar(&mut reader, Scalar::U8).unwrap(), Value::UInt(0xfe));
        assert_eq!(read_scalar(&mut reader, Scalar::B16).unwrap(), Value::Bool(true));
        assert!(read_scalar(&mut reader, Scalar::U8).is_err());

        let mut reader = Reader::new(&data, ByteOrder::LittleEndian);
        assert_eq!(read_length(&mut reader, LengthType::I16).unwrap(), -257);
        assert_eq!(read_length(&mut reader, LengthType::U16).unwrap(), 0x0200);
    }
}
