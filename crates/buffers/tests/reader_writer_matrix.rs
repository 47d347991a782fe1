//! Writer/Reader roundtrip matrix across both byte orders.

use cstruct_buffers::{hex_to_buffer, print_octets, BufferError, ByteOrder, Reader, Writer};

const ORDERS: [ByteOrder; 2] = [ByteOrder::BigEndian, ByteOrder::LittleEndian];

#[test]
fn roundtrip_integers_matrix() {
    for order in ORDERS {
        let mut data = [0u8; 30];
        let mut w = Writer::new(&mut data, order);
        w.u8(0xFF).unwrap();
        w.i8(i8::MIN).unwrap();
        w.u16(0x0102).unwrap();
        w.i16(-1000).unwrap();
        w.u32(u32::MAX).unwrap();
        w.i32(i32::MIN).unwrap();
        w.u64(0x0102_0304_0506_0708).unwrap();
        w.i64(-1).unwrap();
        assert_eq!(w.x, 30);

        let mut r = Reader::new(&data, order);
        assert_eq!(r.u8().unwrap(), 0xFF);
        assert_eq!(r.i8().unwrap(), i8::MIN);
        assert_eq!(r.u16().unwrap(), 0x0102);
        assert_eq!(r.i16().unwrap(), -1000);
        assert_eq!(r.u32().unwrap(), u32::MAX);
        assert_eq!(r.i32().unwrap(), i32::MIN);
        assert_eq!(r.u64().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(r.i64().unwrap(), -1);
        assert_eq!(r.size(), 0);
    }
}

#[test]
fn roundtrip_floats_matrix() {
    for order in ORDERS {
        let mut data = [0u8; 12];
        let mut w = Writer::new(&mut data, order);
        w.f32(-3.25).unwrap();
        w.f64(1e300).unwrap();

        let mut r = Reader::new(&data, order);
        assert_eq!(r.f32().unwrap(), -3.25);
        assert_eq!(r.f64().unwrap(), 1e300);
    }
}

#[test]
fn byte_order_layout() {
    let mut be = [0u8; 4];
    let mut le = [0u8; 4];
    Writer::new(&mut be, ByteOrder::BigEndian)
        .u32(0x1234_5678)
        .unwrap();
    Writer::new(&mut le, ByteOrder::LittleEndian)
        .u32(0x1234_5678)
        .unwrap();
    assert_eq!(print_octets(&be), "12 34 56 78");
    assert_eq!(print_octets(&le), "78 56 34 12");
}

#[test]
fn reader_never_reads_out_of_bounds() {
    let data = hex_to_buffer("01 02 03").unwrap();
    let mut r = Reader::at(&data, 2, ByteOrder::BigEndian);
    assert_eq!(
        r.u16().unwrap_err(),
        BufferError::EndOfBuffer {
            needed: 2,
            remaining: 1
        }
    );
    assert_eq!(r.buf(1).unwrap(), &[0x03u8]);
    assert!(r.u8().is_err());
}

#[test]
fn writer_never_writes_out_of_bounds() {
    let mut data = hex_to_buffer("cc cc cc").unwrap();
    let mut w = Writer::at(&mut data, 1, ByteOrder::LittleEndian);
    assert!(w.u32(7).is_err());
    w.u16(0x0102).unwrap();
    assert!(w.zeros(1).is_err());
    assert_eq!(data, hex_to_buffer("cc 02 01").unwrap());
}
