//! Property tests over generated values.

use cstruct::{ByteOrder, CStruct, Value};
use proptest::prelude::*;
use serde_json::json;

const TYPES: &str = "typedef struct { i16 x, y; } Point;";

const MODEL: &str = "
    {
        u8 kind;
        i32 delta;
        u64 stamp;
        b16 on;
        d ratio;
        name: string[u8];
        raw: buf[u16];
        points: Point[u8];
        tag: s6;
    }
";

fn layout(order: ByteOrder) -> CStruct {
    CStruct::builder(MODEL)
        .types(TYPES)
        .byte_order(order)
        .build()
        .unwrap()
}

fn order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::BigEndian), Just(ByteOrder::LittleEndian)]
}

prop_compose! {
    fn message()(
        kind in any::<u8>(),
        delta in any::<i32>(),
        stamp in any::<u64>(),
        on in any::<bool>(),
        ratio in -1e12f64..1e12,
        name in "[a-zA-Z0-9 ]{0,40}",
        raw in proptest::collection::vec(any::<u8>(), 0..64),
        points in proptest::collection::vec((any::<i16>(), any::<i16>()), 0..8),
        tag in "[a-z]{1,6}",
    ) -> Value {
        let points: Vec<_> = points.iter().map(|(x, y)| json!({"x": x, "y": y})).collect();
        Value::from(json!({
            "kind": kind,
            "delta": delta,
            "stamp": stamp,
            "on": on,
            "ratio": ratio,
            "name": name,
            "raw": raw,
            "points": points,
            "tag": tag,
        }))
    }
}

proptest! {
    #[test]
    fn make_then_read_is_identity(value in message(), order in order()) {
        let layout = layout(order);
        let made = layout.make(&value).unwrap();
        let read = layout.read(&made.buffer, 0).unwrap();
        prop_assert_eq!(&read.value, &value);
        prop_assert_eq!(read.size, made.size);
    }

    #[test]
    fn cursor_is_additive(value in message(), order in order(), lead in 0usize..16) {
        let layout = layout(order);
        let size = layout.make(&value).unwrap().size;
        let mut buffer = vec![0xa5u8; lead + size + 3];
        let written = layout.write(&mut buffer, &value, lead).unwrap();
        prop_assert_eq!(written.size, size);
        prop_assert_eq!(written.offset, lead + size);
        prop_assert!(buffer[..lead].iter().all(|&b| b == 0xa5));
        prop_assert!(buffer[lead + size..].iter().all(|&b| b == 0xa5));

        let read = layout.read(&buffer, lead).unwrap();
        prop_assert_eq!(read.offset, lead + size);
        prop_assert_eq!(read.value, value);
    }

    #[test]
    fn fixed_string_padding_law(text in "[ -~]{0,12}", n in 0usize..10) {
        let layout = CStruct::be(format!("{{t: s{n}}}")).unwrap();
        let made = layout.make(&Value::from(json!({ "t": text }))).unwrap();
        let bytes = text.as_bytes();
        prop_assert_eq!(made.buffer.len(), n);
        let kept = bytes.len().min(n);
        prop_assert_eq!(&made.buffer[..kept], &bytes[..kept]);
        prop_assert!(made.buffer[kept..].iter().all(|&b| b == 0));
    }

    #[test]
    fn dynamic_prefix_equals_payload_length(raw in proptest::collection::vec(any::<u8>(), 0..300)) {
        let layout = CStruct::le("{r: buf[u16]}").unwrap();
        let made = layout.make(&Value::from(json!({ "r": raw.clone() }))).unwrap();
        let prefix = u16::from_le_bytes([made.buffer[0], made.buffer[1]]);
        prop_assert_eq!(usize::from(prefix), raw.len());
        prop_assert_eq!(made.size, 2 + raw.len());
    }

    #[test]
    fn byte_orders_share_structure(value in message()) {
        let be = layout(ByteOrder::BigEndian);
        let le = layout(ByteOrder::LittleEndian);
        let from_be = be.make(&value).unwrap();
        let from_le = le.make(&value).unwrap();
        prop_assert_eq!(from_be.size, from_le.size);
        prop_assert_eq!(be.read(&from_be.buffer, 0).unwrap().value, le.read(&from_le.buffer, 0).unwrap().value);
    }
}
