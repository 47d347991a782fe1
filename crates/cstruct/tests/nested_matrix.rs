//! Named types, nested layouts, sequences and repeated payloads.

use cstruct::{ByteOrder, CStruct, CStructError, ModelSource, Value};
use cstruct_buffers::print_octets;
use serde_json::json;

fn lcd_value() -> Value {
    Value::from(json!({
        "print": [
            {"line": 1, "text": "1st "},
            {"line": 2, "text": "2nd "}
        ]
    }))
}

#[test]
fn lcd_through_types_table() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let layout = CStruct::new(
            json!({"print": ["LCD", "LCD"]}),
            Some(json!({"LCD": {"line": "u8", "text": "s4"}}).into()),
            order,
        )
        .unwrap();
        let made = layout.make(&lcd_value()).unwrap();
        assert_eq!(print_octets(&made.buffer), "01 31 73 74 20 02 32 6e 64 20");
        assert_eq!((made.offset, made.size), (10, 10));

        let read = layout.read(&made.buffer, 0).unwrap();
        assert_eq!(read.value, lcd_value());
    }
}

#[test]
fn lcd_through_every_model_spelling() {
    let types: [ModelSource; 3] = [
        "{LCD: {line: u8, text: s4}}".into(),
        "typedef struct { uint8_t line; string text[4]; } LCD;".into(),
        "{typedef struct {u8 line; s4 text;} LCD;}".into(),
    ];
    let models = ["{print: [2/LCD]}", "{LCD print[2];}", r#"{"print": ["LCD", "LCD"]}"#];
    for types in &types {
        for model in models {
            let layout = CStruct::builder(model).types(types.clone()).build().unwrap();
            let made = layout.make(&lcd_value()).unwrap();
            assert_eq!(
                print_octets(&made.buffer),
                "01 31 73 74 20 02 32 6e 64 20",
                "model {model} with types {types:?}"
            );
        }
    }
}

#[test]
fn nested_layouts() {
    let lcd = CStruct::be("{line: u8, text: s4}").unwrap();
    let layout = CStruct::builder("{count: u8, rows: LCD[u8]}")
        .nested("LCD", &lcd)
        .build()
        .unwrap();
    assert_eq!(
        layout.json_types(),
        Some(r#"{"LCD":{"line":"u8","text":"s4"}}"#)
    );

    let value = Value::from(json!({"count": 9, "rows": [{"line": 3, "text": "ab"}]}));
    let made = layout.make(&value).unwrap();
    assert_eq!(print_octets(&made.buffer), "09 01 03 61 62 00 00");
    let read = layout.read(&made.buffer, 0).unwrap();
    assert_eq!(read.value["rows"][0]["text"].as_str(), Some("ab"));
    assert_eq!(read.value["rows"].as_array().map(<[Value]>::len), Some(1));
}

#[test]
fn types_referencing_types() {
    let types = "
        typedef struct { i16 x, y; } Point;
        typedef struct { Point from, to; } Segment;
    ";
    let layout = CStruct::builder("{segs: Segment[u8]}")
        .types(types)
        .byte_order(ByteOrder::LittleEndian)
        .build()
        .unwrap();
    assert_eq!(
        layout.json_model(),
        r#"{"segs.u8":{"from":{"x":"i16","y":"i16"},"to":{"x":"i16","y":"i16"}}}"#
    );
    let value = Value::from(json!({"segs": [{"from": {"x": -1, "y": 2}, "to": {"x": 3, "y": -4}}]}));
    let made = layout.make(&value).unwrap();
    assert_eq!(print_octets(&made.buffer), "01 ff ff 02 00 03 00 fc ff");
    assert_eq!(layout.read(&made.buffer, 0).unwrap().value, value);
}

#[test]
fn missing_array_items_encode_as_zero() {
    let layout = CStruct::be("{xs: [3/u16]}").unwrap();
    let made = layout.make(&Value::from(json!({"xs": [1]}))).unwrap();
    assert_eq!(made.buffer, [0, 1, 0, 0, 0, 0]);
}

#[test]
fn errors_point_into_nested_values() {
    let layout = CStruct::builder("{print: [2/LCD]}")
        .types("{LCD: {line: u8, text: s4}}")
        .build()
        .unwrap();
    let value = Value::from(json!({"print": [{"line": 1}, {"line": "two"}]}));
    match layout.make(&value) {
        Err(CStructError::ValueMismatch { field, expected }) => {
            assert_eq!(field, "print[1].line");
            assert_eq!(expected, "a number");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }

    match layout.read(&[1, 0x31, 0x32, 0x33, 0x34, 2], 0) {
        Err(CStructError::BufferUnderflow { field, .. }) => assert_eq!(field, "print[1].text"),
        other => panic!("expected underflow, got {other:?}"),
    }
}

#[test]
fn top_level_scalar_and_sequence() {
    let layout = CStruct::le("u32").unwrap();
    let read = layout.read(&[1, 0, 0, 0], 0).unwrap();
    assert_eq!(read.value, Value::UInt(1));

    let layout = CStruct::be("[u8, [i8, b16], {f: f}]").unwrap();
    let value = Value::from(json!([200, [-2, true], {"f": 0.5}]));
    let made = layout.make(&value).unwrap();
    assert_eq!(print_octets(&made.buffer), "c8 fe 00 01 3f 00 00 00");
    assert_eq!(layout.read(&made.buffer, 0).unwrap().value, value);
}
