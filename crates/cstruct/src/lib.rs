//! Declarative binary layouts.
//!
//! A layout is described once with a compact, C-struct flavored notation,
//! compiled into a canonical model, and then used to decode buffers into
//! [`Value`]s or encode values into buffers, in big- or little-endian order.
//!
//! # Model notation
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{a: u8, b: i32}` | fields in order; quotes are optional |
//! | `u8 i8 u16 i16 u32 i32 u64 i64 f d` | scalars (`f`/`d` are IEEE-754 32/64-bit) |
//! | `b16 b32 b64` | booleans stored as integers |
//! | `s12`, `buf4` | fixed-length text (zero padded) and raw bytes |
//! | `"name.u16": "s"` | a `u16` length prefix, then that many bytes or items |
//! | `[u8, s2]` | unnamed fields back to back |
//! | `[3/u16]` | three `u16` in a row |
//! | `key: T[N]`, `key: T[u8]` | fixed count, or a dynamic count of type `u8` |
//! | `u8 a, b; string name[8];` | C field declarations |
//! | `typedef struct {..} Name;` | a named struct block |
//!
//! C aliases such as `uint16_t`, `DWORD` or `double` are accepted wherever a
//! scalar is. Named types come from a types table or from nested layouts.
//!
//! # Example
//!
//! ```
//! use cstruct::{CStruct, ModelSource, Value};
//! use serde_json::json;
//!
//! let types: ModelSource = "typedef struct { u8 line; string text[4]; } LCD;".into();
//! let display = CStruct::builder(r#"{"print": ["LCD", "LCD"]}"#)
//!     .types(types)
//!     .build()
//!     .unwrap();
//!
//! let value = Value::from(json!({"print": [{"line": 1, "text": "1st "}, {"line": 2, "text": "2nd "}]}));
//! let made = display.make(&value).unwrap();
//! assert_eq!(cstruct_buffers::print_octets(&made.buffer), "01 31 73 74 20 02 32 6e 64 20");
//!
//! let read = display.read(&made.buffer, 0).unwrap();
//! assert_eq!(read.value["print"][1]["text"].as_str(), Some("2nd "));
//! ```

mod codec;
mod cstruct;
mod error;
pub mod layout;
pub mod model;
pub mod registry;
pub mod tags;
mod value;

pub use cstruct::{CStruct, CStructBuilder, MakeResult, ReadResult, WriteResult};
pub use cstruct_buffers::ByteOrder;
pub use error::{CStructError, Result};
pub use model::{compile, compile_value, ModelSource};
pub use registry::Registry;
pub use value::Value;
