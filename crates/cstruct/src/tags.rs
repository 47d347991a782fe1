//! Type tags of the model grammar.
//!
//! A tag is the bareword on the right-hand side of a field: a scalar
//! (`u8`, `i32`, `b16`, `f`, ...), a sized string or buffer (`s12`, `buf4`),
//! or the unsized `s`/`buf` payload of a dynamic-length field. C-style
//! aliases (`uint8_t`, `DWORD`, `double`, ...) resolve to the same tags.

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    U8,
    I8,
    U16,
    I16,
    B16,
    U32,
    I32,
    B32,
    U64,
    I64,
    B64,
    F32,
    F64,
}

impl Scalar {
    /// Parses a scalar tag or one of its aliases.
    pub fn parse(word: &str) -> Option<Scalar> {
        Some(match word {
            "u8" | "uint8" | "uint8_t" | "BYTE" => Scalar::U8,
            "i8" | "int8" | "int8_t" | "char" => Scalar::I8,
            "u16" | "uint16" | "uint16_t" | "WORD" => Scalar::U16,
            "i16" | "int16" | "int16_t" | "short" => Scalar::I16,
            "b16" | "bool16" => Scalar::B16,
            "u32" | "uint32" | "uint32_t" | "DWORD" => Scalar::U32,
            "i32" | "int32" | "int32_t" | "int" => Scalar::I32,
            "b32" | "bool32" => Scalar::B32,
            "u64" | "uint64" | "uint64_t" | "QWORD" => Scalar::U64,
            "i64" | "int64" | "int64_t" | "long" => Scalar::I64,
            "b64" | "bool64" => Scalar::B64,
            "f" | "float" | "f32" => Scalar::F32,
            "d" | "double" | "f64" => Scalar::F64,
            _ => return None,
        })
    }

    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            Scalar::U8 | Scalar::I8 => 1,
            Scalar::U16 | Scalar::I16 | Scalar::B16 => 2,
            Scalar::U32 | Scalar::I32 | Scalar::B32 | Scalar::F32 => 4,
            Scalar::U64 | Scalar::I64 | Scalar::B64 | Scalar::F64 => 8,
        }
    }

    /// Canonical tag.
    pub fn tag(self) -> &'static str {
        match self {
            Scalar::U8 => "u8",
            Scalar::I8 => "i8",
            Scalar::U16 => "u16",
            Scalar::I16 => "i16",
            Scalar::B16 => "b16",
            Scalar::U32 => "u32",
            Scalar::I32 => "i32",
            Scalar::B32 => "b32",
            Scalar::U64 => "u64",
            Scalar::I64 => "i64",
            Scalar::B64 => "b64",
            Scalar::F32 => "f",
            Scalar::F64 => "d",
        }
    }
}

/// Integer type of a dynamic-length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl LengthType {
    /// Parses a length tag. Aliases are not accepted here.
    pub fn parse(word: &str) -> Option<LengthType> {
        Some(match word {
            "u8" => LengthType::U8,
            "u16" => LengthType::U16,
            "u32" => LengthType::U32,
            "u64" => LengthType::U64,
            "i8" => LengthType::I8,
            "i16" => LengthType::I16,
            "i32" => LengthType::I32,
            "i64" => LengthType::I64,
            _ => return None,
        })
    }

    /// The scalar used to encode the prefix.
    pub fn scalar(self) -> Scalar {
        match self {
            LengthType::U8 => Scalar::U8,
            LengthType::U16 => Scalar::U16,
            LengthType::U32 => Scalar::U32,
            LengthType::U64 => Scalar::U64,
            LengthType::I8 => Scalar::I8,
            LengthType::I16 => Scalar::I16,
            LengthType::I32 => Scalar::I32,
            LengthType::I64 => Scalar::I64,
        }
    }

    /// Largest length the prefix can carry.
    pub fn max(self) -> u64 {
        match self {
            LengthType::U8 => u8::MAX as u64,
            LengthType::U16 => u16::MAX as u64,
            LengthType::U32 => u32::MAX as u64,
            LengthType::U64 => u64::MAX,
            LengthType::I8 => i8::MAX as u64,
            LengthType::I16 => i16::MAX as u64,
            LengthType::I32 => i32::MAX as u64,
            LengthType::I64 => i64::MAX as u64,
        }
    }

    pub fn tag(self) -> &'static str {
        self.scalar().tag()
    }
}

/// Any builtin tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Scalar(Scalar),
    /// `sN`, or `s` when unsized.
    Str(Option<usize>),
    /// `bufN`, or `buf` when unsized.
    Buf(Option<usize>),
}

impl Tag {
    /// Parses a builtin tag. Returns `None` for anything else, which the
    /// compiler then treats as a named type.
    pub fn parse(word: &str) -> Option<Tag> {
        if let Some(scalar) = Scalar::parse(word) {
            return Some(Tag::Scalar(scalar));
        }
        if is_string_type(word) {
            return Some(Tag::Str(None));
        }
        if is_buffer_type(word) {
            return Some(Tag::Buf(None));
        }
        if let Some(size) = sized(word, "buf") {
            return Some(Tag::Buf(Some(size)));
        }
        sized(word, "s").map(|size| Tag::Str(Some(size)))
    }
}

/// `s` and `string` name the text payload.
pub fn is_string_type(word: &str) -> bool {
    matches!(word, "s" | "string")
}

/// `buf` and `buffer` name the raw byte payload.
pub fn is_buffer_type(word: &str) -> bool {
    matches!(word, "buf" | "buffer")
}

fn sized(word: &str, prefix: &str) -> Option<usize> {
    let digits = word.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
