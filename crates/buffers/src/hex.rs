//! Hex helpers for building fixtures and printing buffers.

use std::fmt::Write;

use crate::BufferError;

/// Parses hex text into bytes.
///
/// Whitespace and `_` are ignored, so byte groups can be laid out the way a
/// packet diagram reads.
///
/// # Example
///
/// ```
/// use cstruct_buffers::hex_to_buffer;
///
/// assert_eq!(hex_to_buffer("7777 03 12_34_56").unwrap(), vec![0x77, 0x77, 0x03, 0x12, 0x34, 0x56]);
/// assert!(hex_to_buffer("123").is_err());
/// ```
pub fn hex_to_buffer(text: &str) -> Result<Vec<u8>, BufferError> {
    let mut out = Vec::with_capacity(text.len() / 2);
    let mut high: Option<u8> = None;
    for (position, c) in text.char_indices() {
        if c.is_whitespace() || c == '_' {
            continue;
        }
        let nibble = c
            .to_digit(16)
            .ok_or(BufferError::InvalidHex { position })? as u8;
        match high.take() {
            Some(h) => out.push((h << 4) | nibble),
            None => high = Some(nibble),
        }
    }
    if high.is_some() {
        return Err(BufferError::InvalidHex {
            position: text.len(),
        });
    }
    Ok(out)
}

/// Formats bytes as space separated lowercase hex.
///
/// # Example
///
/// ```
/// use cstruct_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x01, 0x02, 0x0a, 0xff]), "01 02 0a ff");
/// assert_eq!(print_octets(&[]), "");
/// ```
pub fn print_octets(octets: &[u8]) -> String {
    let mut result = String::with_capacity(octets.len() * 3);
    for (i, byte) in octets.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = write!(result, "{byte:02x}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_buffer_separators() {
        assert_eq!(hex_to_buffer("").unwrap(), Vec::<u8>::new());
        assert_eq!(hex_to_buffer("cc cc\ncc").unwrap(), vec![0xcc; 3]);
        assert_eq!(hex_to_buffer("AbCd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_hex_to_buffer_rejects_garbage() {
        assert_eq!(
            hex_to_buffer("12 zz").unwrap_err(),
            BufferError::InvalidHex { position: 3 }
        );
        assert_eq!(
            hex_to_buffer("1 2 3").unwrap_err(),
            BufferError::InvalidHex { position: 5 }
        );
    }

    #[test]
    fn test_print_octets() {
        assert_eq!(print_octets(&[0x01]), "01");
        assert_eq!(print_octets(&[0x31, 0x32, 0x00]), "31 32 00");
        let all: Vec<u8> = (0..=255).collect();
        let printed = print_octets(&all);
        assert_eq!(printed.len(), 256 * 3 - 1);
        assert!(printed.starts_with("00 01 02") && printed.ends_with("fe ff"));
        assert_eq!(hex_to_buffer(&printed).unwrap(), all);
    }
}
