//! Single-string subset of the Ruby marshal format.
//!
//! Rails marshals the credentials YAML before encrypting it, so the decrypted
//! payload is a marshalled `String`:
//!
//! ```text
//! 04 08          format version 4.8
//! 22             object type '"' (String)
//! <fixnum>       byte length
//! <bytes>        raw string body
//! ```
//!
//! Only this layout is understood. Arrays, symbols, hashes, instance
//! variables (such as the encoding ivar Ruby adds for non-binary strings)
//! and everything else in the format are rejected or ignored.

use crate::Error;

/// Marshal format version 4.8.
pub const FORMAT_VERSION: [u8; 2] = [0x04, 0x08];

/// Type marker for a String object.
pub const TYPE_STRING: u8 = 0x22;

/// Largest length stored in the single-byte embedded form (`byte - 5`).
pub const MAX_EMBEDDED_LEN: usize = 122;

const HEADER_LEN: usize = FORMAT_VERSION.len() + 1;
const EMBEDDED_OFFSET: u8 = 5;

/// Extract the string from a marshalled `String` object.
///
/// The string must be the first object. Trailing bytes after the declared
/// length are ignored.
///
/// # Errors
///
/// - [`Error::UnsupportedFormatVersion`] if the header is not `04 08`.
/// - [`Error::UnsupportedObjectType`] if the object is not a String.
/// - [`Error::UnsupportedLengthEncoding`] for the zero/negative fixnum markers.
/// - [`Error::TruncatedPayload`] if the buffer ends early.
/// - [`Error::InvalidStringEncoding`] if the body is not UTF-8.
pub fn decode_single_string(bytes: &[u8]) -> Result<String, Error> {
    if bytes.len() < HEADER_LEN + 1 {
        return Err(Error::TruncatedPayload {
            required: HEADER_LEN + 1,
            available: bytes.len(),
        });
    }

    if bytes[..2] != FORMAT_VERSION {
        return Err(Error::UnsupportedFormatVersion(bytes[0], bytes[1]));
    }
    if bytes[2] != TYPE_STRING {
        return Err(Error::UnsupportedObjectType(bytes[2]));
    }

    let (length, start) = decode_length(bytes, HEADER_LEN)?;
    let end = start.checked_add(length).ok_or(Error::TruncatedPayload {
        required: usize::MAX,
        available: bytes.len(),
    })?;
    if bytes.len() < end {
        return Err(Error::TruncatedPayload {
            required: end,
            available: bytes.len(),
        });
    }

    let body = std::str::from_utf8(&bytes[start..end]).map_err(|e| {
        Error::InvalidStringEncoding {
            valid_up_to: e.valid_up_to(),
        }
    })?;
    Ok(body.to_owned())
}

/// Marshal `source` as a String object.
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if `source` is longer than
/// `u32::MAX` bytes.
pub fn encode_single_string(source: &str) -> Result<Vec<u8>, Error> {
    let length = source.len();
    let mut out = Vec::with_capacity(HEADER_LEN + 5 + length);
    out.extend_from_slice(&FORMAT_VERSION);
    out.push(TYPE_STRING);
    encode_length(&mut out, length)?;
    out.extend_from_slice(source.as_bytes());
    Ok(out)
}

/// Read a positive marshal fixnum at `pos`, returning the value and the
/// offset of the first byte after it.
fn decode_length(bytes: &[u8], pos: usize) -> Result<(usize, usize), Error> {
    let marker = bytes[pos];
    match marker {
        0x00 | 0xfc..=0xff => Err(Error::UnsupportedLengthEncoding(marker)),
        0x01..=0x04 => {
            let width = usize::from(marker);
            let start = pos + 1;
            let prefix = bytes
                .get(start..start + width)
                .ok_or(Error::TruncatedPayload {
                    required: start + width,
                    available: bytes.len(),
                })?;
            let length = prefix
                .iter()
                .rev()
                .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
            Ok((length, start + width))
        }
        _ => Ok((usize::from(marker - EMBEDDED_OFFSET), pos + 1)),
    }
}

/// Append the shortest marshal fixnum encoding of `length`.
fn encode_length(out: &mut Vec<u8>, length: usize) -> Result<(), Error> {
    if length <= MAX_EMBEDDED_LEN {
        // Fits: 122 + 5 = 127.
        out.push(length as u8 + EMBEDDED_OFFSET);
        return Ok(());
    }

    let value = u32::try_from(length).map_err(|_| Error::PayloadTooLarge(length))?;
    let le = value.to_le_bytes();
    let width = 4 - le.iter().rev().take_while(|&&b| b == 0).count();
    out.push(width as u8);
    out.extend_from_slice(&le[..width]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_and_marker(s: &str) -> Vec<u8> {
        let encoded = encode_single_string(s).unwrap();
        encoded[..encoded.len() - s.len()].to_vec()
    }

    #[test]
    fn round_trip_assorted_strings() {
        let long = "x".repeat(70_000);
        let cases = [
            "",
            "a",
            "secret_key_base: abc\n",
            "multi\nline\r\nvalue\n",
            "ünïcödé ✓ 秘密",
            long.as_str(),
        ];
        for s in cases {
            let encoded = encode_single_string(s).unwrap();
            assert_eq!(decode_single_string(&encoded).unwrap(), s);
        }
    }

    #[test]
    fn empty_string_uses_embedded_zero() {
        assert_eq!(encode_single_string("").unwrap(), vec![0x04, 0x08, 0x22, 0x05]);
    }

    #[test]
    fn length_switch_points() {
        assert_eq!(header_and_marker(&"a".repeat(122)), vec![0x04, 0x08, 0x22, 0x7f]);
        assert_eq!(
            header_and_marker(&"a".repeat(123)),
            vec![0x04, 0x08, 0x22, 0x01, 0x7b]
        );
        assert_eq!(
            header_and_marker(&"a".repeat(255)),
            vec![0x04, 0x08, 0x22, 0x01, 0xff]
        );
        assert_eq!(
            header_and_marker(&"a".repeat(256)),
            vec![0x04, 0x08, 0x22, 0x02, 0x00, 0x01]
        );
        assert_eq!(
            header_and_marker(&"a".repeat(65_535)),
            vec![0x04, 0x08, 0x22, 0x02, 0xff, 0xff]
        );
        assert_eq!(
            header_and_marker(&"a".repeat(65_536)),
            vec![0x04, 0x08, 0x22, 0x03, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn four_byte_length_prefix_is_little_endian() {
        let (length, start) = decode_length(&[0x04, 0x78, 0x56, 0x34, 0x12], 0).unwrap();
        assert_eq!(length, 0x1234_5678);
        assert_eq!(start, 5);

        let mut out = Vec::new();
        encode_length(&mut out, 0x0100_0000).unwrap();
        assert_eq!(out, vec![0x04, 0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = decode_single_string(&[0x04, 0x09, 0x22, 0x05]).unwrap_err();
        assert_eq!(err, Error::UnsupportedFormatVersion(0x04, 0x09));
    }

    #[test]
    fn rejects_non_string_objects() {
        // Array with zero elements.
        let err = decode_single_string(&[0x04, 0x08, 0x5b, 0x00]).unwrap_err();
        assert_eq!(err, Error::UnsupportedObjectType(0x5b));
    }

    #[test]
    fn rejects_reserved_length_markers() {
        for marker in [0x00, 0xfc, 0xfd, 0xfe, 0xff] {
            let err = decode_single_string(&[0x04, 0x08, 0x22, marker, 0x00]).unwrap_err();
            assert_eq!(err, Error::UnsupportedLengthEncoding(marker));
        }
    }

    #[test]
    fn rejects_truncated_body() {
        let err = decode_single_string(&[0x04, 0x08, 0x22, 0x0a, b'a', b'b']).unwrap_err();
        assert_eq!(
            err,
            Error::TruncatedPayload {
                required: 9,
                available: 6
            }
        );
    }

    #[test]
    fn rejects_truncated_length_prefix() {
        let err = decode_single_string(&[0x04, 0x08, 0x22, 0x02, 0x10]).unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { required: 6, .. }));
    }

    #[test]
    fn rejects_short_header() {
        for short in [&[][..], &[0x04][..], &[0x04, 0x08, 0x22][..]] {
            assert!(matches!(
                decode_single_string(short),
                Err(Error::TruncatedPayload { .. })
            ));
        }
    }

    #[test]
    fn ignores_trailing_bytes() {
        let bytes = [0x04, 0x08, 0x22, 0x07, b'h', b'i', 0x06, 0x3a, 0x06, 0x45, 0x54];
        assert_eq!(decode_single_string(&bytes).unwrap(), "hi");
    }

    #[test]
    fn rejects_non_utf8_body() {
        let err = decode_single_string(&[0x04, 0x08, 0x22, 0x07, b'a', 0xff]).unwrap_err();
        assert_eq!(err, Error::InvalidStringEncoding { valid_up_to: 1 });
    }

    #[test]
    fn multibyte_utf8_round_trips_byte_for_byte() {
        let bytes = encode_single_string("pässwörd: 秘密\n").unwrap();
        let decoded = decode_single_string(&bytes).unwrap();
        assert_eq!(encode_single_string(&decoded).unwrap(), bytes);
    }
}
