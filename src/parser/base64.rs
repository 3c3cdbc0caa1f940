//! Base64 decoding utilities
//!
//! Share links mix plain text and Base64 bodies with no marker telling which
//! one is present, and producers disagree on alphabet and padding. Everything
//! here decodes tolerantly: URL-safe or standard alphabet, padded or not,
//! with embedded whitespace.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::trace;

/// Standard alphabet, any padding, trailing bits ignored.
const TOLERANT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ============================================================================
// Base64 Decoding
// ============================================================================

/// Decodes Base64 content into raw bytes.
///
/// Whitespace is removed, the URL-safe alphabet (`-`, `_`) is mapped onto the
/// standard one and the input is padded to a multiple of 4 before decoding.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    trace!(
        "Attempting Base64 decode, cleaned length: {} bytes",
        cleaned.len()
    );

    TOLERANT.decode(add_base64_padding(&cleaned))
}

/// Adds proper padding to Base64 string if missing
///
/// Base64 strings should have a length that is a multiple of 4.
/// This function adds '=' padding characters as needed.
pub fn add_base64_padding(s: &str) -> String {
    let mut result = s.to_string();
    while !result.len().is_multiple_of(4) {
        result.push('=');
    }
    result
}

/// Decodes `content` as Base64 text, or returns it unchanged.
///
/// The decoded form is accepted only when it is valid UTF-8 and contains no
/// control characters other than TAB, LF and CR. Anything else (a decode
/// error, binary output, or plain text that merely happens to use the Base64
/// alphabet and decodes to noise) yields the original input, untouched.
pub fn decode_base64_or_literal(content: &str) -> String {
    match decode_base64(content) {
        Ok(bytes) if is_printable_text(&bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => content.to_string(),
        },
        Ok(_) => {
            trace!("Base64 candidate decoded to non-text bytes, keeping literal");
            content.to_string()
        }
        Err(e) => {
            trace!("Not Base64 ({}), keeping literal", e);
            content.to_string()
        }
    }
}

fn is_printable_text(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|&b| !(b.is_ascii_control() && !matches!(b, b'\t' | b'\n' | b'\r')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64_standard() {
        // "hello world" in standard Base64
        let encoded = "aGVsbG8gd29ybGQ=";
        let decoded = decode_base64(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_url_safe() {
        // 0xfb 0xff 0xbf encodes to "+/+/" standard and "-_-_" URL-safe
        assert_eq!(decode_base64("-_-_").unwrap(), vec![0xfb, 0xff, 0xbf]);
        assert_eq!(decode_base64("+/+/").unwrap(), vec![0xfb, 0xff, 0xbf]);
    }

    #[test]
    fn test_decode_base64_with_linebreaks() {
        let encoded = "aGVs\nbG8g\nd29y\nbGQ=";
        let decoded = decode_base64(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_without_padding() {
        let encoded = "aGVsbG8gd29ybGQ";
        let decoded = decode_base64(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_base64_invalid() {
        assert!(decode_base64("not valid base64!!!").is_err());
    }

    #[test]
    fn test_add_base64_padding() {
        assert_eq!(add_base64_padding("abcd"), "abcd");
        assert_eq!(add_base64_padding("abc"), "abc=");
        assert_eq!(add_base64_padding("ab"), "ab==");
        assert_eq!(add_base64_padding("a"), "a===");
        assert_eq!(add_base64_padding(""), "");
    }

    #[test]
    fn test_or_literal_decodes_text() {
        assert_eq!(
            decode_base64_or_literal("YWVzLTI1Ni1nY206cGFzc3dvcmQ"),
            "aes-256-gcm:password"
        );
    }

    #[test]
    fn test_or_literal_keeps_plain_text() {
        for plain in [
            "aes-256-gcm:password",
            "uuid@example.com:443",
            "secret",
            "not valid base64!!!",
            "",
        ] {
            assert_eq!(decode_base64_or_literal(plain), plain);
        }
    }

    #[test]
    fn test_or_literal_rejects_control_bytes() {
        use base64::engine::general_purpose::STANDARD;
        let encoded = STANDARD.encode([b'a', 0x01, b'b']);
        assert_eq!(decode_base64_or_literal(&encoded), encoded);
    }

    #[test]
    fn test_or_literal_allows_tab_and_newlines() {
        use base64::engine::general_purpose::STANDARD;
        let encoded = STANDARD.encode("line1\r\n\tline2");
        assert_eq!(decode_base64_or_literal(&encoded), "line1\r\n\tline2");
    }

    #[test]
    fn test_or_literal_allows_utf8() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let encoded = URL_SAFE_NO_PAD.encode("香港 01");
        assert_eq!(decode_base64_or_literal(&encoded), "香港 01");
    }
}
