//! Byte/text conversion for the wire.
//!
//! Both directions map one byte to one character (Latin-1). Requests are
//! never rejected for invalid UTF-8, and header text written by the server
//! is plain ASCII.

/// Decodes received bytes into request text, one character per byte.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encodes header text into bytes, one byte per character.
///
/// Characters above U+00FF cannot be represented and are replaced with `?`.
/// Header text is server-controlled, so this never happens in practice.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_keeps_high_bytes() {
        let text = decode(&[b'G', 0xE9, 0xFF]);
        assert_eq!(text.chars().count(), 3);
        assert_eq!(encode(&text), vec![b'G', 0xE9, 0xFF]);
    }

    #[test]
    fn encode_replaces_wide_chars() {
        assert_eq!(encode("a\u{2603}b"), b"a?b".to_vec());
    }
}
