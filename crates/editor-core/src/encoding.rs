/// The two encodings a loaded file can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Shift_JIS, assumed whenever the bytes are not valid UTF-8.
    LegacyDoubleByte,
}

impl TextEncoding {
    /// Short identifier used on the command line and in logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::LegacyDoubleByte => "sjis",
        }
    }

    /// Parses the identifiers produced by [`TextEncoding::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "sjis" | "shift_jis" | "shift-jis" => Some(TextEncoding::LegacyDoubleByte),
            _ => None,
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Classifies raw bytes as UTF-8 or the legacy double-byte encoding.
///
/// Only well-formed UTF-8 lead/continuation patterns are accepted; anything
/// else, including a NUL byte anywhere, is reported as
/// [`TextEncoding::LegacyDoubleByte`]. Never fails.
#[must_use]
pub fn detect(bytes: &[u8]) -> TextEncoding {
    if bytes.starts_with(&UTF8_BOM) {
        return TextEncoding::Utf8;
    }

    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        if lead == 0x00 {
            return TextEncoding::LegacyDoubleByte;
        }

        let continuation_count = if lead & 0x80 == 0 {
            0
        } else if lead & 0xE0 == 0xC0 {
            1
        } else if lead & 0xF0 == 0xE0 {
            2
        } else if lead & 0xF8 == 0xF0 {
            3
        } else {
            return TextEncoding::LegacyDoubleByte;
        };

        for offset in 1..=continuation_count {
            match bytes.get(i + offset) {
                Some(byte) if byte & 0xC0 == 0x80 => {}
                _ => return TextEncoding::LegacyDoubleByte,
            }
        }

        i += continuation_count + 1;
    }

    TextEncoding::Utf8
}

/// Decodes `bytes` with the given encoding, replacing malformed sequences.
/// A leading UTF-8 BOM is dropped.
#[must_use]
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let (text, had_errors) = match encoding {
        TextEncoding::Utf8 => encoding_rs::UTF_8.decode_with_bom_removal(bytes),
        TextEncoding::LegacyDoubleByte => encoding_rs::SHIFT_JIS.decode_without_bom_handling(bytes),
    };
    if had_errors {
        tracing::warn!(%encoding, "malformed byte sequences replaced while decoding");
    }
    text.into_owned()
}

/// Encodes `text` for saving.
///
/// Characters Shift_JIS cannot represent are written as HTML numeric character
/// references, which is lossy; this is logged.
#[must_use]
pub fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
        TextEncoding::LegacyDoubleByte => {
            let (bytes, _, had_unmappable) = encoding_rs::SHIFT_JIS.encode(text);
            if had_unmappable {
                tracing::warn!("text contains characters not representable in Shift_JIS");
            }
            bytes.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_is_utf8() {
        assert_eq!(detect(b"Sub Main\r\nEnd Sub"), TextEncoding::Utf8);
    }

    #[test]
    fn test_empty_is_utf8() {
        assert_eq!(detect(b""), TextEncoding::Utf8);
    }

    #[test]
    fn test_bom_wins_over_garbage() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(&[0x00, 0xFF, 0x82, 0xA0]);
        assert_eq!(detect(&bytes), TextEncoding::Utf8);
    }

    #[test]
    fn test_nul_byte_forces_legacy() {
        assert_eq!(detect(b"abc\0def"), TextEncoding::LegacyDoubleByte);
        assert_eq!(detect(&[0x00]), TextEncoding::LegacyDoubleByte);
    }

    #[test]
    fn test_multibyte_utf8() {
        // 2, 3 and 4 byte sequences.
        assert_eq!(detect("é日本🦀".as_bytes()), TextEncoding::Utf8);
    }

    #[test]
    fn test_shift_jis_bytes_are_legacy() {
        // "あいう" in Shift_JIS.
        let bytes = [0x82, 0xA0, 0x82, 0xA2, 0x82, 0xA4];
        assert_eq!(detect(&bytes), TextEncoding::LegacyDoubleByte);
    }

    #[test]
    fn test_truncated_sequence_is_legacy() {
        let full = "日".as_bytes();
        assert_eq!(detect(&full[..2]), TextEncoding::LegacyDoubleByte);
        assert_eq!(detect(&[b'a', 0xC3]), TextEncoding::LegacyDoubleByte);
    }

    #[test]
    fn test_bad_continuation_is_legacy() {
        assert_eq!(detect(&[0xE6, 0x97, 0x41]), TextEncoding::LegacyDoubleByte);
    }

    #[test]
    fn test_invalid_lead_byte_is_legacy() {
        assert_eq!(detect(&[0xFF]), TextEncoding::LegacyDoubleByte);
        assert_eq!(detect(&[0x80]), TextEncoding::LegacyDoubleByte);
    }

    #[test]
    fn test_decode_shift_jis() {
        let bytes = [0x82, 0xA0, 0x82, 0xA2, 0x82, 0xA4];
        assert_eq!(decode(&bytes, TextEncoding::LegacyDoubleByte), "あいう");
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"hi");
        assert_eq!(decode(&bytes, TextEncoding::Utf8), "hi");
    }

    #[test]
    fn test_encode_shift_jis() {
        assert_eq!(
            encode("あいう", TextEncoding::LegacyDoubleByte),
            vec![0x82, 0xA0, 0x82, 0xA2, 0x82, 0xA4]
        );
        assert_eq!(encode("abc", TextEncoding::Utf8), b"abc".to_vec());
    }

    #[test]
    fn test_labels() {
        assert_eq!(TextEncoding::from_label("SJIS"), Some(TextEncoding::LegacyDoubleByte));
        assert_eq!(TextEncoding::from_label("utf-8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_label("latin1"), None);
        assert_eq!(TextEncoding::LegacyDoubleByte.to_string(), "sjis");
    }
}
