use encoding_rs::{UTF_8, WINDOWS_1252};
use std::fmt;

use crate::ingest::loader::LoadError;

/// Text encodings tried, in order, when decoding an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, a leading byte order mark is dropped. Malformed input is rejected.
    Utf8Sig,
    /// Windows-1252, the usual fallback for spreadsheet exports on German systems.
    Windows1252,
}

pub const ENCODINGS: [TextEncoding; 2] = [TextEncoding::Utf8Sig, TextEncoding::Windows1252];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Windows1252 => "cp1252",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, LoadError> {
        let (text, had_errors) = match self {
            TextEncoding::Utf8Sig => UTF_8.decode_with_bom_removal(bytes),
            TextEncoding::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes),
        };

        if had_errors {
            return Err(LoadError::Undecodable(self.label()));
        }
        Ok(text.into_owned())
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bom_is_removed() {
        let bytes = b"\xEF\xBB\xBFDatum;Wert";
        let text = TextEncoding::Utf8Sig.decode(bytes).unwrap();
        assert_eq!(text, "Datum;Wert");
    }

    #[test]
    fn test_utf8_rejects_latin1_bytes() {
        // 0xB0 is the degree sign in cp1252 and a stray continuation byte in UTF-8
        let bytes = b"Temperatur (\xB0C)";
        match TextEncoding::Utf8Sig.decode(bytes) {
            Err(LoadError::Undecodable(label)) => assert_eq!(label, "utf-8-sig"),
            other => panic!("Expected Undecodable error, got {other:?}"),
        }
    }

    #[test]
    fn test_cp1252_decodes_degree_sign() {
        let bytes = b"Temperatur (\xB0C)";
        let text = TextEncoding::Windows1252.decode(bytes).unwrap();
        assert_eq!(text, "Temperatur (°C)");
    }

    #[test]
    fn test_encoding_order() {
        assert_eq!(ENCODINGS[0], TextEncoding::Utf8Sig);
        assert_eq!(ENCODINGS[1].to_string(), "cp1252");
    }
}
