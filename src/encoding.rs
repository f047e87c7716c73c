use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use xhtmlchardet::detect;

pub(crate) fn encoding(data: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }
    let mut cursor = std::io::Cursor::new(data);
    let charsets = match detect(&mut cursor, None) {
        Ok(charsets) => charsets,
        Err(_) => return UTF_8,
    };
    // no encoding detected
    let label = if charsets.is_empty() {
        "UTF-8"
    } else {
        &charsets[0]
    };
    Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8)
}

/// Decode file content to text. The byte order mark, if any, is removed.
pub(crate) fn decode(data: &[u8]) -> String {
    let (text, _, _) = encoding(data).decode(data);
    text.into_owned()
}

/// Encode text for writing with the encoding named by `label`, UTF-8 when
/// the label is missing or unknown. UTF-16 output starts with a byte
/// order mark.
pub(crate) fn encode(text: &str, label: Option<&str>) -> Vec<u8> {
    let encoding = label
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    // encoding_rs only decodes UTF-16
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return encode_utf16(text, encoding == UTF_16BE);
    }
    let (bytes, _, _) = encoding.output_encoding().encode(text);
    bytes.into_owned()
}

fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
    for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
        let unit = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        bytes.extend_from_slice(&unit);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>";
        assert_eq!(encoding(data).name(), "UTF-8");
    }

    #[test]
    fn test_utf8_without_declaration() {
        let data = b"<a/>";
        assert_eq!(encoding(data).name(), "UTF-8");
    }

    #[test]
    fn test_iso8859_1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a/>";
        // windows-1252 is a superset of 8859-1
        assert_eq!(encoding(data).name(), "windows-1252");
    }

    #[test]
    fn test_bom() {
        let data = b"\xEF\xBB\xBF<a>\xC3\xA9</a>";
        assert_eq!(decode(data), "<a>\u{e9}</a>");
    }

    #[test]
    fn test_decode_latin1() {
        let data = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>\xE9</a>";
        assert!(decode(data).ends_with("<a>\u{e9}</a>"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("\u{e9}", Some("iso-8859-1")), vec![0xE9]);
        assert_eq!(encode("\u{e9}", None), vec![0xC3, 0xA9]);
        assert_eq!(encode("\u{e9}", Some("no-such-thing")), vec![0xC3, 0xA9]);
    }

    #[test]
    fn test_encode_utf16() {
        assert_eq!(encode("<\u{e9}", Some("UTF-16")), vec![0xFF, 0xFE, 0x3C, 0x00, 0xE9, 0x00]);
        assert_eq!(encode("<", Some("utf-16be")), vec![0xFE, 0xFF, 0x00, 0x3C]);
        let data = encode("<a>\u{e9}</a>", Some("UTF-16"));
        assert_eq!(encoding(&data), UTF_16LE);
        assert_eq!(decode(&data), "<a>\u{e9}</a>");
    }
}
