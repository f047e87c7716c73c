use std::borrow::Cow;

use crate::error::{ParseError, Span};

/// Resolve the predefined entities and character references in raw text.
///
/// `offset` is the position of `content` in the parsed input, used for
/// error spans.
pub(crate) fn parse_references(content: &str, offset: usize) -> Result<Cow<'_, str>, ParseError> {
    if !content.contains('&') {
        return Ok(Cow::Borrowed(content));
    }
    let mut result = String::with_capacity(content.len());
    let mut rest = content;
    let mut position = offset;
    while let Some(start) = rest.find('&') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = match after.find(';') {
            Some(end) => end,
            None => {
                return Err(ParseError::UnclosedEntity {
                    entity: after.to_string(),
                    span: Span::new(position + start, position + rest.len()),
                })
            }
        };
        let entity = &after[..end];
        let span = Span::new(position + start, position + start + end + 2);
        match resolve_entity(entity) {
            Some(c) => result.push(c),
            None => {
                return Err(ParseError::InvalidEntity {
                    entity: entity.to_string(),
                    span,
                })
            }
        }
        let consumed = start + end + 2;
        rest = &rest[consumed..];
        position += consumed;
    }
    result.push_str(rest);
    Ok(Cow::Owned(result))
}

fn resolve_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "apos" => Some('\''),
        "gt" => Some('>'),
        "lt" => Some('<'),
        "quot" => Some('"'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(decimal) = entity.strip_prefix('#') {
                decimal.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code).filter(|c| *c != '\0')
        }
    }
}

/// End-of-line handling: `\r\n` and lone `\r` both become `\n`.
pub(crate) fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if !content.contains('\r') {
        return Cow::Borrowed(content);
    }
    Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Attribute value normalization for literal whitespace characters.
/// Character references are resolved afterwards so `&#xA;` survives.
pub(crate) fn normalize_attribute_whitespace(content: &str) -> Cow<'_, str> {
    let content = normalize_newlines(content);
    if !content.contains(&['\n', '\t'][..]) {
        return content;
    }
    Cow::Owned(content.replace(&['\n', '\t'][..], " "))
}

pub(crate) fn serialize_text<'a>(content: &'a str, newline: &str) -> Cow<'a, str> {
    if !content.contains(&['&', '<', '>', '\r'][..]) && (newline == "\n" || !content.contains('\n')) {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\r' => result.push_str("&#xD;"),
            '\n' => result.push_str(newline),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

pub(crate) fn serialize_attribute(content: &str) -> Cow<'_, str> {
    if !content.contains(&['&', '<', '>', '"', '\t', '\n', '\r'][..]) {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\t' => result.push_str("&#x9;"),
            '\n' => result.push_str("&#xA;"),
            '\r' => result.push_str("&#xD;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Line breaks inside comments and processing instructions follow the
/// requested newline sequence too.
pub(crate) fn serialize_newlines<'a>(content: &'a str, newline: &str) -> Cow<'a, str> {
    if newline == "\n" || !content.contains('\n') {
        return Cow::Borrowed(content);
    }
    Cow::Owned(content.replace('\n', newline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = "A &amp; B";
        assert_eq!(parse_references(text, 0).unwrap(), "A & B");
    }

    #[test]
    fn test_parse_multiple() {
        let text = "&amp;&apos;&gt;&lt;&quot;";
        assert_eq!(parse_references(text, 0).unwrap(), "&'><\"");
    }

    #[test]
    fn test_parse_character_references() {
        assert_eq!(parse_references("&#65;&#x42;&#x20AC;", 0).unwrap(), "AB€");
    }

    #[test]
    fn test_parse_unknown_entity() {
        let err = parse_references("ab&unknown;", 10).unwrap_err();
        if let ParseError::InvalidEntity { entity, span } = err {
            assert_eq!(entity, "unknown");
            assert_eq!(span, Span::new(12, 21));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_unfinished_entity() {
        let err = parse_references("&amp", 0).unwrap_err();
        if let ParseError::UnclosedEntity { entity, .. } = err {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_no_entities() {
        let text = "hello";
        let result = parse_references(text, 0).unwrap();
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_normalize_attribute_whitespace() {
        assert_eq!(normalize_attribute_whitespace("a\tb\r\nc"), "a b c");
    }

    #[test]
    fn test_serialize_text() {
        assert_eq!(serialize_text("A & <B>", "\n"), "A &amp; &lt;B&gt;");
        assert_eq!(serialize_text("a\nb", "\r\n"), "a\r\nb");
    }

    #[test]
    fn test_serialize_attribute() {
        assert_eq!(
            serialize_attribute("\"x\" & y\tz\n"),
            "&quot;x&quot; &amp; y&#x9;z&#xA;"
        );
    }

    #[test]
    fn test_serialize_no_entities() {
        let text = "hello";
        let result = serialize_attribute(text);
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }
}
