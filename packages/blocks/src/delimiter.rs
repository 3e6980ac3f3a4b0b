//! Block delimiter markup.
//!
//! ```text
//! <!-- wp:core/categories {"showPostCounts":true} -->body<!-- /wp:core/categories -->
//! ```
//!
//! The opener carries the type id and an optional JSON object payload; the
//! closer repeats the type id. Payloads are written with `--`, `<` and `>`
//! escaped so they can never terminate the surrounding comment.

use crate::block::Attributes;
use crate::registry::is_valid_block_name;

pub const OPEN_PREFIX: &str = "<!-- wp:";
pub const CLOSE_PREFIX: &str = "<!-- /wp:";
pub const COMMENT_END: &str = "-->";

/// A well-formed opener found in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Opener<'a> {
    pub name: &'a str,
    pub attributes: Attributes,
    /// Byte offset just past the opener
    pub end: usize,
}

/// Why an opener candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedOpener {
    Unterminated,
    InvalidName,
    InvalidPayload(String),
}

/// Read the opener starting at `start`, which must point at `OPEN_PREFIX`
pub fn read_opener(source: &str, start: usize) -> Result<Opener<'_>, MalformedOpener> {
    let inner_start = start + OPEN_PREFIX.len();
    let inner_len = source[inner_start..]
        .find(COMMENT_END)
        .ok_or(MalformedOpener::Unterminated)?;
    let inner = &source[inner_start..inner_start + inner_len];
    let end = inner_start + inner_len + COMMENT_END.len();

    let inner = inner.trim_end();
    let (name, payload) = match inner.find(char::is_whitespace) {
        Some(split) => (&inner[..split], inner[split..].trim()),
        None => (inner, ""),
    };

    if !is_valid_block_name(name) {
        return Err(MalformedOpener::InvalidName);
    }

    let attributes = if payload.is_empty() {
        Attributes::new()
    } else {
        serde_json::from_str::<Attributes>(payload)
            .map_err(|e| MalformedOpener::InvalidPayload(e.to_string()))?
    };

    Ok(Opener {
        name,
        attributes,
        end,
    })
}

/// Locate the closer for `name` at or after `from`.
///
/// Returns `(body_end, block_end)`: where the body stops and where the closer ends.
pub fn find_closer(source: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let closer = closer(name);
    source[from..]
        .find(&closer)
        .map(|offset| (from + offset, from + offset + closer.len()))
}

pub fn opener(name: &str, attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return format!("{OPEN_PREFIX}{name} {COMMENT_END}");
    }
    format!(
        "{OPEN_PREFIX}{name} {} {COMMENT_END}",
        escape_payload(&serialize_payload(attributes))
    )
}

pub fn closer(name: &str) -> String {
    format!("{CLOSE_PREFIX}{name} {COMMENT_END}")
}

fn serialize_payload(attributes: &Attributes) -> String {
    // A map of JSON values with string keys always serializes.
    serde_json::to_string(attributes).unwrap_or_else(|_| "{}".to_string())
}

fn escape_payload(json: &str) -> String {
    json.replace("--", "\\u002d\\u002d")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_opener_without_payload() {
        let source = "<!-- wp:core/text -->";
        let opener = read_opener(source, 0).unwrap();
        assert_eq!(opener.name, "core/text");
        assert!(opener.attributes.is_empty());
        assert_eq!(opener.end, source.len());
    }

    #[test]
    fn test_read_opener_with_payload() {
        let source = r#"xx<!-- wp:core/categories {"showHierarchy":true} -->"#;
        let opener = read_opener(source, 2).unwrap();
        assert_eq!(opener.name, "core/categories");
        assert_eq!(opener.attributes["showHierarchy"], json!(true));
    }

    #[test]
    fn test_read_opener_rejects_bad_input() {
        assert_eq!(
            read_opener("<!-- wp:core/text", 0),
            Err(MalformedOpener::Unterminated)
        );
        assert_eq!(
            read_opener("<!-- wp:NotAName -->", 0),
            Err(MalformedOpener::InvalidName)
        );
        assert!(matches!(
            read_opener("<!-- wp:core/text {oops} -->", 0),
            Err(MalformedOpener::InvalidPayload(_))
        ));
        assert!(matches!(
            read_opener("<!-- wp:core/text [1,2] -->", 0),
            Err(MalformedOpener::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_find_closer() {
        let source = "<!-- wp:a/b -->body<!-- /wp:a/b -->tail";
        let opener = read_opener(source, 0).unwrap();
        let (body_end, block_end) = find_closer(source, opener.end, "a/b").unwrap();
        assert_eq!(&source[opener.end..body_end], "body");
        assert_eq!(&source[block_end..], "tail");
        assert!(find_closer(source, opener.end, "a/c").is_none());
    }

    #[test]
    fn test_payload_escaping_survives_reading() {
        let attributes = Attributes::from([(
            "content".to_string(),
            json!("a --> b <c>"),
        )]);
        let markup = opener("core/text", &attributes);
        assert!(!markup[OPEN_PREFIX.len()..markup.len() - COMMENT_END.len()].contains("-->"));

        let opener = read_opener(&markup, 0).unwrap();
        assert_eq!(opener.attributes, attributes);
    }

    #[test]
    fn test_payload_keys_are_sorted() {
        let attributes = Attributes::from([
            ("zeta".to_string(), json!(1)),
            ("alpha".to_string(), json!(2)),
        ]);
        assert_eq!(
            opener("a/b", &attributes),
            r#"<!-- wp:a/b {"alpha":2,"zeta":1} -->"#
        );
    }
}
