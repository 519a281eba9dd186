//! Structural stripping and the minimal tag-strip conversion.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::decode_entities;

static BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)").unwrap());

/// Elements removed together with their content.
static WITH_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<head\b[^>]*>.*?</head\s*>|<title\b[^>]*>.*?</title\s*>|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->",
    )
    .unwrap()
});

/// Wrapper tags removed on their own.
static WRAPPERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!doctype[^>]*>|</?(?:html|head|body)\b[^>]*>|<meta\b[^>]*>").unwrap()
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>\s*<p\b[^>]*>").unwrap());
static TAG_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[a-zA-Z/!]").unwrap());

/// Remove document structure around a fragment.
///
/// When a `<body>` is present only its content is kept. `head`, `title`,
/// `script` and `style` go with their content; `html`, `body`, `meta` and
/// doctype tags go on their own.
pub fn strip_structure(html: &str) -> String {
    let body = match BODY.captures(html) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => html,
    };
    let without_content = WITH_CONTENT.replace_all(body, "");
    WRAPPERS.replace_all(&without_content, "").trim().to_string()
}

/// Remove every complete tag.
pub(crate) fn strip_tags(html: &str) -> String {
    ANY_TAG.replace_all(html, "").into_owned()
}

/// Generic tag-strip conversion used when structured parsing fails.
///
/// Paragraph boundaries and `<br>` become line feeds, everything else is
/// dropped and entities decoded. Returns `None` when a tag is left
/// unterminated, since its text would be garbage.
pub fn minimal_text(html: &str) -> Option<String> {
    let body = strip_structure(html);
    let with_breaks = BR.replace_all(&body, "\n");
    let with_paragraphs = PARAGRAPH_BREAK.replace_all(&with_breaks, "\n");
    let stripped = ANY_TAG.replace_all(&with_paragraphs, "");
    if TAG_START.is_match(&stripped) {
        return None;
    }
    Some(decode_entities(&stripped).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_body() {
        let html = "<!DOCTYPE html><html><head><title>T</title><meta charset=\"utf-8\"></head><body><p>x</p></body></html>";
        assert_eq!(strip_structure(html), "<p>x</p>");
    }

    #[test]
    fn test_removes_scripts_and_styles() {
        let html = "<p>a</p><script type=\"text/javascript\">alert('<p>')</script><style>p { }</style><p>b</p>";
        assert_eq!(strip_structure(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_fragment_passes_through() {
        let html = r#"<p class="indented-paragraph"><b>x</b></p>"#;
        assert_eq!(strip_structure(html), html);
    }

    #[test]
    fn test_unclosed_body() {
        assert_eq!(strip_structure("<html><body><p>tail"), "<p>tail");
    }

    #[test]
    fn test_minimal_text() {
        assert_eq!(
            minimal_text("<p>one &amp; two</p>\n<p>three<br/>four</p>").as_deref(),
            Some("one & two\nthree\nfour")
        );
        assert_eq!(minimal_text("<p>broken <b").as_deref(), None);
        assert_eq!(minimal_text("a < b").as_deref(), Some("a < b"));
    }
}
