//! Conversions from uploaded files into documents.
//!
//! Text and RTF files become plain-text documents. HTML is stored as-is in
//! `formatted_text`; it only goes through the parser when opened.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;
use crate::error::ImportError;
use crate::escape::decode_entities;
use crate::format::ContentFormat;
use crate::parser::html_to_text;

/// First lines shorter than this become the title.
const MAX_TITLE_LINE: usize = 100;
const UNTITLED: &str = "Untitled Book";

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static TITLE_JUNK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s-]").unwrap());
static ID_JUNK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]").unwrap());

static RTF_DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\\(?:\*|fonttbl|colortbl|stylesheet|info)[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap()
});
static RTF_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\'([0-9a-fA-F]{2})").unwrap());
static RTF_PAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\par\b ?").unwrap());
static RTF_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\line\b ?").unwrap());
static RTF_CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+(-?\d+)? ?").unwrap());
static RTF_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r]+").unwrap());
static RTF_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static EXTRA_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Build a document from an uploaded file.
#[tracing::instrument(level = "debug", skip(content), fields(len = content.len()))]
pub fn import_document(file_name: &str, content: &str) -> Result<Document, ImportError> {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext.to_ascii_lowercase()),
        None => (file_name, String::new()),
    };

    let mut title = stem.to_string();
    let mut document = Document::new(ID_JUNK.replace_all(file_name, "_"), "");
    match extension.as_str() {
        "txt" => {
            let content = content.replace("\r\n", "\n");
            let (first, body) = split_title(&content);
            if let Some(first) = first {
                title = first;
            }
            document.plain_text = body;
        }
        "rtf" => {
            let text = rtf_to_text(content);
            let (first, body) = split_title(&text);
            if let Some(first) = first {
                title = first;
            }
            document.plain_text = body;
        }
        "html" | "htm" => {
            document.format = ContentFormat::Html;
            document.formatted_text = Some(content.to_string());
            document.plain_text = html_to_text(content);
            if let Some(caps) = TITLE_TAG.captures(content) {
                title = decode_entities(caps[1].trim()).into_owned();
            }
        }
        _ => return Err(ImportError::Unsupported(file_name.to_string())),
    }

    document.title = clean_title(&title);
    document.subtitle = Some(format!("Imported from {file_name}"));
    Ok(document)
}

/// Convert RTF to plain text. Paragraph marks become blank lines.
pub fn rtf_to_text(rtf: &str) -> String {
    let mut text = match (rtf.find("{\\rtf"), rtf.rfind('}')) {
        (Some(start), Some(end)) if end > start => rtf[start..=end].to_string(),
        _ => rtf.to_string(),
    };
    text = text.replace("\r\n", "\n").replace('\n', "");
    text = RTF_DESTINATION.replace_all(&text, "").into_owned();
    text = RTF_HEX
        .replace_all(&text, |caps: &regex::Captures| {
            match u8::from_str_radix(&caps[1], 16) {
                Ok(0x92) => "\u{2019}".to_string(),
                Ok(0x93) => "\u{201c}".to_string(),
                Ok(0x94) => "\u{201d}".to_string(),
                Ok(0x96) => "\u{2013}".to_string(),
                Ok(0x97) => "\u{2014}".to_string(),
                Ok(b) => char::from(b).to_string(),
                Err(_) => String::new(),
            }
        })
        .into_owned();
    text = RTF_PAR.replace_all(&text, "\n\n").into_owned();
    text = RTF_LINE.replace_all(&text, "\n").into_owned();
    text = RTF_CONTROL.replace_all(&text, "").into_owned();
    text = text.replace(['{', '}'], "");
    text = RTF_SPACES.replace_all(&text, " ").into_owned();
    text = RTF_NEWLINES.replace_all(&text, "\n").into_owned();
    text = EXTRA_BLANK_LINES.replace_all(&text, "\n\n").into_owned();
    text.trim().to_string()
}

/// Take the first line as a title when it is short enough.
fn split_title(content: &str) -> (Option<String>, String) {
    match content.split_once('\n') {
        Some((first, rest)) if first.chars().count() < MAX_TITLE_LINE => {
            (Some(first.trim().to_string()), rest.trim().to_string())
        }
        None if !content.is_empty() && content.chars().count() < MAX_TITLE_LINE => {
            (Some(content.trim().to_string()), String::new())
        }
        _ => (None, content.trim().to_string()),
    }
}

fn clean_title(title: &str) -> String {
    let cleaned = TITLE_JUNK.replace_all(title, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNTITLED.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_import() {
        let doc = import_document("notes.txt", "My Story!\r\n\r\nOnce upon a time.\r\n").unwrap();
        assert_eq!(doc.title, "My Story");
        assert_eq!(doc.plain_text, "Once upon a time.");
        assert_eq!(doc.format, ContentFormat::PlainText);
        assert_eq!(doc.subtitle.as_deref(), Some("Imported from notes.txt"));
        assert_eq!(doc.id, "notes.txt");
    }

    #[test]
    fn test_long_first_line_is_not_a_title() {
        let line = "word ".repeat(30);
        let doc = import_document("draft one.TXT", &line).unwrap();
        assert_eq!(doc.title, "draft one");
        assert_eq!(doc.plain_text, line.trim());
        assert_eq!(doc.id, "draft_one.TXT");
    }

    #[test]
    fn test_rtf_to_text() {
        let rtf = r"{\rtf1\ansi{\fonttbl{\f0 Times New Roman;}}\f0\fs24 Chapter\par It\'92s {\b bold}\line next\par}";
        assert_eq!(rtf_to_text(rtf), "Chapter\n\nIt\u{2019}s bold\nnext");
    }

    #[test]
    fn test_rtf_import() {
        let rtf = r"{\rtf1 Title line\par Body text.\par}";
        let doc = import_document("a.rtf", rtf).unwrap();
        assert_eq!(doc.title, "Title line");
        assert_eq!(doc.plain_text, "Body text.");
    }

    #[test]
    fn test_html_import_passes_markup_through() {
        let html = "<html><head><title>The &amp; Book</title></head><body><p>One</p><p>Two</p></body></html>";
        let doc = import_document("book.html", html).unwrap();
        assert_eq!(doc.format, ContentFormat::Html);
        assert_eq!(doc.formatted_text.as_deref(), Some(html));
        assert_eq!(doc.plain_text, "One\nTwo");
        assert_eq!(doc.title, "The  Book");
    }

    #[test]
    fn test_untitled() {
        let doc = import_document("???.htm", "<p>x</p>").unwrap();
        assert_eq!(doc.title, "Untitled Book");
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            import_document("photo.png", ""),
            Err(ImportError::Unsupported(_))
        ));
    }
}
