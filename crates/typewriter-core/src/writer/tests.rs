//! Snapshot tests for HtmlWriter output.
//!
//! These pin the exact fragment bytes: the parser and any stored documents
//! depend on them.

use crate::font::{FontCatalog, FontEntry};
use crate::render::ImageResolver;
use crate::span::SpanModel;
use crate::types::{Alignment, Attribute, AttributeRange};

use super::{HtmlWriter, to_html};

fn fonts() -> FontCatalog {
    FontCatalog::new([FontEntry::new("7", "Courier Prime")])
}

fn model(text: &str, ranges: Vec<(Attribute, usize, usize)>) -> SpanModel {
    SpanModel::from_parts(
        text,
        ranges
            .into_iter()
            .map(|(attr, start, end)| AttributeRange::new(attr, start, end)),
    )
    .expect("valid ranges")
}

fn render(text: &str, ranges: Vec<(Attribute, usize, usize)>) -> String {
    to_html(&model(text, ranges), &fonts())
}

struct BytesResolver;

impl ImageResolver for BytesResolver {
    fn resolve_png(&self, source: &str) -> Option<Vec<u8>> {
        (source == "images/one.png").then(|| vec![1, 2, 3])
    }
}

// === Paragraph structure ===

#[test]
fn test_empty_model() {
    insta::assert_snapshot!(render("", vec![]), @"<p></p>");
}

#[test]
fn test_plain_paragraphs() {
    insta::assert_snapshot!(render("one\ntwo", vec![]), @"<p>one</p><p>two</p>");
}

#[test]
fn test_trailing_newline_yields_empty_paragraph() {
    insta::assert_snapshot!(render("a\n", vec![]), @"<p>a</p><p></p>");
}

#[test]
fn test_escaping() {
    insta::assert_snapshot!(
        render(r#"a<b>&"c"'"#, vec![]),
        @"<p>a&lt;b&gt;&amp;&quot;c&quot;'</p>"
    );
}

#[test]
fn test_carriage_return_escaped() {
    insta::assert_snapshot!(render("a\rb", vec![]), @"<p>a&#13;b</p>");
}

#[test]
fn test_indented_paragraphs() {
    let mut m = SpanModel::new("Hello.\nWorld.");
    m.recompute_paragraph_indents();
    insta::assert_snapshot!(
        to_html(&m, &fonts()),
        @r#"<p class="indented-paragraph">Hello.</p><p class="indented-paragraph">World.</p>"#
    );
}

#[test]
fn test_indent_width_written_when_not_default() {
    let m = model(
        "one\ntwo",
        vec![
            (Attribute::FirstLineIndent(0.5), 0, 4),
            (Attribute::FirstLineIndent(0.25), 4, 7),
        ],
    );
    insta::assert_snapshot!(
        to_html(&m, &fonts()),
        @r#"<p class="indented-paragraph" data-indent="0.5">one</p><p class="indented-paragraph">two</p>"#
    );
}

#[test]
fn test_blank_paragraph_never_indented() {
    let mut m = SpanModel::new("a\n\nb");
    m.recompute_paragraph_indents();
    insta::assert_snapshot!(
        to_html(&m, &fonts()),
        @r#"<p class="indented-paragraph">a</p><p></p><p class="indented-paragraph">b</p>"#
    );
}

// === Inline attributes ===

#[test]
fn test_bold() {
    let mut m = SpanModel::new("abc");
    m.apply_toggle(Attribute::Bold, 0, 3).unwrap();
    assert_eq!(to_html(&m, &fonts()), "<p><b>abc</b></p>");
}

#[test]
fn test_bold_italic_nesting() {
    insta::assert_snapshot!(
        render("abc", vec![(Attribute::Italic, 0, 3), (Attribute::Bold, 0, 3)]),
        @"<p><b><i>abc</i></b></p>"
    );
}

#[test]
fn test_overlap_is_split() {
    insta::assert_snapshot!(
        render("abcdefgh", vec![(Attribute::Bold, 0, 5), (Attribute::Italic, 2, 8)]),
        @"<p><b>ab<i>cde</i></b><i>fgh</i></p>"
    );
}

#[test]
fn test_range_across_newline_marks_breaks() {
    insta::assert_snapshot!(
        render("ab\ncd", vec![(Attribute::Bold, 0, 5)]),
        @r#"<p><b data-breaks-after="1">ab</b></p><p><b data-breaks-before="1">cd</b></p>"#
    );
}

#[test]
fn test_breaks_span_blank_paragraphs() {
    insta::assert_snapshot!(
        render("a\n\nb", vec![(Attribute::Italic, 0, 4)]),
        @r#"<p><i data-breaks-after="2">a</i></p><p></p><p><i data-breaks-before="2">b</i></p>"#
    );
}

#[test]
fn test_range_ending_on_line_feed() {
    insta::assert_snapshot!(
        render("a\nb", vec![(Attribute::CustomFont("7".into()), 0, 2)]),
        @r#"<p><span data-font-resource-id="7" data-font-name="Courier Prime" data-breaks-after="1">a</span></p><p>b</p>"#
    );
    insta::assert_snapshot!(
        render("a\nb", vec![(Attribute::RelativeSize(1.5), 1, 3)]),
        @r#"<p>a</p><p><span style="font-size: 1.5em;" data-breaks-before="1">b</span></p>"#
    );
}

#[test]
fn test_font_with_catalog_name() {
    insta::assert_snapshot!(
        render("serif text", vec![(Attribute::CustomFont("7".into()), 0, 5)]),
        @r#"<p><span data-font-resource-id="7" data-font-name="Courier Prime">serif</span> text</p>"#
    );
}

#[test]
fn test_unknown_font_has_empty_name() {
    insta::assert_snapshot!(
        render("x", vec![(Attribute::CustomFont("99".into()), 0, 1)]),
        @r#"<p><span data-font-resource-id="99" data-font-name="">x</span></p>"#
    );
}

#[test]
fn test_relative_size() {
    insta::assert_snapshot!(
        render("big small", vec![(Attribute::RelativeSize(1.5), 0, 3)]),
        @r#"<p><span style="font-size: 1.5em;">big</span> small</p>"#
    );
    insta::assert_snapshot!(
        render("huge", vec![(Attribute::RelativeSize(2.0), 0, 4)]),
        @r#"<p><span style="font-size: 2em;">huge</span></p>"#
    );
}

#[test]
fn test_alignment_wraps_paragraph() {
    let mut m = SpanModel::new("Title\nbody");
    m.apply_paragraph_alignment(Alignment::Center, 0, 0).unwrap();
    m.apply_toggle(Attribute::Bold, 0, 5).unwrap();
    insta::assert_snapshot!(
        to_html(&m, &fonts()),
        @r#"<p><span data-alignment="center"><b>Title</b></span></p><p>body</p>"#
    );
}

#[test]
fn test_left_alignment_has_no_wrapper() {
    insta::assert_snapshot!(
        render("plain", vec![(Attribute::Alignment(Alignment::Left), 0, 5)]),
        @"<p>plain</p>"
    );
}

#[test]
fn test_full_nesting_order() {
    insta::assert_snapshot!(
        render(
            "word",
            vec![
                (Attribute::Italic, 0, 4),
                (Attribute::Bold, 0, 4),
                (Attribute::RelativeSize(2.0), 0, 4),
                (Attribute::CustomFont("7".into()), 0, 4),
                (Attribute::Alignment(Alignment::Justify), 0, 4),
            ]
        ),
        @r#"<p><span data-alignment="justify"><span data-font-resource-id="7" data-font-name="Courier Prime"><span style="font-size: 2em;"><b><i>word</i></b></span></span></span></p>"#
    );
}

#[test]
fn test_utf16_offsets() {
    insta::assert_snapshot!(
        render("🌍 ok", vec![(Attribute::Bold, 3, 5)]),
        @"<p>🌍 <b>ok</b></p>"
    );
}

// === Images ===

#[test]
fn test_inline_data_image() {
    let mut m = SpanModel::new("ab");
    m.insert_image("data:image/png;base64,AAAA", 1).unwrap();
    insta::assert_snapshot!(
        to_html(&m, &fonts()),
        @r#"<p>a</p><p><img src="data:image/png;base64,AAAA"></p><p>b</p>"#
    );
}

#[test]
fn test_resolved_image_is_base64_png() {
    let mut m = SpanModel::new("");
    m.insert_image("images/one.png", 0).unwrap();
    let fonts = fonts();
    let html = HtmlWriter::new(&m, &fonts)
        .with_image_resolver(BytesResolver)
        .run();
    insta::assert_snapshot!(html, @r#"<p></p><p><img src="data:image/png;base64,AQID"></p><p></p>"#);
}

#[test]
fn test_unresolved_image_keeps_placeholder() {
    let mut m = SpanModel::new("");
    m.insert_image("images/missing.png", 0).unwrap();
    let fonts = fonts();
    let html = HtmlWriter::new(&m, &fonts)
        .with_image_resolver(BytesResolver)
        .run();
    assert_eq!(html, "<p></p><p> </p><p></p>");
}

#[test]
fn test_output_is_deterministic() {
    let mut m = SpanModel::new("one two\nthree");
    m.apply_toggle(Attribute::Bold, 2, 9).unwrap();
    m.apply_value(Attribute::RelativeSize(1.75), 4, 12).unwrap();
    m.recompute_paragraph_indents();
    let fonts = fonts();
    assert_eq!(to_html(&m, &fonts), to_html(&m.clone(), &fonts));
}
