//! Embedded image output for HtmlWriter.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::escape::push_escaped;
use crate::render::ImageResolver;

use super::HtmlWriter;

impl<'a, R: ImageResolver> HtmlWriter<'a, R> {
    /// Write an `<img>` for `source`, inlined as a base64 PNG.
    ///
    /// `data:image/` sources are already inline and written as-is. Anything
    /// else goes through the resolver; an unresolvable image leaves its
    /// placeholder space.
    pub(super) fn write_image(&mut self, source: &str) {
        if source.starts_with("data:image/") {
            self.out.push_str("<img src=\"");
            push_escaped(&mut self.out, source);
            self.out.push_str("\">");
            return;
        }
        match self.images.resolve_png(source) {
            Some(png) => {
                self.out.push_str("<img src=\"data:image/png;base64,");
                self.out.push_str(&STANDARD.encode(png));
                self.out.push_str("\">");
            }
            None => {
                tracing::warn!(source, "image could not be resolved, writing placeholder");
                self.out.push(' ');
            }
        }
    }
}
