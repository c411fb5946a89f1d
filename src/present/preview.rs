use crate::config::palette::ColorSet;
use crate::pipeline::Document;

use super::ColorFamily;

/// Live preview markup: the linked document with every link colored by kind.
pub fn render_preview(document: &Document, colors: &ColorSet) -> String {
    let mut out = String::new();
    document.write_html(&mut out, |link| {
        Some(colors.color(ColorFamily::from(link.kind)).to_string())
    });
    out
}
