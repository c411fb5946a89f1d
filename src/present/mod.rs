use serde::Serialize;

use crate::config::palette::PaletteConfig;
use crate::pipeline::{self, LinkKind};

pub mod input;
pub mod preview;
pub mod source;

/// Color family shared by every renderer. Each renderer maps a family to its
/// own literal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Red,
    Green,
    Blue,
    Gray,
}

impl From<LinkKind> for ColorFamily {
    fn from(kind: LinkKind) -> Self {
        match kind {
            LinkKind::Email => ColorFamily::Red,
            LinkKind::Phone => ColorFamily::Green,
            LinkKind::Url => ColorFamily::Blue,
        }
    }
}

/// Both output surfaces of one pipeline run, plus the linked HTML they were
/// rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub html: String,
    pub preview: String,
    pub source: String,
}

pub fn render(input: &str, palette: &PaletteConfig) -> Rendered {
    let document = pipeline::format(input);
    let html = document.to_html();
    let preview = preview::render_preview(&document, &palette.preview);
    let source = source::render_source(&html, &palette.source);
    Rendered {
        html,
        preview,
        source,
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    push_escaped(&mut out, raw);
    out
}

pub(crate) fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
}

pub(crate) fn color_span(out: &mut String, color: &str, body: &str) {
    out.push_str("<span style=\"color:");
    out.push_str(color);
    out.push_str(";\">");
    out.push_str(body);
    out.push_str("</span>");
}
