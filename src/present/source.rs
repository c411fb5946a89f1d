use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::push_escaped;
use crate::config::palette::ColorSet;
use crate::highlight::highlight_escaped;
use crate::pipeline::{INDENT_MARKER, LINE_BREAK_MARKER};

static PROTECTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&emsp;|<br>").expect("valid protected literal pattern"));
static WRAPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"</?span(?: style="[^"]*")?>"#).expect("valid wrapper pattern"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#039);").expect("valid entity pattern"));

/// Escape linked HTML for display as text. The indent and break markers are
/// emitted as their single escaped form so they read as literals.
pub fn escape_source(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 2);
    let mut last = 0;
    for literal in PROTECTED.find_iter(html) {
        push_escaped(&mut out, &html[last..literal.start()]);
        out.push_str(protected_escape(literal.as_str()));
        last = literal.end();
    }
    push_escaped(&mut out, &html[last..]);
    out
}

fn protected_escape(literal: &str) -> &'static str {
    if literal == INDENT_MARKER {
        "&amp;emsp;"
    } else {
        debug_assert_eq!(literal, LINE_BREAK_MARKER);
        "&lt;br&gt;"
    }
}

/// The "view source" surface: escaped markup with colored tag runs.
pub fn render_source(html: &str, colors: &ColorSet) -> String {
    highlight_escaped(&escape_source(html), colors)
}

/// What a reader sees (and copies) from the source view.
pub fn source_view_text(source: &str) -> String {
    let stripped = WRAPPER.replace_all(source, "");
    ENTITY
        .replace_all(&stripped, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}
