use once_cell::sync::Lazy;
use regex::Regex;

use super::{color_span, push_escaped, ColorFamily};
use crate::config::palette::ColorSet;
use crate::config::CaretPolicy;

static INPUT_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+").expect("valid email pattern")
});
static INPUT_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4,}").expect("valid phone pattern")
});
static INPUT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>|]+").expect("valid url pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Plain(String),
    Colored(ColorFamily, String),
}

/// Color contact patterns in the raw input. Emails win over phones, phones
/// over URLs; a colored run is never rescanned.
pub fn colorize_input(text: &str, colors: &ColorSet) -> String {
    let mut pieces = vec![Piece::Plain(text.to_string())];
    for (pattern, family) in [
        (&*INPUT_EMAIL, ColorFamily::Red),
        (&*INPUT_PHONE, ColorFamily::Green),
        (&*INPUT_URL, ColorFamily::Blue),
    ] {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| match piece {
                Piece::Plain(text) => split_plain(&text, pattern, family),
                colored => vec![colored],
            })
            .collect();
    }

    let mut out = String::with_capacity(text.len());
    for piece in pieces {
        match piece {
            Piece::Plain(text) => push_escaped(&mut out, &text),
            Piece::Colored(family, text) => {
                let mut body = String::with_capacity(text.len());
                push_escaped(&mut body, &text);
                color_span(&mut out, colors.color(family), &body);
            }
        }
    }
    out
}

fn split_plain(text: &str, pattern: &Regex, family: ColorFamily) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            pieces.push(Piece::Plain(text[last..found.start()].to_string()));
        }
        pieces.push(Piece::Colored(family, found.as_str().to_string()));
        last = found.end();
    }
    if last < text.len() {
        pieces.push(Piece::Plain(text[last..].to_string()));
    }
    pieces
}

/// Caret position after recoloring, as a byte offset into the input text.
/// `None` when the surface had no caret to begin with.
pub fn place_caret(policy: CaretPolicy, text: &str, previous: Option<usize>) -> Option<usize> {
    let previous = previous?;
    match policy {
        CaretPolicy::End => Some(text.len()),
        CaretPolicy::Preserve => Some(floor_char_boundary(text, previous)),
    }
}

pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_each_contact_kind() {
        let out = colorize_input(
            "mail a@b.co or 212-555-12345 or https://x.org",
            &ColorSet::preview(),
        );
        assert_eq!(
            out,
            "mail <span style=\"color:#d93025;\">a@b.co</span> or <span style=\"color:#188038;\">212-555-12345</span> or <span style=\"color:#1a73e8;\">https://x.org</span>"
        );
    }

    #[test]
    fn url_containing_email_is_colored_once() {
        let out = colorize_input("https://x.org/u/a@b.co", &ColorSet::preview());
        assert_eq!(out.matches("<span").count(), 2);
        assert!(!out.contains("<span style=\"color:#1a73e8;\"><span"));
    }

    #[test]
    fn plain_text_is_escaped() {
        assert_eq!(
            colorize_input("<b>hi</b> & bye", &ColorSet::preview()),
            "&lt;b&gt;hi&lt;/b&gt; &amp; bye"
        );
    }

    #[test]
    fn caret_moves_to_end_by_default() {
        assert_eq!(place_caret(CaretPolicy::End, "héllo", Some(1)), Some(6));
        assert_eq!(place_caret(CaretPolicy::End, "hello", None), None);
    }

    #[test]
    fn preserved_caret_snaps_to_char_boundary() {
        assert_eq!(place_caret(CaretPolicy::Preserve, "héllo", Some(2)), Some(1));
        assert_eq!(place_caret(CaretPolicy::Preserve, "hi", Some(40)), Some(2));
    }
}
