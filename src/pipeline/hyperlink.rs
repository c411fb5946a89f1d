use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Document, Link, Segment};

// ASCII classes on purpose: `\w`/`\d` in `regex` are Unicode-aware.
const PHONE: &str = r"\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}";
const EMAIL: &str = r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+";
const LABEL: &str = r"\|\(([^)]+)\)";

static LABELED_PHONE: Lazy<Regex> = Lazy::new(|| compile(&format!("({PHONE}){LABEL}")));
static LABELED_EMAIL: Lazy<Regex> = Lazy::new(|| compile(&format!("({EMAIL}){LABEL}")));
static LABELED_URL: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(https?://[^\s<>|]+){LABEL}")));
static RAW_EMAIL: Lazy<Regex> = Lazy::new(|| compile(&format!("({EMAIL})")));
static RAW_PHONE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"({PHONE})(?:[,xX]\s*([0-9]+))?")));
static RAW_URL: Lazy<Regex> = Lazy::new(|| compile(r"(https?://[^\s<>|)]+)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid hyperlink pattern")
}

type LinkBuilder = fn(&Captures) -> Link;

/// Passes in the order they must run. Each one only sees text no earlier
/// pass has claimed.
fn passes() -> [(&'static Regex, LinkBuilder); 6] {
    [
        (&*LABELED_PHONE, labeled_phone as LinkBuilder),
        (&*LABELED_EMAIL, labeled_email as LinkBuilder),
        (&*LABELED_URL, labeled_url as LinkBuilder),
        (&*RAW_EMAIL, raw_email as LinkBuilder),
        (&*RAW_PHONE, raw_phone as LinkBuilder),
        (&*RAW_URL, raw_url as LinkBuilder),
    ]
}

pub fn apply(document: Document) -> Document {
    passes()
        .into_iter()
        .fold(document, |document, (pattern, build)| {
            document.split_text(|text| claim_matches(text, pattern, build))
        })
}

/// Split `text` around every match of `pattern`, turning matches into links.
fn claim_matches(text: String, pattern: &Regex, build: LinkBuilder) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in pattern.captures_iter(&text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(text[last..whole.start()].to_string()));
        }
        let link = build(&caps);
        tracing::trace!(kind = %link.kind, target = %link.target, "linked span");
        segments.push(Segment::Link(link));
        last = whole.end();
    }
    if last == 0 {
        return vec![Segment::Text(text)];
    }
    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    segments
}

pub fn dial_digits(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// `(ddd) ddd-dddd` for a ten digit run.
pub fn display_phone(digits: &str) -> String {
    if digits.len() < 10 {
        return digits.to_string();
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

/// Drop the scheme, a leading `www.` and a single trailing slash.
pub fn display_url(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.strip_suffix('/').unwrap_or(rest).to_string()
}

fn labeled_phone(caps: &Captures) -> Link {
    Link::phone(&dial_digits(&caps[1]), &caps[2])
}

fn labeled_email(caps: &Captures) -> Link {
    Link::email(&caps[1], &caps[2])
}

fn labeled_url(caps: &Captures) -> Link {
    Link::url(&caps[1], &caps[2])
}

fn raw_email(caps: &Captures) -> Link {
    Link::email(&caps[1], &caps[1])
}

fn raw_phone(caps: &Captures) -> Link {
    let digits = dial_digits(&caps[1]);
    let display = display_phone(&digits);
    match caps.get(2) {
        Some(ext) => {
            let ext = ext.as_str();
            Link::phone(&format!("{digits},{ext}"), &format!("{display} x{ext}"))
        }
        None => Link::phone(&digits, &display),
    }
}

fn raw_url(caps: &Captures) -> Link {
    Link::url(&caps[1], &display_url(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{LinkKind, Markup};
    use assert_matches::assert_matches;

    fn link_text(text: &str) -> Document {
        apply(Document::from_segments(vec![Segment::Text(text.into())]))
    }

    fn html(text: &str) -> String {
        link_text(text).to_html()
    }

    #[test]
    fn labeled_phone_uses_digits_only_target() {
        assert_eq!(
            html("Call (212) 555-1234|(the front desk) today"),
            r#"Call <a href="tel:2125551234">the front desk</a> today"#
        );
    }

    #[test]
    fn labeled_email_links_with_label() {
        assert_eq!(
            html("info@example.org|(Email us)"),
            r#"<a href="mailto:info@example.org">Email us</a>"#
        );
    }

    #[test]
    fn labeled_url_opens_new_context() {
        assert_eq!(
            html("https://example.org|(Visit us!)"),
            r#"<a href="https://example.org" target="_blank" rel="noopener noreferrer">Visit us!</a>"#
        );
    }

    #[test]
    fn raw_email_links_to_itself() {
        assert_eq!(
            html("write to a.b-c@mail.example.com."),
            r#"write to <a href="mailto:a.b-c@mail.example.com">a.b-c@mail.example.com</a>."#
        );
    }

    #[test]
    fn raw_phone_is_normalized() {
        assert_eq!(
            html("212.555.1234"),
            r#"<a href="tel:2125551234">(212) 555-1234</a>"#
        );
    }

    #[test]
    fn raw_phone_keeps_extension() {
        assert_eq!(
            html("212-555-1234x 42"),
            r#"<a href="tel:2125551234,42">(212) 555-1234 x42</a>"#
        );
        assert_eq!(
            html("2125551234,7"),
            r#"<a href="tel:2125551234,7">(212) 555-1234 x7</a>"#
        );
    }

    #[test]
    fn raw_url_display_is_trimmed() {
        assert_eq!(
            html("see https://www.example.org/ now"),
            r#"see <a href="https://www.example.org/" target="_blank" rel="noopener noreferrer">example.org</a> now"#
        );
    }

    #[test]
    fn scheme_less_domain_is_not_linked() {
        assert_eq!(html("more at example.org"), "more at example.org");
    }

    #[test]
    fn labeled_url_then_raw_email_link_independently() {
        let document = link_text("https://example.org|(Site)contact@example.org");
        let links: Vec<_> = document.links().cloned().collect();
        assert_eq!(
            links,
            vec![
                Link::url("https://example.org", "Site"),
                Link::email("contact@example.org", "contact@example.org"),
            ]
        );
    }

    #[test]
    fn labels_are_never_relinked() {
        let document = link_text(
            "https://example.org|(mail help@example.org or call 212-555-1234 https://x.org)",
        );
        assert_eq!(document.links().count(), 1);
        assert_matches!(
            document.segments(),
            [Segment::Link(Link { kind: LinkKind::Url, label, .. })]
                if label == "mail help@example.org or call 212-555-1234 https://x.org"
        );
    }

    #[test]
    fn email_with_digits_is_not_also_a_phone() {
        let document = link_text("2125551234@txt.example.net");
        let kinds: Vec<_> = document.links().map(|link| link.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Email]);
    }

    #[test]
    fn markup_segments_are_skipped() {
        let document = apply(Document::from_segments(vec![
            Segment::Markup(Markup::Bullet),
            Segment::Text("a@b.co".into()),
        ]));
        assert_matches!(
            document.segments(),
            [Segment::Markup(Markup::Bullet), Segment::Link(_)]
        );
    }

    #[test]
    fn permissive_phone_matches_long_ids() {
        // Any ten digit run reads as a phone number.
        let document = link_text("order 1234567890");
        assert_eq!(document.links().count(), 1);
    }
}
