use strum::{Display, EnumString};

pub mod age;
pub mod hyperlink;
pub mod lines;
pub mod time_range;

/// Kind discriminator for a produced link, derived from its target scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LinkKind {
    Email,
    Phone,
    Url,
}

impl LinkKind {
    /// Classify an href by scheme. Returns `None` for anything that is not a
    /// mail, telephone or web target.
    pub fn from_target(target: &str) -> Option<Self> {
        let lowered = target.trim_start().to_ascii_lowercase();
        if lowered.starts_with("mailto:") {
            Some(LinkKind::Email)
        } else if lowered.starts_with("tel:") {
            Some(LinkKind::Phone)
        } else if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Some(LinkKind::Url)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    pub target: String,
    pub label: String,
}

impl Link {
    pub fn email(address: &str, label: &str) -> Self {
        Self {
            kind: LinkKind::Email,
            target: format!("mailto:{address}"),
            label: label.to_string(),
        }
    }

    pub fn phone(dial: &str, label: &str) -> Self {
        Self {
            kind: LinkKind::Phone,
            target: format!("tel:{dial}"),
            label: label.to_string(),
        }
    }

    pub fn url(url: &str, label: &str) -> Self {
        Self {
            kind: LinkKind::Url,
            target: url.to_string(),
            label: label.to_string(),
        }
    }

    /// Append the anchor markup for this link. `color` adds an inline style,
    /// which is how the preview marks link kinds.
    pub fn write_html(&self, out: &mut String, color: Option<&str>) {
        out.push_str("<a href=\"");
        out.push_str(&self.target);
        out.push('"');
        if self.kind == LinkKind::Url {
            out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        if let Some(color) = color {
            out.push_str(" style=\"color:");
            out.push_str(color);
            out.push_str(";\"");
        }
        out.push('>');
        out.push_str(&self.label);
        out.push_str("</a>");
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, None);
        out
    }
}

/// Structure emitted by the line formatter. Never rescanned by later stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Separator placed between emitted lines.
    Separator,
    /// Prefix of a top-level item.
    Bullet,
    /// Break, indent and em-dash prefix of a sub-item.
    SubBullet,
}

pub const LINE_BREAK_MARKER: &str = "<br>";
pub const INDENT_MARKER: &str = "&emsp;";

impl Markup {
    pub fn as_html(self) -> &'static str {
        match self {
            Markup::Separator => "\n",
            Markup::Bullet => "• ",
            Markup::SubBullet => "<br>&emsp;— ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Markup(Markup),
    Link(Link),
}

/// One formatting pass worth of output: an ordered run of typed segments.
/// Only `Text` segments are visible to the rewrite stages, so anything a
/// stage has already produced can't be matched again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Link(link) => Some(link),
            _ => None,
        })
    }

    /// Rewrite every text segment in place.
    pub fn map_text<F>(self, mut rewrite: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let segments = self
            .segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Segment::Text(rewrite(&text)),
                other => other,
            })
            .collect();
        Self { segments }
    }

    /// Replace every text segment with the segments produced for it.
    pub fn split_text<F>(self, mut split: F) -> Self
    where
        F: FnMut(String) -> Vec<Segment>,
    {
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in self.segments {
            match segment {
                Segment::Text(text) => segments.extend(split(text)),
                other => segments.push(other),
            }
        }
        Self { segments }
    }

    /// Serialize with an optional per-link color chooser.
    pub fn write_html<F>(&self, out: &mut String, mut link_color: F)
    where
        F: FnMut(&Link) -> Option<String>,
    {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Markup(markup) => out.push_str(markup.as_html()),
                Segment::Link(link) => {
                    let color = link_color(link);
                    link.write_html(out, color.as_deref());
                }
            }
        }
    }

    /// The linked-HTML string both presenters consume.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, |_| None);
        out
    }
}

/// Run the formatting stages in their fixed order.
pub fn format(input: &str) -> Document {
    let document = lines::format_lines(input);
    let document = time_range::apply(document);
    let document = age::apply(document);
    let document = hyperlink::apply(document);
    tracing::debug!(
        segments = document.segments().len(),
        links = document.links().count(),
        "formatted document"
    );
    document
}

pub fn format_html(input: &str) -> String {
    format(input).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_kind_follows_scheme() {
        assert_eq!(LinkKind::from_target("mailto:a@b.co"), Some(LinkKind::Email));
        assert_eq!(LinkKind::from_target("tel:2125551234"), Some(LinkKind::Phone));
        assert_eq!(LinkKind::from_target("HTTPS://x.org"), Some(LinkKind::Url));
        assert_eq!(LinkKind::from_target("ftp://x.org"), None);
    }

    #[test]
    fn link_kind_names_round_trip() {
        assert_eq!(LinkKind::Email.to_string(), "email");
        assert_eq!("url".parse::<LinkKind>().ok(), Some(LinkKind::Url));
    }

    #[test]
    fn url_links_open_in_new_context() {
        let link = Link::url("https://example.org", "Visit us!");
        assert_eq!(
            link.to_html(),
            r#"<a href="https://example.org" target="_blank" rel="noopener noreferrer">Visit us!</a>"#
        );
    }

    #[test]
    fn map_text_leaves_markup_and_links_alone() {
        let document = Document::from_segments(vec![
            Segment::Markup(Markup::Bullet),
            Segment::Text("abc".into()),
            Segment::Link(Link::email("a@b.co", "abc")),
        ]);
        let mapped = document.map_text(|text| text.to_uppercase());
        assert_eq!(
            mapped.to_html(),
            r#"• ABC<a href="mailto:a@b.co">abc</a>"#
        );
    }

    #[test]
    fn example_document_formats_end_to_end() {
        let input = "-Food, clothing, shelter, and more at example.org\n(212) 555-1234\nhttps://example.org|(Visit us!)\nage(14-24)\n9a-5p, 10p-6a\nemail@email.com";
        let html = format_html(input);
        let lines: Vec<&str> = html.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                "<br>&emsp;— Food, clothing, shelter, and more at example.org",
                r#"• <a href="tel:2125551234">(212) 555-1234</a>"#,
                r#"• <a href="https://example.org" target="_blank" rel="noopener noreferrer">Visit us!</a>"#,
                "• Age requirement: 14-24 (until your 25th birthday)",
                "• 9:00 AM — 5:00 PM, 10:00 PM — 6:00 AM⁺¹",
                r#"• <a href="mailto:email@email.com">email@email.com</a>"#,
            ]
        );
    }

    #[test]
    fn stages_run_before_linking() {
        let document = format("call 212-555-1234 from 9a-5p");
        assert_eq!(document.links().count(), 1);
        insta::assert_snapshot!(
            document.to_html(),
            @r#"• call <a href="tel:2125551234">(212) 555-1234</a> from 9:00 AM — 5:00 PM"#
        );
    }
}
