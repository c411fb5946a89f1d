use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::palette::ColorSet;
use crate::pipeline::LinkKind;
use crate::present::{color_span, ColorFamily};

// Works on already escaped text, so brackets and quotes are entities here.
static ESCAPED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<anchor>&lt;a href=&quot;(?P<href>(?:[^&]|&amp;)*)&quot;.*?&lt;/a&gt;)|(?P<br>&lt;br&gt;)|(?P<tag>&lt;/?[a-z]+.*?&gt;)",
    )
    .expect("valid escaped tag pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    /// A whole anchor, opening tag through `</a>`. `None` for unknown schemes.
    Anchor(Option<LinkKind>),
    Break,
    Other,
}

impl TagCategory {
    pub fn family(self) -> ColorFamily {
        match self {
            TagCategory::Anchor(Some(kind)) => kind.into(),
            TagCategory::Anchor(None) | TagCategory::Break | TagCategory::Other => {
                ColorFamily::Gray
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRun {
    pub range: Range<usize>,
    pub category: TagCategory,
}

pub fn source_family(href: &str) -> Option<ColorFamily> {
    LinkKind::from_target(href).map(ColorFamily::from)
}

/// Find tag-like runs in escaped markup, left to right, never overlapping.
pub fn scan_escaped(escaped: &str) -> Vec<TagRun> {
    ESCAPED_TAG
        .captures_iter(escaped)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let category = if caps.name("anchor").is_some() {
                let href = caps.name("href").map(|m| m.as_str()).unwrap_or_default();
                TagCategory::Anchor(LinkKind::from_target(&href.replace("&amp;", "&")))
            } else if caps.name("br").is_some() {
                TagCategory::Break
            } else {
                TagCategory::Other
            };
            Some(TagRun {
                range: whole.range(),
                category,
            })
        })
        .collect()
}

/// Wrap every tag-like run of escaped markup in a span colored by category.
pub fn highlight_escaped(escaped: &str, colors: &ColorSet) -> String {
    let mut out = String::with_capacity(escaped.len() * 2);
    let mut last = 0;
    for run in scan_escaped(escaped) {
        out.push_str(&escaped[last..run.range.start]);
        color_span(
            &mut out,
            colors.color(run.category.family()),
            &escaped[run.range.clone()],
        );
        last = run.range.end;
    }
    out.push_str(&escaped[last..]);
    out
}
