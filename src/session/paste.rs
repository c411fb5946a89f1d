use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

/// What the system clipboard offered for a paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub html: Option<String>,
    pub plain: Option<String>,
}

impl ClipboardPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            html: None,
            plain: Some(text.into()),
        }
    }

    pub fn html(markup: impl Into<String>) -> Self {
        Self {
            html: Some(markup.into()),
            plain: None,
        }
    }
}

static ATTRIBUTE_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#".*?">"#).expect("valid attribute tail pattern"));
static TAG_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[^>]+(?:>|$)").expect("valid tag fragment pattern"));

// Elements whose contents never show up as text.
const HIDDEN: &[&str] = &["head", "script", "style", "template", "noscript"];
// Elements that end a line of visible text.
const BLOCKS: &[&str] = &["p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Reduce a clipboard payload to the plain text that gets inserted.
///
/// Rich payloads with links contribute only the link labels, joined with
/// spaces. Other rich payloads contribute their text content. Without HTML
/// the plain text is used as is. Leftover attribute tails and tag fragments
/// are stripped last.
pub fn clean_paste(payload: &ClipboardPayload) -> String {
    let text = match payload.html.as_deref().filter(|html| !html.is_empty()) {
        Some(html) => rich_text(html),
        None => payload.plain.clone().unwrap_or_default(),
    };
    let text = ATTRIBUTE_TAIL.replace_all(&text, "");
    TAG_FRAGMENT.replace_all(&text, "").into_owned()
}

fn rich_text(html: &str) -> String {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut anchors = Vec::new();
    collect_anchors(&dom.document, &mut anchors);
    if anchors.is_empty() {
        return visible_text(&dom.document).trim().to_string();
    }
    let labels: Vec<String> = anchors
        .iter()
        .map(|anchor| visible_text(anchor).trim().to_string())
        .collect();
    labels.join(" ")
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn collect_anchors(node: &Handle, anchors: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if element_name(child) == Some("a") {
            anchors.push(child.clone());
        } else {
            collect_anchors(child, anchors);
        }
    }
}

/// Rendered text of a parsed node: entities decoded, hidden elements
/// skipped, line breaks at `<br>` and after block elements.
fn visible_text(node: &Handle) -> String {
    let mut out = String::new();
    push_visible_text(node, &mut out);
    out.replace('\u{a0}', " ")
}

fn push_visible_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } => {
            let tag = &*name.local;
            if HIDDEN.contains(&tag) {
                return;
            }
            if tag == "br" {
                out.push('\n');
                return;
            }
            for child in node.children.borrow().iter() {
                push_visible_text(child, out);
            }
            if BLOCKS.contains(&tag) {
                out.push('\n');
            }
        }
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                push_visible_text(child, out);
            }
        }
        _ => {}
    }
}
