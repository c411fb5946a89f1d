use super::{Document, Markup, Segment};

/// Split raw text into bullet and sub-bullet items. Blank lines are dropped.
pub fn format_lines(input: &str) -> Document {
    let mut segments = Vec::new();
    for line in input.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !segments.is_empty() {
            segments.push(Segment::Markup(Markup::Separator));
        }
        match line.strip_prefix('-') {
            Some(rest) => {
                segments.push(Segment::Markup(Markup::SubBullet));
                push_text(&mut segments, rest.trim_start());
            }
            None => {
                segments.push(Segment::Markup(Markup::Bullet));
                push_text(&mut segments, line);
            }
        }
    }
    Document::from_segments(segments)
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_lines_become_sub_items() {
        let html = format_lines("top\n-  nested").to_html();
        assert_eq!(html, "• top\n<br>&emsp;— nested");
    }

    #[test]
    fn blank_lines_emit_nothing() {
        let html = format_lines("\n\n  first  \n\n\n second\n   \n").to_html();
        assert_eq!(html, "• first\n• second");
    }

    #[test]
    fn crlf_input_is_trimmed() {
        let html = format_lines("one\r\n-two\r\n").to_html();
        assert_eq!(html, "• one\n<br>&emsp;— two");
    }

    #[test]
    fn empty_input_gives_empty_document() {
        assert!(format_lines("   \n  ").is_empty());
    }
}
