use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Document;

static AGE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)age\((.+?)\)").expect("valid age pattern"));

pub fn apply(document: Document) -> Document {
    document.map_text(|text| expand(text))
}

/// Expand `age(lo-hi)` / `age(lo,hi)` / `age(n)` into a readable requirement.
/// Bounds are not validated; `age(30-5)` expands as written.
pub fn expand(text: &str) -> String {
    AGE_RANGE
        .replace_all(text, |caps: &Captures| {
            let bounds: Vec<f64> = caps[1].split(['-', ',']).map(parse_bound).collect();
            match bounds.as_slice() {
                [lo, hi] => format!(
                    "Age requirement: {}-{} (until your {}th birthday)",
                    format_bound(*lo),
                    format_bound(*hi),
                    format_bound(hi + 1.0)
                ),
                _ => format!(
                    "Age requirement: {}+",
                    format_bound(bounds.first().copied().unwrap_or(f64::NAN))
                ),
            }
        })
        .into_owned()
}

// Empty tokens count as zero and garbage as NaN.
fn parse_bound(token: &str) -> f64 {
    let token = token.trim();
    if token.is_empty() {
        return 0.0;
    }
    token.parse().unwrap_or(f64::NAN)
}

fn format_bound(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let label = if value > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
