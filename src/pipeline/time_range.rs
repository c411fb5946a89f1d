use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Time;

use super::Document;

const MINUTES_PER_DAY: u32 = 24 * 60;
pub const NEXT_DAY_MARKER: &str = "⁺¹";

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]{1,4}[ap])-([0-9]{1,4}[ap])").expect("valid time range pattern")
});

const CLOCK: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

pub fn apply(document: Document) -> Document {
    document.map_text(|text| normalize(text))
}

/// Rewrite compact ranges such as `930a-145p` into `9:30 AM — 1:45 PM`,
/// marking ranges that end on the next day.
pub fn normalize(text: &str) -> String {
    TIME_RANGE
        .replace_all(text, |caps: &Captures| {
            let start = parse_endpoint(&caps[1]);
            let end = parse_endpoint(&caps[2]);
            let next_day = if end < start { NEXT_DAY_MARKER } else { "" };
            format!("{} — {}{next_day}", clock_label(start), clock_label(end))
        })
        .into_owned()
}

/// Parse `<digits><a|p>`. Values past the clock wrap around the day.
pub fn parse_endpoint(token: &str) -> Time {
    let (digits, period) = token.split_at(token.len().saturating_sub(1));
    let pm = period.eq_ignore_ascii_case("p");
    let (hours, minutes) = if digits.len() > 2 {
        digits.split_at(digits.len() - 2)
    } else {
        (digits, "0")
    };
    let mut hours: u32 = hours.parse().unwrap_or(0);
    let minutes: u32 = minutes.parse().unwrap_or(0);
    if pm && hours != 12 {
        hours += 12;
    }
    if !pm && hours == 12 {
        hours = 0;
    }
    let total = (hours * 60 + minutes) % MINUTES_PER_DAY;
    Time::from_hms((total / 60) as u8, (total % 60) as u8, 0).unwrap_or(Time::MIDNIGHT)
}

fn clock_label(time: Time) -> String {
    time.format(CLOCK).unwrap_or_default()
}
