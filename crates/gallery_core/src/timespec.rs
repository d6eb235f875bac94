//! Human duration expressions.
//!
//! Parses strings such as `"2d 3h"`, `"1 hour and 30 minutes"` or `"90"` into
//! seconds, and renders seconds back into one of three styles. Formatting
//! decomposes greedily from weeks down, so any remainder smaller than one
//! second is simply gone (truncation, not rounding).

use gallery_error::{TimeSpecError, TimeSpecErrorKind};
use regex::Regex;
use std::sync::LazyLock;

/// Unit names (long, short, micro) and their length in seconds, largest first.
///
/// Unit tokens match an entry when they are a prefix of any of its names, and
/// the first matching entry wins.
pub const UNIT_TABLE: [([&str; 3], u64); 5] = [
    (["weeks", "wks", "w"], 60 * 60 * 24 * 7),
    (["days", "dys", "d"], 60 * 60 * 24),
    (["hours", "hrs", "h"], 60 * 60),
    (["minutes", "mins", "m"], 60),
    (["seconds", "secs", "s"], 1),
];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9.]+)\s*([^0-9\s,;]*)").expect("duration token pattern is valid")
});

/// How [`format_duration`] spells units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DurationStyle {
    /// `2 days, 3 hours and 1 minute`
    #[default]
    Long,
    /// `2dys, 3hrs and 1min`
    Short,
    /// `2d3h1m`
    Micro,
}

impl DurationStyle {
    fn component(self, n: u64, names: &[&str; 3]) -> String {
        let rendered = match self {
            Self::Long => format!("{} {}", n, names[0]),
            Self::Short => format!("{}{}", n, names[1]),
            Self::Micro => return format!("{}{}", n, names[2]),
        };
        if n == 1 {
            rendered.trim_end_matches('s').to_string()
        } else {
            rendered
        }
    }
}

/// Parse a duration expression into whole seconds.
///
/// # Errors
///
/// - `InvalidUnit` when a unit, or any stray text between tokens, matches no
///   entry of [`UNIT_TABLE`]
/// - `InvalidNumber` when a number has more than one decimal point or no
///   digits, or the input is blank
///
/// # Examples
///
/// ```
/// use gallery_core::parse_duration;
///
/// assert_eq!(parse_duration("2d").unwrap(), 172_800);
/// assert_eq!(parse_duration("1h30m").unwrap(), 5_400);
/// assert_eq!(parse_duration("90").unwrap(), 90);
/// assert!(parse_duration("abc").unwrap_err().is_invalid_unit());
/// assert!(parse_duration("1.2.3h").unwrap_err().is_invalid_number());
/// ```
pub fn parse_duration(text: &str) -> Result<u64, TimeSpecError> {
    let text = text.trim().to_lowercase();

    if text.is_empty() {
        return Err(TimeSpecError::new(TimeSpecErrorKind::InvalidNumber(text)));
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<u64>()
            .map_err(|_| TimeSpecError::new(TimeSpecErrorKind::InvalidNumber(text.clone())));
    }

    let mut total = 0.0_f64;
    let mut cursor = 0;

    for caps in TOKEN.captures_iter(&text) {
        let (Some(whole), Some(number), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        check_separators(&text[cursor..whole.start()])?;
        cursor = whole.end();
        total += token_seconds(number.as_str(), unit.as_str())?;
    }
    check_separators(&text[cursor..])?;

    tracing::trace!(input = %text, seconds = total, "Parsed duration");
    Ok(total.floor() as u64)
}

/// Render seconds as a human duration.
///
/// # Examples
///
/// ```
/// use gallery_core::{DurationStyle, format_duration};
///
/// assert_eq!(format_duration(93_784, DurationStyle::Long), "1 day, 2 hours, 3 minutes and 4 seconds");
/// assert_eq!(format_duration(3_600, DurationStyle::Short), "1hr");
/// assert_eq!(format_duration(5_400, DurationStyle::Micro), "1h30m");
/// ```
pub fn format_duration(seconds: u64, style: DurationStyle) -> String {
    let mut remaining = seconds;
    let mut parts = Vec::new();

    for (names, length) in &UNIT_TABLE {
        let n = remaining / length;
        remaining %= length;
        if n > 0 {
            parts.push(style.component(n, names));
        }
    }

    match (parts.pop(), style) {
        (None, _) => style.component(0, &UNIT_TABLE[UNIT_TABLE.len() - 1].0),
        (Some(last), _) if parts.is_empty() => last,
        (Some(last), DurationStyle::Micro) => parts.concat() + &last,
        (Some(last), _) => format!("{} and {}", parts.join(", "), last),
    }
}

fn check_separators(gap: &str) -> Result<(), TimeSpecError> {
    let stray: Vec<&str> = gap
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|word| !word.is_empty() && *word != "and")
        .collect();

    if stray.is_empty() {
        Ok(())
    } else {
        Err(TimeSpecError::new(TimeSpecErrorKind::InvalidUnit(
            stray.join(" "),
        )))
    }
}

fn token_seconds(number: &str, unit: &str) -> Result<f64, TimeSpecError> {
    let length = unit_length(unit)?;

    if number.matches('.').count() > 1 || number.replace('.', "").is_empty() {
        return Err(TimeSpecError::new(TimeSpecErrorKind::InvalidNumber(
            number.to_string(),
        )));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| TimeSpecError::new(TimeSpecErrorKind::InvalidNumber(number.to_string())))?;

    Ok(value * length as f64)
}

fn unit_length(unit: &str) -> Result<u64, TimeSpecError> {
    // A bare number, or one followed by the separator word, counts as seconds.
    if unit.is_empty() || unit == "and" {
        return Ok(1);
    }

    UNIT_TABLE
        .iter()
        .find(|(names, _)| names.iter().any(|name| name.starts_with(unit)))
        .map(|(_, length)| *length)
        .ok_or_else(|| TimeSpecError::new(TimeSpecErrorKind::InvalidUnit(unit.to_string())))
}
