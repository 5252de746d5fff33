//! Lenient decoding of note frontmatter.
//!
//! Frontmatter is written by hand, so every accessor accepts the shapes which
//! commonly occur in practice and returns `None` for anything else:
//!
//!  - numbers may be JSON numbers or numeric strings,
//!  - flags may be booleans or the strings `"true"` and `"false"`,
//!  - dates may be plain dates or date-times, and a separate time of day
//!    (`HH:MM` or `HH:MM:SS`) overrides the time of the date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Value};

use liftnote_domain as domain;

pub type Frontmatter = Map<String, Value>;

#[must_use]
pub fn string(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[must_use]
pub fn flag(frontmatter: &Frontmatter, key: &str) -> bool {
    match frontmatter.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn number_string(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Numbers with a zero fraction like `5.0` or `"5.00"` are accepted for
/// integer quantities.
fn integer_string(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    let value = number_string(frontmatter, key)?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number.fract() == 0.0 && number >= 0.0 => {
            Some(format!("{number:.0}"))
        }
        _ => Some(value),
    }
}

#[must_use]
pub fn weight(frontmatter: &Frontmatter, key: &str) -> Option<domain::Weight> {
    domain::Weight::try_from(number_string(frontmatter, key)?.as_str()).ok()
}

#[must_use]
pub fn reps(frontmatter: &Frontmatter, key: &str) -> Option<domain::Reps> {
    domain::Reps::try_from(integer_string(frontmatter, key)?.as_str()).ok()
}

#[must_use]
pub fn time(frontmatter: &Frontmatter, key: &str) -> Option<domain::Time> {
    domain::Time::try_from(integer_string(frontmatter, key)?.as_str()).ok()
}

#[must_use]
pub fn effort(frontmatter: &Frontmatter, key: &str) -> Option<domain::Effort> {
    domain::Effort::try_from(integer_string(frontmatter, key)?.as_str()).ok()
}

#[must_use]
pub fn string_list(frontmatter: &Frontmatter, key: &str) -> Vec<String> {
    match frontmatter.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => vec![],
    }
}

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[must_use]
pub fn date(frontmatter: &Frontmatter, key: &str) -> Option<NaiveDate> {
    parse_date_time(&string(frontmatter, key)?).map(|t| t.date())
}

/// Timestamp of a logged set from its `date` and optional `time` fields.
///
/// A `time` without a date falls back to the given default date.
#[must_use]
pub fn timestamp(
    frontmatter: &Frontmatter,
    default_date: Option<NaiveDate>,
) -> Option<NaiveDateTime> {
    let date_time = string(frontmatter, "date").and_then(|d| parse_date_time(&d));
    let time = string(frontmatter, "time").and_then(|t| parse_time(&t));
    match (date_time, time) {
        (Some(date_time), Some(time)) => Some(date_time.date().and_time(time)),
        (Some(date_time), None) => Some(date_time),
        (None, Some(time)) => default_date.map(|date| date.and_time(time)),
        (None, None) => None,
    }
}
