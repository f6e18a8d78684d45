//! Operand coercion.
//!
//! Turns the raw text a user typed into a filter box into a typed [`Value`]
//! for the column's kind. Empty input means "no operand", which the node
//! builder turns into a comparison against null.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ParseError;
use crate::model::Column;
use crate::model::Value;
use crate::model::ValueKind;
use crate::model::types::EnumMember;

/// Parses trimmed, non-empty input. The slice holds enumeration members.
pub(crate) type ParseFn = fn(&str, &[String]) -> Option<Value>;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Returns the parser for a value kind.
pub(crate) fn parser_for(kind: ValueKind) -> ParseFn {
    match kind {
        ValueKind::Text => parse_text,
        ValueKind::Integer => parse_integer,
        ValueKind::Float => parse_float,
        ValueKind::Decimal => parse_decimal,
        ValueKind::Boolean => parse_bool,
        ValueKind::Enumeration => parse_enum,
        ValueKind::Date => parse_date,
        ValueKind::Time => parse_time,
        ValueKind::DateTime => parse_datetime,
        ValueKind::Duration => parse_duration,
        ValueKind::Guid => parse_guid,
    }
}

/// Coerces raw input into an operand for `column`.
///
/// Returns `Ok(None)` for empty input. Text columns keep surrounding
/// whitespace; every other kind is trimmed first.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::{Column, Value, ValueKind};
/// use quickgrid_lib::query::coerce;
///
/// struct Row { age: i32 }
/// let age = Column::property("Age", ValueKind::Integer, |r: &Row| r.age);
///
/// assert_eq!(coerce(&age, " 42 ").unwrap(), Some(Value::Int(42)));
/// assert_eq!(coerce(&age, "").unwrap(), None);
/// assert!(coerce(&age, "forty").is_err());
/// ```
pub fn coerce<T>(column: &Column<T>, raw: &str) -> Result<Option<Value>, ParseError> {
    let input = match column.kind {
        ValueKind::Text => raw,
        _ => raw.trim(),
    };
    if input.is_empty() {
        return Ok(None);
    }
    (column.parse)(input, &column.members)
        .map(Some)
        .ok_or_else(|| ParseError::new(column.id.as_str(), raw, column.kind.name()))
}

fn parse_text(raw: &str, _: &[String]) -> Option<Value> {
    Some(Value::String(raw.to_string()))
}

fn parse_integer(raw: &str, _: &[String]) -> Option<Value> {
    raw.parse::<i64>().ok().map(Value::Int)
}

fn parse_float(raw: &str, _: &[String]) -> Option<Value> {
    raw.parse::<f64>().ok().map(Value::Float)
}

fn parse_decimal(raw: &str, _: &[String]) -> Option<Value> {
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .map(Value::Decimal)
}

fn parse_bool(raw: &str, _: &[String]) -> Option<Value> {
    if raw.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

fn parse_enum(raw: &str, members: &[String]) -> Option<Value> {
    let ordinal = members.iter().position(|m| m == raw)?;
    let ordinal = i32::try_from(ordinal).ok()?;
    Some(Value::Enum(EnumMember::named(ordinal, raw)))
}

fn parse_date(raw: &str, _: &[String]) -> Option<Value> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Value::Date)
}

fn parse_time(raw: &str, _: &[String]) -> Option<Value> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .map(Value::Time)
}

fn parse_datetime(raw: &str, _: &[String]) -> Option<Value> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Value::DateTime(dt.with_timezone(&Utc)));
    }
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::default()))
        })?;
    Some(Value::DateTime(naive.and_utc()))
}

/// `[-][d.]hh:mm[:ss[.fffffffff]]`, or a bare day count.
fn parse_duration(raw: &str, _: &[String]) -> Option<Value> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if !body.contains(':') {
        let days = body.parse::<i64>().ok()?;
        let delta = TimeDelta::try_days(days)?;
        return Some(Value::Duration(if negative { -delta } else { delta }));
    }

    let (days, clock) = match body.split_once('.') {
        Some((days, clock)) if !days.contains(':') => (days.parse::<i64>().ok()?, clock),
        _ => (0, body),
    };

    let mut parts = clock.split(':');
    let hours = parts.next()?.parse::<i64>().ok()?;
    let minutes = parts.next()?.parse::<i64>().ok()?;
    let (seconds, nanos) = match parts.next() {
        Some(seconds) => parse_seconds(seconds)?,
        None => (0, 0),
    };
    if parts.next().is_some() || !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    let delta = TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::try_seconds(hours * 3600 + minutes * 60 + seconds)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(Value::Duration(if negative { -delta } else { delta }))
}

fn parse_seconds(raw: &str) -> Option<(i64, i64)> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    let seconds = whole.parse::<i64>().ok()?;
    if !(0..60).contains(&seconds) || fraction.len() > 9 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let nanos = if fraction.is_empty() {
        0
    } else {
        format!("{:0<9}", fraction).parse::<i64>().ok()?
    };
    Some((seconds, nanos))
}

fn parse_guid(raw: &str, _: &[String]) -> Option<Value> {
    Uuid::parse_str(raw).ok().map(Value::Guid)
}
