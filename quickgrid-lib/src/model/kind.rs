//! Value kinds and categories

use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Value;
use super::types::EnumMember;

/// The declared data type of a column.
///
/// A closed set: each kind maps to one [`ValueCategory`], one parser and one
/// default value. Columns resolve all three when they are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Enumeration,
    Date,
    Time,
    DateTime,
    Duration,
    Guid,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 11] = [
        ValueKind::Text,
        ValueKind::Integer,
        ValueKind::Float,
        ValueKind::Decimal,
        ValueKind::Boolean,
        ValueKind::Enumeration,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::DateTime,
        ValueKind::Duration,
        ValueKind::Guid,
    ];

    /// Looks a kind up by its [`name`](Self::name), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Returns the filter category of this kind.
    pub fn category(self) -> ValueCategory {
        match self {
            ValueKind::Text => ValueCategory::String,
            ValueKind::Integer | ValueKind::Float | ValueKind::Decimal => ValueCategory::Numeric,
            ValueKind::Boolean => ValueCategory::Boolean,
            ValueKind::Enumeration => ValueCategory::Enumeration,
            ValueKind::Date | ValueKind::Time | ValueKind::DateTime | ValueKind::Duration => {
                ValueCategory::Temporal
            }
            ValueKind::Guid => ValueCategory::Identifier,
        }
    }

    /// Returns the value a missing field is replaced with under the
    /// null-default policy.
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Text => Value::String(String::new()),
            ValueKind::Integer => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Decimal => Value::Decimal(Decimal::ZERO),
            ValueKind::Boolean => Value::Bool(false),
            ValueKind::Enumeration => Value::Enum(EnumMember::new(0)),
            ValueKind::Date => Value::Date(NaiveDate::default()),
            ValueKind::Time => Value::Time(NaiveTime::default()),
            ValueKind::DateTime => Value::DateTime(DateTime::default()),
            ValueKind::Duration => Value::Duration(TimeDelta::zero()),
            ValueKind::Guid => Value::Guid(Uuid::nil()),
        }
    }

    /// Returns the name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Decimal => "decimal",
            ValueKind::Boolean => "boolean",
            ValueKind::Enumeration => "enumeration",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "datetime",
            ValueKind::Duration => "duration",
            ValueKind::Guid => "guid",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification used to select the operators a column offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    String,
    Numeric,
    Boolean,
    Enumeration,
    Temporal,
    Identifier,
}

impl ValueCategory {
    /// Returns `true` for categories with a total order (numbers, dates).
    pub fn is_ordered(self) -> bool {
        matches!(self, ValueCategory::Numeric | ValueCategory::Temporal)
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueCategory::String => "string",
            ValueCategory::Numeric => "numeric",
            ValueCategory::Boolean => "boolean",
            ValueCategory::Enumeration => "enumeration",
            ValueCategory::Temporal => "temporal",
            ValueCategory::Identifier => "identifier",
        };
        f.write_str(name)
    }
}
