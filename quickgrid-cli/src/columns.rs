//! Column and filter specs for JSON records

use quickgrid_lib::model::Column;
use quickgrid_lib::model::Value;
use quickgrid_lib::model::ValueKind;
use quickgrid_lib::model::types::EnumMember;
use quickgrid_lib::query::FilterOperator;
use quickgrid_lib::query::coerce;
use rust_decimal::Decimal;
use serde_json::Map;

use crate::error::CliError;

/// One input record.
pub type Record = Map<String, serde_json::Value>;

/// Parses `NAME=KIND[?][:A|B|C]` into a sortable, filterable column.
pub fn parse_column(spec: &str, multi_sort: bool, max_filters: Option<usize>) -> Result<Column<Record>, CliError> {
    let (name, rest) = spec
        .split_once('=')
        .ok_or_else(|| CliError::column(spec, "expected NAME=KIND"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::column(spec, "empty name"));
    }
    let (kind, members) = match rest.split_once(':') {
        Some((kind, members)) => (kind, members.split('|').map(str::trim).collect::<Vec<_>>()),
        None => (rest, Vec::new()),
    };
    let (kind, nullable) = match kind.trim().strip_suffix('?') {
        Some(kind) => (kind, true),
        None => (kind.trim(), false),
    };
    let kind = ValueKind::from_name(kind).ok_or_else(|| CliError::column(spec, "unknown kind"))?;
    if kind == ValueKind::Enumeration && members.is_empty() {
        return Err(CliError::column(spec, "enumeration needs :A|B|C members"));
    }

    // Parses JSON strings the same way filter input is parsed.
    let probe = Column::<()>::property(name, kind, |_: &()| Value::Null).members(members.iter().copied());
    let field = name.to_string();
    let mut column = Column::property(name, kind, move |record: &Record| {
        record.get(&field).map(|v| json_to_value(v, &probe)).unwrap_or_default()
    })
    .members(members)
    .sortable()
    .filterable();
    if nullable {
        column = column.nullable();
    }
    if multi_sort {
        column = column.multi_sort();
    }
    if let Some(max) = max_filters {
        column = column.max_filters(max);
    }
    Ok(column)
}

fn json_to_value(json: &serde_json::Value, probe: &Column<()>) -> Value {
    let kind = probe.value_kind();
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match kind {
            ValueKind::Enumeration => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(|ordinal| Value::Enum(EnumMember::new(ordinal)))
                .unwrap_or_default(),
            ValueKind::Decimal => n
                .to_string()
                .parse::<Decimal>()
                .map(Value::Decimal)
                .unwrap_or_default(),
            ValueKind::Float => n.as_f64().map(Value::Float).unwrap_or_default(),
            _ => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or_default(),
            },
        },
        serde_json::Value::String(s) if kind == ValueKind::Text => Value::String(s.clone()),
        serde_json::Value::String(s) => match coerce(probe, s) {
            Ok(Some(value)) => value,
            Ok(None) => Value::Null,
            Err(e) => {
                log::warn!("{}", e);
                Value::Null
            }
        },
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            log::warn!("Column '{}': nested JSON is not a cell value", probe.id());
            Value::Null
        }
    }
}

/// A parsed `COLUMN:OPERATOR[:VALUE]` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Option<String>,
}

/// Parses `COLUMN:OPERATOR[:VALUE]`. The value may itself contain `:`.
pub fn parse_filter(spec: &str) -> Result<FilterSpec, CliError> {
    let mut parts = spec.splitn(3, ':');
    let column = parts.next().map(str::trim).unwrap_or_default();
    let operator = parts
        .next()
        .ok_or_else(|| CliError::filter(spec, "expected COLUMN:OPERATOR[:VALUE]"))?;
    if column.is_empty() {
        return Err(CliError::filter(spec, "empty column"));
    }
    let operator = parse_operator(operator).ok_or_else(|| CliError::filter(spec, "unknown operator"))?;
    Ok(FilterSpec {
        column: column.to_string(),
        operator,
        value: parts.next().map(str::to_string),
    })
}

fn parse_operator(name: &str) -> Option<FilterOperator> {
    let op = match name.trim().to_ascii_lowercase().as_str() {
        "contains" => FilterOperator::Contains,
        "starts_with" | "startswith" => FilterOperator::StartsWith,
        "ends_with" | "endswith" => FilterOperator::EndsWith,
        "eq" | "equal" | "=" | "==" => FilterOperator::Equal,
        "ne" | "not_equal" | "!=" => FilterOperator::NotEqual,
        "gt" | "greater_than" | ">" => FilterOperator::GreaterThan,
        "ge" | "greater_than_or_equal" | ">=" => FilterOperator::GreaterThanOrEqual,
        "lt" | "less_than" | "<" => FilterOperator::LessThan,
        "le" | "less_than_or_equal" | "<=" => FilterOperator::LessThanOrEqual,
        _ => return None,
    };
    Some(op)
}
