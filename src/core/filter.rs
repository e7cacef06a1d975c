use crate::core::field_path::get_path;
use crate::domain::model::{FilterCondition, FilterOp, Record};
use crate::utils::error::{ErpError, Result};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug)]
enum Predicate {
    Compare(FilterOp, Value),
    OneOf { values: Vec<Value>, negate: bool },
    Contains(Value),
    StartsWith(String),
    IsNull,
    IsNotNull,
    Matches(Regex),
}

/// A filter condition checked once at load time and evaluated per record.
#[derive(Debug)]
pub struct CompiledFilter {
    field: String,
    predicate: Predicate,
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Numbers compare numerically (numeric strings included when the other
/// side is a number), strings lexically, booleans false < true.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(_), _) | (_, Value::Number(_)) => {
            as_number(left)?.partial_cmp(&as_number(right)?)
        }
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match compare_values(left, right) {
        Some(ordering) => ordering == Ordering::Equal,
        None => left == right,
    }
}

fn require_value(mapping: &str, condition: &FilterCondition) -> Result<Value> {
    condition.value.clone().ok_or_else(|| {
        ErpError::mapping(
            mapping,
            format!("filter on '{}' ({:?}) needs a value", condition.field, condition.op),
        )
    })
}

impl CompiledFilter {
    pub fn compile(mapping: &str, condition: &FilterCondition) -> Result<Self> {
        if condition.field.trim().is_empty() {
            return Err(ErpError::mapping(mapping, "filter field cannot be empty"));
        }

        let predicate = match condition.op {
            FilterOp::Eq
            | FilterOp::Ne
            | FilterOp::Gt
            | FilterOp::Gte
            | FilterOp::Lt
            | FilterOp::Lte => Predicate::Compare(condition.op, require_value(mapping, condition)?),
            FilterOp::In | FilterOp::NotIn => match require_value(mapping, condition)? {
                Value::Array(values) => Predicate::OneOf {
                    values,
                    negate: condition.op == FilterOp::NotIn,
                },
                other => {
                    return Err(ErpError::mapping(
                        mapping,
                        format!("filter on '{}' expects a list, got {}", condition.field, other),
                    ))
                }
            },
            FilterOp::Contains => Predicate::Contains(require_value(mapping, condition)?),
            FilterOp::StartsWith => match require_value(mapping, condition)? {
                Value::String(prefix) => Predicate::StartsWith(prefix),
                other => {
                    return Err(ErpError::mapping(
                        mapping,
                        format!("starts_with on '{}' expects a string, got {}", condition.field, other),
                    ))
                }
            },
            FilterOp::IsNull => Predicate::IsNull,
            FilterOp::IsNotNull => Predicate::IsNotNull,
            FilterOp::Matches => match require_value(mapping, condition)? {
                Value::String(pattern) => Predicate::Matches(Regex::new(&pattern).map_err(|e| {
                    ErpError::mapping(
                        mapping,
                        format!("invalid pattern for '{}': {}", condition.field, e),
                    )
                })?),
                other => {
                    return Err(ErpError::mapping(
                        mapping,
                        format!("matches on '{}' expects a string, got {}", condition.field, other),
                    ))
                }
            },
        };

        Ok(Self {
            field: condition.field.clone(),
            predicate,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Missing fields evaluate as null.
    pub fn evaluate(&self, record: &Record) -> bool {
        let actual = get_path(&record.data, &self.field).unwrap_or(&Value::Null);

        match &self.predicate {
            Predicate::Compare(op, expected) => match op {
                FilterOp::Eq => values_equal(actual, expected),
                FilterOp::Ne => !values_equal(actual, expected),
                _ => match compare_values(actual, expected) {
                    Some(ordering) => match op {
                        FilterOp::Gt => ordering == Ordering::Greater,
                        FilterOp::Gte => ordering != Ordering::Less,
                        FilterOp::Lt => ordering == Ordering::Less,
                        FilterOp::Lte => ordering != Ordering::Greater,
                        _ => false,
                    },
                    None => false,
                },
            },
            Predicate::OneOf { values, negate } => {
                let found = values.iter().any(|v| values_equal(actual, v));
                found != *negate
            }
            Predicate::Contains(needle) => match (actual, needle) {
                (Value::String(hay), Value::String(n)) => hay.contains(n.as_str()),
                (Value::Array(items), n) => items.iter().any(|item| values_equal(item, n)),
                _ => false,
            },
            Predicate::StartsWith(prefix) => actual
                .as_str()
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Predicate::IsNull => actual.is_null(),
            Predicate::IsNotNull => !actual.is_null(),
            Predicate::Matches(re) => actual.as_str().is_some_and(|s| re.is_match(s)),
        }
    }
}
