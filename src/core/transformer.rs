use crate::core::field_path::{get_path, set_path};
use crate::core::filter::CompiledFilter;
use crate::domain::model::{
    FieldMapping, FieldTransform, FilterMode, Record, RecordFailure, SyncMapping, SyncOutcome,
};
use crate::utils::error::{ErpError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashSet;

/// Applies one sync mapping to source records: filter, then remap fields.
#[derive(Debug)]
pub struct SyncTransformer {
    mapping: SyncMapping,
    filters: Vec<CompiledFilter>,
}

impl SyncTransformer {
    pub fn new(mapping: SyncMapping) -> Result<Self> {
        validate_non_empty_string("mapping.name", &mapping.name)?;
        validate_non_empty_string("mapping.target_table", &mapping.target_table)?;

        if mapping.field_mappings.is_empty() {
            return Err(ErpError::mapping(&mapping.name, "no field mappings defined"));
        }

        for field in &mapping.field_mappings {
            if field.source.trim().is_empty() || field.target.trim().is_empty() {
                return Err(ErpError::mapping(
                    &mapping.name,
                    "field mappings need both a source and a target",
                ));
            }
            if let Some(FieldTransform::DateFormat { from, to }) = &field.transform {
                if from.is_empty() || to.is_empty() {
                    return Err(ErpError::mapping(
                        &mapping.name,
                        format!("date_format on '{}' needs both formats", field.source),
                    ));
                }
            }
        }

        for (i, first) in mapping.field_mappings.iter().enumerate() {
            for second in &mapping.field_mappings[i + 1..] {
                let (a, b) = (first.target.as_str(), second.target.as_str());
                if a == b {
                    return Err(ErpError::mapping(
                        &mapping.name,
                        format!("target '{}' is mapped more than once", a),
                    ));
                }
                if is_path_prefix(a, b) || is_path_prefix(b, a) {
                    return Err(ErpError::mapping(
                        &mapping.name,
                        format!("targets '{}' and '{}' overlap", a, b),
                    ));
                }
            }
        }

        let filters = mapping
            .filters
            .iter()
            .map(|condition| CompiledFilter::compile(&mapping.name, condition))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mapping, filters })
    }

    pub fn mapping(&self) -> &SyncMapping {
        &self.mapping
    }

    /// Target columns in mapping order.
    pub fn target_fields(&self) -> Vec<&str> {
        self.mapping
            .field_mappings
            .iter()
            .map(|f| f.target.as_str())
            .collect()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        match self.mapping.filter_mode {
            FilterMode::All => self.filters.iter().all(|f| f.evaluate(record)),
            FilterMode::Any => self.filters.iter().any(|f| f.evaluate(record)),
        }
    }

    pub fn transform(&self, record: &Record) -> Result<Record> {
        let mut out = Record::default();

        if self.mapping.include_unmapped {
            // Top-level keys read by a mapping or written by one are not copied.
            let consumed: HashSet<&str> = self
                .mapping
                .field_mappings
                .iter()
                .flat_map(|f| [f.source.as_str(), f.target.as_str()])
                .map(|path| path.split('.').next().unwrap_or(path))
                .collect();
            for (key, value) in &record.data {
                if !consumed.contains(key.as_str()) {
                    out.data.insert(key.clone(), value.clone());
                }
            }
        }

        for field in &self.mapping.field_mappings {
            let source = get_path(&record.data, &field.source).filter(|v| !v.is_null());
            let value = match &field.transform {
                Some(transform) => apply_transform(&self.mapping.name, field, source, transform)?,
                None => source.cloned(),
            };

            match value {
                Some(value) => set_path(&mut out.data, &field.target, value)?,
                None if field.required => {
                    return Err(ErpError::mapping(
                        &self.mapping.name,
                        format!("required field '{}' is missing", field.source),
                    ))
                }
                None => {}
            }
        }

        Ok(out)
    }

    /// Runs the whole batch; a failing record is reported and the rest continue.
    pub fn run(&self, records: &[Record]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        for (index, record) in records.iter().enumerate() {
            if !self.matches(record) {
                outcome.skipped += 1;
                continue;
            }
            match self.transform(record) {
                Ok(transformed) => outcome.transformed.push(transformed),
                Err(e) => {
                    tracing::debug!("{}: record {} rejected: {}", self.mapping.name, index, e);
                    outcome.failures.push(RecordFailure {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "🔄 {}: {} -> {} ({} transformed, {} skipped, {} failed)",
            self.mapping.name,
            self.mapping.source_table,
            self.mapping.target_table,
            outcome.transformed.len(),
            outcome.skipped,
            outcome.failures.len()
        );

        outcome
    }
}

/// `prefix` names an object that `path` writes inside of (`billing` / `billing.zip`).
fn is_path_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.'))
}

fn type_error(mapping: &str, field: &FieldMapping, expected: &str, got: &Value) -> ErpError {
    ErpError::mapping(
        mapping,
        format!("'{}' expected {}, got {}", field.source, expected, got),
    )
}

fn apply_transform(
    mapping: &str,
    field: &FieldMapping,
    source: Option<&Value>,
    transform: &FieldTransform,
) -> Result<Option<Value>> {
    if let FieldTransform::Default { value } = transform {
        return Ok(Some(source.cloned().unwrap_or_else(|| value.clone())));
    }

    let Some(value) = source else {
        return Ok(None);
    };

    let converted = match transform {
        FieldTransform::Uppercase | FieldTransform::Lowercase | FieldTransform::Trim => {
            let text = value
                .as_str()
                .ok_or_else(|| type_error(mapping, field, "a string", value))?;
            let converted = match transform {
                FieldTransform::Uppercase => text.to_uppercase(),
                FieldTransform::Lowercase => text.to_lowercase(),
                _ => text.trim().to_string(),
            };
            Value::String(converted)
        }
        FieldTransform::ToNumber => to_number(value)
            .ok_or_else(|| type_error(mapping, field, "a number", value))?,
        FieldTransform::ToString => match value {
            Value::String(s) => Value::String(s.clone()),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            other => Value::String(other.to_string()),
        },
        FieldTransform::ToBoolean => to_boolean(value)
            .map(Value::Bool)
            .ok_or_else(|| type_error(mapping, field, "a boolean", value))?,
        FieldTransform::DateFormat { from, to } => {
            let text = value
                .as_str()
                .ok_or_else(|| type_error(mapping, field, "a date string", value))?;
            Value::String(reformat_date(text, from, to).ok_or_else(|| {
                ErpError::mapping(
                    mapping,
                    format!("'{}' value '{}' does not match format '{}'", field.source, text, from),
                )
            })?)
        }
        FieldTransform::Lookup { table, fallback } => {
            let key = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            match (table.get(&key), fallback) {
                (Some(found), _) => found.clone(),
                (None, Some(fallback)) => fallback.clone(),
                (None, None) => {
                    return Err(ErpError::mapping(
                        mapping,
                        format!("no lookup entry for '{}' in '{}'", key, field.source),
                    ))
                }
            }
        }
        FieldTransform::Default { .. } => value.clone(),
    };

    Ok(Some(converted))
}

fn to_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::Bool(b) => Some(Value::from(u8::from(*b))),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Value::from(i))
            } else {
                s.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
            }
        }
        _ => None,
    }
}

fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn reformat_date(text: &str, from: &str, to: &str) -> Option<String> {
    if let Ok(date) = NaiveDate::parse_from_str(text.trim(), from) {
        return Some(date.format(to).to_string());
    }
    NaiveDateTime::parse_from_str(text.trim(), from)
        .ok()
        .map(|dt| dt.format(to).to_string())
}
