//! Dot-notation access into record fields (`consignee.address.city`,
//! `containers.0.number`).

use crate::utils::error::{ErpError, Result};
use serde_json::{Map, Value};

pub fn get_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(obj) => obj.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate objects as needed.
pub fn set_path(data: &mut Map<String, Value>, path: &str, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ErpError::validation(format!("invalid field path '{}'", path)));
    }

    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return Err(ErpError::validation("empty field path")),
    };
    if parents.is_empty() {
        data.insert((*last).to_string(), value);
        return Ok(());
    }

    let mut current = data
        .entry(parents[0].to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    for depth in 1..=parents.len() {
        let obj = match current {
            Value::Object(obj) => obj,
            _ => {
                return Err(ErpError::validation(format!(
                    "cannot write '{}': '{}' is not an object",
                    path,
                    parents[..depth].join(".")
                )))
            }
        };
        if depth == parents.len() {
            obj.insert((*last).to_string(), value);
            return Ok(());
        }
        current = obj
            .entry(parents[depth].to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Ok(())
}
