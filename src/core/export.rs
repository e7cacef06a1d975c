use crate::core::field_path::get_path;
use crate::domain::model::{Record, SyncOutcome};
use crate::utils::error::{ErpError, Result};
use serde_json::Value;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// One row per record, one column per target field.
pub fn records_to_csv(columns: &[&str], records: &[Record]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| cell(get_path(&record.data, c))))?;
    }
    let bytes = writer.into_inner().map_err(|e| ErpError::ProcessingError {
        message: format!("failed to finish CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| ErpError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// Zip archive with `<table>.csv`, `<table>.json` and, when records were
/// rejected, `failures.json`.
pub fn build_bundle(table: &str, columns: &[&str], outcome: &SyncOutcome) -> Result<Vec<u8>> {
    let csv_output = records_to_csv(columns, &outcome.transformed)?;
    let json_rows: Vec<Value> = outcome.transformed.iter().map(Record::to_json).collect();

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(format!("{}.csv", table), FileOptions::default())?;
    zip.write_all(csv_output.as_bytes())?;

    zip.start_file::<_, ()>(format!("{}.json", table), FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(&json_rows)?.as_bytes())?;

    if !outcome.failures.is_empty() {
        zip.start_file::<_, ()>("failures.json", FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&outcome.failures)?.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
