use crate::core::field_path::get_path;
use crate::domain::model::Record;
use crate::domain::ports::{RecordSource, Storage};
use crate::utils::error::{ErpError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Turns a JSON document into records. `records_path` points at the array
/// (or object) inside the document; without it the document itself is used.
pub fn extract_records(document: Value, records_path: Option<&str>) -> Result<Vec<Record>> {
    let payload = match records_path {
        Some(path) => {
            let Value::Object(obj) = document else {
                return Err(ErpError::ProcessingError {
                    message: format!("cannot follow '{}' into a non-object document", path),
                });
            };
            get_path(&obj, path)
                .cloned()
                .ok_or_else(|| ErpError::ProcessingError {
                    message: format!("records path '{}' not found in source document", path),
                })?
        }
        None => document,
    };

    match payload {
        Value::Array(items) => {
            let total = items.len();
            let records: Vec<Record> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => Some(Record::from_object(obj)),
                    _ => None,
                })
                .collect();
            if records.len() < total {
                tracing::warn!(
                    "Ignored {} non-object entries in source array",
                    total - records.len()
                );
            }
            Ok(records)
        }
        Value::Object(obj) => Ok(vec![Record::from_object(obj)]),
        other => Err(ErpError::ProcessingError {
            message: format!("expected an array or object of records, got {}", other),
        }),
    }
}

/// Reads a JSON export through the storage port.
pub struct FileSource<S: Storage> {
    storage: S,
    path: String,
    records_path: Option<String>,
}

impl<S: Storage> FileSource<S> {
    pub fn new(storage: S, path: impl Into<String>, records_path: Option<String>) -> Self {
        Self {
            storage,
            path: path.into(),
            records_path,
        }
    }
}

#[async_trait]
impl<S: Storage> RecordSource for FileSource<S> {
    fn describe(&self) -> String {
        format!("file {}", self.path)
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        tracing::debug!("Reading source file: {}", self.path);
        let bytes = self.storage.read_file(&self.path).await?;
        let document: Value = serde_json::from_slice(&bytes)?;
        extract_records(document, self.records_path.as_deref())
    }
}

/// Pulls records from an HTTP endpoint returning JSON.
pub struct ApiSource {
    client: Client,
    endpoint: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
    records_path: Option<String>,
}

impl ApiSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            timeout: None,
            records_path: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    pub fn with_records_path(mut self, records_path: Option<String>) -> Self {
        self.records_path = records_path;
        self
    }
}

#[async_trait]
impl RecordSource for ApiSource {
    fn describe(&self) -> String {
        format!("api {}", self.endpoint)
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        let mut request = self.client.get(&self.endpoint);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("📡 Making API request to: {}", self.endpoint);
        let response = request.send().await?;
        tracing::debug!("📡 API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ErpError::ProcessingError {
                message: format!("API request failed with status: {}", response.status()),
            });
        }

        let document: Value = response.json().await?;
        extract_records(document, self.records_path.as_deref())
    }
}
