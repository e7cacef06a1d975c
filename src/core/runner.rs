use crate::core::export::build_bundle;
use crate::core::transformer::SyncTransformer;
use crate::domain::ports::{RecordSource, Storage};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub mapping: String,
    pub bundle_path: String,
    pub fetched: usize,
    pub transformed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Extract from a source, transform through one mapping, load a bundle
/// into storage.
pub struct SyncRunner<R: RecordSource, S: Storage> {
    source: R,
    storage: S,
    transformer: SyncTransformer,
    bundle_name: String,
}

impl<R: RecordSource, S: Storage> SyncRunner<R, S> {
    pub fn new(source: R, storage: S, transformer: SyncTransformer) -> Self {
        let bundle_name = format!("{}_sync.zip", transformer.mapping().target_table);
        Self {
            source,
            storage,
            transformer,
            bundle_name,
        }
    }

    pub fn with_bundle_name(mut self, bundle_name: impl Into<String>) -> Self {
        self.bundle_name = bundle_name.into();
        self
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let mapping = self.transformer.mapping();
        tracing::info!("Starting sync '{}' from {}", mapping.name, self.source.describe());

        let records = self.source.fetch().await?;
        tracing::info!("Extracted {} records", records.len());

        let outcome = self.transformer.run(&records);
        for failure in &outcome.failures {
            tracing::warn!("Record {} failed: {}", failure.index, failure.reason);
        }

        let columns = self.transformer.target_fields();
        let bundle = build_bundle(&mapping.target_table, &columns, &outcome)?;
        tracing::debug!("Writing bundle ({} bytes) to storage", bundle.len());
        self.storage.write_file(&self.bundle_name, &bundle).await?;
        tracing::info!("📁 Output saved to: {}", self.bundle_name);

        Ok(SyncReport {
            mapping: mapping.name.clone(),
            bundle_path: self.bundle_name.clone(),
            fetched: records.len(),
            transformed: outcome.transformed.len(),
            skipped: outcome.skipped,
            failed: outcome.failures.len(),
        })
    }
}
