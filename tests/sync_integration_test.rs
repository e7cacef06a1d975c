use anyhow::Result;
use erp_rules::core::sources::{ApiSource, FileSource};
use erp_rules::utils::validation::Validate;
use erp_rules::{LocalStorage, SyncConfig, SyncRunner};
use httpmock::prelude::*;
use std::io::Read;
use tempfile::TempDir;

fn read_entry(bundle: &[u8], name: &str) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bundle.to_vec()))?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}

/// File export -> customer mapping -> zip bundle on disk
#[tokio::test]
async fn test_file_sync_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;

    tokio::fs::write(
        temp_dir.path().join("customers.json"),
        serde_json::to_vec(&serde_json::json!({
            "data": [
                {"cust_code": "c-001", "cust_name": " PT Samudera ", "status": "active",
                 "address": {"city": "Surabaya"}, "joined": "01/02/2024"},
                {"cust_code": "c-002", "cust_name": "CV Lama", "status": "deleted"},
                {"cust_name": "Tanpa Kode", "status": "active"},
                {"cust_code": "c-004", "cust_name": "PT Baru", "status": "prospect",
                 "joined": "2024-13-01"}
            ]
        }))?,
    )
    .await?;

    let config_content = r#"
[sync]
name = "customer-sync"

[source]
type = "file"
path = "customers.json"
records_path = "data"

[load]
output_path = "out"

[mapping]
name = "customers"
source_table = "legacy_customers"
target_table = "customers"

[[mapping.field_mappings]]
source = "cust_code"
target = "code"
required = true
transform = { type = "uppercase" }

[[mapping.field_mappings]]
source = "cust_name"
target = "name"
transform = { type = "trim" }

[[mapping.field_mappings]]
source = "address.city"
target = "billing.city"

[[mapping.field_mappings]]
source = "joined"
target = "joined_on"
transform = { type = "date_format", from = "%d/%m/%Y", to = "%Y-%m-%d" }

[[mapping.filters]]
field = "status"
op = "in"
value = ["active", "prospect"]
"#;

    let config_path = temp_dir.path().join("sync.toml");
    tokio::fs::write(&config_path, config_content).await?;
    let config = SyncConfig::from_file(&config_path)?;
    config.validate()?;

    let source = FileSource::new(
        LocalStorage::new(config.source_root()),
        config.source.path.clone().unwrap(),
        config.source.records_path.clone(),
    );
    assert_eq!(config.output_dir(), temp_dir.path().join("out"));
    let storage = LocalStorage::new(config.output_dir());
    let report = SyncRunner::new(source, storage, config.transformer()?)
        .with_bundle_name(config.bundle_name())
        .run()
        .await?;

    assert_eq!(report.fetched, 4);
    assert_eq!(report.transformed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 2);

    let bundle = tokio::fs::read(temp_dir.path().join("out/customers_sync.zip")).await?;
    let csv = read_entry(&bundle, "customers.csv")?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "code,name,billing.city,joined_on");
    assert_eq!(lines[1], "C-001,PT Samudera,Surabaya,2024-02-01");
    assert_eq!(lines.len(), 2);

    let failures: serde_json::Value = serde_json::from_str(&read_entry(&bundle, "failures.json")?)?;
    let indexes: Vec<u64> = failures
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indexes, vec![2, 3]);

    Ok(())
}

/// API source with nested payload and an `any` filter
#[tokio::test]
async fn test_api_sync_with_any_filter() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/bl");
        then.status(200).json_body(serde_json::json!({
            "result": {"items": [
                {"bl_no": "BL-1", "st": "I", "pol": "IDSUB", "teu": "2"},
                {"bl_no": "BL-2", "st": "D", "pol": "SGSIN", "teu": "1"},
                {"bl_no": "BL-3", "st": "D", "pol": "IDJKT", "teu": "4"}
            ]}
        }));
    });

    let config_content = format!(
        r#"
[sync]
name = "bl-sync"

[source]
type = "api"
endpoint = "{}"
records_path = "result.items"
timeout_seconds = 5

[load]
output_path = "./unused"

[mapping]
name = "bills_of_lading"
source_table = "carrier_feed"
target_table = "bills_of_lading"
filter_mode = "any"

[[mapping.field_mappings]]
source = "bl_no"
target = "number"

[[mapping.field_mappings]]
source = "st"
target = "status"
transform = {{ type = "lookup", table = {{ D = "draft", I = "issued" }} }}

[[mapping.field_mappings]]
source = "teu"
target = "teu"
transform = {{ type = "to_number" }}

[[mapping.filters]]
field = "pol"
op = "starts_with"
value = "ID"

[[mapping.filters]]
field = "teu"
op = "gte"
value = 4
"#,
        server.url("/bl")
    );

    let config = SyncConfig::from_toml_str(&config_content)?;
    config.validate()?;

    let source = ApiSource::new(config.source.endpoint.clone().unwrap())
        .with_timeout(config.source.timeout_seconds)
        .with_records_path(config.source.records_path.clone());
    let storage = LocalStorage::new(temp_dir.path());
    let report = SyncRunner::new(source, storage, config.transformer()?).run().await?;

    api_mock.assert();
    assert_eq!(report.transformed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);

    let bundle = tokio::fs::read(temp_dir.path().join("bills_of_lading_sync.zip")).await?;
    let rows: serde_json::Value =
        serde_json::from_str(&read_entry(&bundle, "bills_of_lading.json")?)?;
    assert_eq!(rows[0]["number"], "BL-1");
    assert_eq!(rows[0]["status"], "issued");
    assert_eq!(rows[1]["number"], "BL-3");
    assert_eq!(rows[1]["teu"], 4);

    Ok(())
}
