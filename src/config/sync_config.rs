use crate::core::transformer::SyncTransformer;
use crate::domain::model::SyncMapping;
use crate::utils::error::{ErpError, Result};
use crate::utils::validation::{
    validate_contained_path, validate_file_extension, validate_path, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub sync: SyncInfo,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub mapping: SyncMapping,
    /// Directory relative paths are resolved against; the config file's own
    /// directory when loaded with `from_file`.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: SourceKind,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub timeout_seconds: Option<u64>,
    pub records_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub bundle_name: Option<String>,
}

impl SyncConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ErpError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn bundle_name(&self) -> String {
        self.load
            .bundle_name
            .clone()
            .unwrap_or_else(|| format!("{}_sync.zip", self.mapping.target_table))
    }

    /// Root that `source.path` is read from.
    pub fn source_root(&self) -> &Path {
        &self.base_dir
    }

    /// `load.output_path` resolved against the same base as `source.path`.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.load.output_path)
    }

    pub fn transformer(&self) -> Result<SyncTransformer> {
        SyncTransformer::new(self.mapping.clone())
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type {
            SourceKind::File => {
                let path = validate_required_field("source.path", &self.source.path)?;
                validate_path("source.path", path)?;
                validate_contained_path("source.path", path)?;
                validate_file_extension("source.path", path, &["json"])?;
            }
            SourceKind::Api => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
            }
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_file_extension("load.bundle_name", &self.bundle_name(), &["zip"])?;

        self.transformer().map(|_| ())
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
