use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use spp_core::errors::{ErrorInfo, SppError};

/// Text formats accepted for configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl Format {
    /// JSON for a `.json` extension (any case), YAML otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    fn error(self, op: &str, err: impl ToString) -> SppError {
        SppError::Config(
            ErrorInfo::new(format!("{}-{op}", self.label()), err.to_string())
                .with_context("format", self.label()),
        )
    }

    /// Parses `bytes` in this format.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, SppError> {
        match self {
            Format::Json => {
                serde_json::from_slice(bytes).map_err(|err| self.error("deserialize", err))
            }
            Format::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|err| self.error("deserialize", err))
            }
        }
    }

    /// Renders `value` in this format.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<String, SppError> {
        match self {
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|err| self.error("serialize", err))
            }
            Format::Yaml => {
                serde_yaml::to_string(value).map_err(|err| self.error("serialize", err))
            }
        }
    }
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, mut child) in entries {
                sort_keys(&mut child);
                sorted.insert(key, child);
            }
            *map = sorted;
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Compact JSON with object keys sorted at every depth.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, SppError> {
    let mut tree = serde_json::to_value(value).map_err(|err| Format::Json.error("serialize", err))?;
    sort_keys(&mut tree);
    serde_json::to_vec(&tree).map_err(|err| Format::Json.error("write", err))
}

/// Lowercase hex SHA-256 of the canonical JSON form of `value`.
pub fn stable_hash<T: Serialize>(value: &T) -> Result<String, SppError> {
    let digest = Sha256::digest(canonical_json(value)?);
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}

/// Rounds to 1e-9 so hashed floats ignore last-bit noise.
pub fn round_f64(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}
