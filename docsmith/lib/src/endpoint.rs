//! Endpoint configs describing an inference endpoint to add to an API spec.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::document::Document;
use crate::error::{DocumentError, EndpointConfigError};

/// Raw shape of the config file. Every field is optional here so a missing
/// key can be reported by name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpointConfig {
    base_schema: Option<String>,
    input_schema: Option<String>,
    output_schema: Option<String>,
    endpoint_id: Option<String>,
    endpoint_name: Option<String>,
    schema_name: Option<String>,
    api_doc_path: Option<String>,
}

/// Identity of the endpoint: the path segment, the display name, and the
/// prefix used for every generated component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointIdentity {
    /// Literal path segment, e.g. `whisper-large-v3`.
    pub endpoint_id: String,
    /// Human readable name used in summaries and descriptions.
    pub endpoint_name: String,
    /// PascalCase prefix for component names, e.g. `WhisperLargeV3`.
    pub schema_name: String,
}

/// A loaded endpoint config with every path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub base_schema: PathBuf,
    pub input_schema: PathBuf,
    pub output_schema: PathBuf,
    pub identity: EndpointIdentity,
    pub api_doc_path: Option<PathBuf>,
}

impl EndpointConfig {
    /// Reads the config at `path`, resolving relative file paths against
    /// `base_dir` (the invocation directory).
    pub fn load(path: &Path, base_dir: &Path) -> Result<Self, EndpointConfigError> {
        let config_path = resolve(base_dir, path);
        debug!("reading endpoint config {}", config_path.display());

        let document = Document::load(&config_path)?;
        let raw: RawEndpointConfig = serde_json::from_value(document.root).map_err(|e| {
            EndpointConfigError::Invalid {
                path: config_path.clone(),
                message: e.to_string(),
            }
        })?;

        Self::from_raw(raw, &config_path, base_dir)
    }

    fn from_raw(
        raw: RawEndpointConfig,
        config_path: &Path,
        base_dir: &Path,
    ) -> Result<Self, EndpointConfigError> {
        let required = |value: Option<String>, field: &'static str| match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(EndpointConfigError::MissingField {
                path: config_path.to_path_buf(),
                field,
            }),
        };

        let base_schema = required(raw.base_schema, "baseSchema")?;
        let input_schema = required(raw.input_schema, "inputSchema")?;
        let output_schema = required(raw.output_schema, "outputSchema")?;
        let endpoint_id = required(raw.endpoint_id, "endpointId")?;
        let endpoint_name = required(raw.endpoint_name, "endpointName")?;
        let schema_name = required(raw.schema_name, "schemaName")?;

        Ok(Self {
            base_schema: resolve(base_dir, Path::new(&base_schema)),
            input_schema: resolve(base_dir, Path::new(&input_schema)),
            output_schema: resolve(base_dir, Path::new(&output_schema)),
            identity: EndpointIdentity {
                endpoint_id,
                endpoint_name,
                schema_name,
            },
            api_doc_path: raw
                .api_doc_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| resolve(base_dir, Path::new(&p))),
        })
    }

    /// Loads the input and output schema fragments.
    pub fn load_fragments(&self) -> Result<(serde_json::Value, serde_json::Value), DocumentError> {
        let input = Document::load(&self.input_schema)?.root;
        let output = Document::load(&self.output_schema)?.root;
        Ok((input, output))
    }

    /// Where the standalone spec for this endpoint is written:
    /// `<dir of base schema>/<endpointId>.json`.
    pub fn standalone_spec_path(&self) -> PathBuf {
        let file_name = format!("{}.json", self.identity.endpoint_id);
        match self.base_schema.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
