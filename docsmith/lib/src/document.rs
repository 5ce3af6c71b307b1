//! Loading and saving JSON/YAML documents.
//!
//! Every tool in this crate edits a document in memory and writes it back
//! whole. Documents are held as a [`serde_json::Value`] with key order
//! preserved, regardless of the format they were read from, so a YAML spec
//! and a JSON spec go through exactly the same transformation code.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::DocumentError;

/// On-disk format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension. `.json` is JSON, anything else
    /// is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// A parsed JSON or YAML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub format: DocumentFormat,
    pub root: Value,
}

impl Document {
    pub fn new(format: DocumentFormat, root: Value) -> Self {
        Self { format, root }
    }

    /// Reads and parses the document at `path`, choosing the format from the
    /// file extension.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        debug!("loading document {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, DocumentFormat::from_path(path), path)
    }

    /// Parses `content` in the given format. `origin` only labels errors.
    pub fn parse(
        content: &str,
        format: DocumentFormat,
        origin: &Path,
    ) -> Result<Self, DocumentError> {
        let parse_error = |message: String| DocumentError::Parse {
            path: origin.to_path_buf(),
            format,
            message,
        };

        let root = match format {
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
            DocumentFormat::Yaml => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                yaml_to_json(yaml)
            }
        };

        Ok(Self { format, root })
    }

    /// Loads a document and requires its root to be an object.
    pub fn load_object(path: &Path) -> Result<Self, DocumentError> {
        let document = Self::load(path)?;
        if !document.root.is_object() {
            return Err(DocumentError::NotAnObject {
                path: path.to_path_buf(),
            });
        }
        Ok(document)
    }

    /// Serializes the document in its own format.
    pub fn render(&self) -> Result<String, DocumentError> {
        render_value(&self.root, self.format)
    }

    /// Writes the document to `path` in its own format.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        write_atomic(path, &self.render()?)
    }

    /// Writes the document to `path`, picking the format from the path.
    pub fn save_as(&self, path: &Path) -> Result<(), DocumentError> {
        let content = render_value(&self.root, DocumentFormat::from_path(path))?;
        write_atomic(path, &content)
    }
}

/// Walks `keys` from `value`, creating empty objects for missing levels and
/// replacing non-object values in the way, and returns the innermost object.
pub fn ensure_object<'a>(value: &'a mut Value, keys: &[&str]) -> &'a mut Map<String, Value> {
    let mut current = value;
    for key in keys {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            unreachable!("replaced with an object above")
        };
        current = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    match current {
        Value::Object(map) => map,
        _ => unreachable!("replaced with an object above"),
    }
}

/// Serializes a value as pretty JSON (two-space indent) or YAML. Output ends
/// with a newline.
pub fn render_value(value: &Value, format: DocumentFormat) -> Result<String, DocumentError> {
    let serialize_error = |message: String| DocumentError::Serialize { format, message };

    match format {
        DocumentFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
        DocumentFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))
        }
    }
}

/// Writes `content` to a temporary sibling of `path` and renames it into
/// place, so the previous file survives a failed write.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), DocumentError> {
    let write_error = |source: std::io::Error| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_error)?;

    let mut temp_file = NamedTempFile::new_in(&parent).map_err(write_error)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(write_error)?;
    temp_file
        .persist(path)
        .map_err(|e| write_error(e.error))?;

    debug!("wrote {}", path.display());
    Ok(())
}

/// Converts a YAML value into a JSON value. Non-string mapping keys (status
/// codes such as `200:` are the usual case) become their string form and
/// tags are dropped.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
