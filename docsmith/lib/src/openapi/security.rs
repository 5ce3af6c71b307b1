//! Copying the shared security scheme from the base spec into another spec.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::{info, instrument};

use crate::document::{Document, ensure_object};
use crate::error::SecurityError;

/// Finds the spec named `name` (file stem, any extension) in `dir`.
pub fn find_base_spec(dir: &Path, name: &str) -> Result<PathBuf, SecurityError> {
    let entries = fs::read_dir(dir).map_err(|source| SecurityError::ListDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_stem().and_then(|stem| stem.to_str()) == Some(name))
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| SecurityError::BaseSpecNotFound {
            dir: dir.to_path_buf(),
            name: name.to_string(),
        })
}

/// Copies `base`'s security schemes into `target` and makes authentication
/// optional on every endpoint: `security` becomes
/// `[{}, {"<first scheme>": []}]`. Returns the name of the enabled scheme, or
/// `None` when `base` declares no scheme.
pub fn inject_security(target: &mut Value, base: &Value) -> Option<String> {
    let schemes: &Map<String, Value> = base
        .pointer("/components/securitySchemes")
        .and_then(Value::as_object)
        .filter(|schemes| !schemes.is_empty())?;
    let scheme_name = schemes.keys().next()?.clone();

    ensure_object(target, &["components"])
        .insert("securitySchemes".into(), Value::Object(schemes.clone()));
    let mut requirement = Map::new();
    requirement.insert(scheme_name.clone(), json!([]));
    ensure_object(target, &[]).insert("security".into(), json!([{}, requirement]));

    Some(scheme_name)
}

/// Injects the security scheme of the spec at `base_path` into the spec at
/// `target_path`, rewriting the target in its own format.
#[instrument]
pub fn add_security_to_file(
    target_path: &Path,
    base_path: &Path,
) -> Result<String, SecurityError> {
    let base = Document::load(base_path)?;
    let mut target = Document::load_object(target_path)?;

    let scheme = inject_security(&mut target.root, &base.root).ok_or_else(|| {
        SecurityError::NoSchemes {
            path: base_path.to_path_buf(),
        }
    })?;

    target.save(target_path)?;
    info!("enabled security scheme {scheme} on {}", target_path.display());
    Ok(scheme)
}
