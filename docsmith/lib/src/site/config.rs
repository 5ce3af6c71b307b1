//! The site config (`docs.json` or the older `mint.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::document::{Document, ensure_object};
use crate::error::SiteError;

/// Site config file names, in lookup order.
pub const SITE_CONFIG_FILES: [&str; 2] = ["docs.json", "mint.json"];

/// A redirect from an old page path to a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
    /// Any other keys on the record (e.g. `permanent`), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Redirect {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            extra: Map::new(),
        }
    }
}

/// One record of the `redirects` list.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectEntry {
    Redirect(Redirect),
    /// A record without a usable `source` and `destination`. It is written
    /// back as-is and takes no part in chain or duplicate processing.
    Unrecognised(Value),
}

impl RedirectEntry {
    fn parse(value: Value) -> Self {
        match serde_json::from_value::<Redirect>(value.clone()) {
            Ok(redirect)
                if !redirect.source.trim().is_empty()
                    && !redirect.destination.trim().is_empty() =>
            {
                Self::Redirect(redirect)
            }
            _ => Self::Unrecognised(value),
        }
    }

    fn to_value(&self) -> Result<Value, SiteError> {
        match self {
            Self::Redirect(redirect) => serde_json::to_value(redirect)
                .map_err(|_| SiteError::Malformed { field: "redirects" }),
            Self::Unrecognised(value) => Ok(value.clone()),
        }
    }

    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            Self::Unrecognised(_) => None,
        }
    }
}

/// A loaded site config. Only `redirects` and `navigation` are interpreted;
/// every other key is written back untouched.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub path: PathBuf,
    document: Document,
}

impl SiteConfig {
    /// Finds the site config in `root`.
    pub fn discover(root: &Path) -> Result<PathBuf, SiteError> {
        SITE_CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| SiteError::ConfigNotFound(root.to_path_buf()))
    }

    pub fn load(path: &Path) -> Result<Self, SiteError> {
        debug!("loading site config {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            document: Document::load_object(path)?,
        })
    }

    pub fn save(&self) -> Result<(), SiteError> {
        self.document.save(&self.path)?;
        Ok(())
    }

    /// Every record of the redirect list, in order. A missing list is empty;
    /// anything other than a list is an error.
    pub fn redirect_entries(&self) -> Result<Vec<RedirectEntry>, SiteError> {
        let records = match self.document.root.get("redirects") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(_) => return Err(SiteError::Malformed { field: "redirects" }),
        };

        let entries: Vec<RedirectEntry> =
            records.iter().cloned().map(RedirectEntry::parse).collect();
        for (index, entry) in entries.iter().enumerate() {
            if let RedirectEntry::Unrecognised(record) = entry {
                warn!("redirect #{index} has no usable source and destination: {record}");
            }
        }
        Ok(entries)
    }

    /// The usable redirects, skipping unrecognised records.
    pub fn redirects(&self) -> Result<Vec<Redirect>, SiteError> {
        Ok(self
            .redirect_entries()?
            .iter()
            .filter_map(RedirectEntry::as_redirect)
            .cloned()
            .collect())
    }

    pub fn set_redirect_entries(&mut self, entries: &[RedirectEntry]) -> Result<(), SiteError> {
        let records = entries
            .iter()
            .map(RedirectEntry::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        ensure_object(&mut self.document.root, &[])
            .insert("redirects".into(), Value::Array(records));
        Ok(())
    }

    /// Appends a redirect, creating the list when needed.
    pub fn push_redirect(&mut self, redirect: Redirect) -> Result<(), SiteError> {
        let mut entries = self.redirect_entries()?;
        entries.push(RedirectEntry::Redirect(redirect));
        self.set_redirect_entries(&entries)
    }

    pub fn navigation(&self) -> Option<&Value> {
        self.document.root.get("navigation")
    }

    pub fn navigation_mut(&mut self) -> Option<&mut Value> {
        self.document.root.get_mut("navigation")
    }
}
