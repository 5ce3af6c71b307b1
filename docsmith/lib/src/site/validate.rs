//! Cross-checking the navigation against the page files on disk.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use super::config::SiteConfig;
use super::move_page::PAGE_EXTENSION;
use super::navigation::collect_pages;
use crate::error::SiteError;

/// Directories that never hold pages.
pub const EXCLUDED_DIRS: [&str; 9] = [
    "node_modules",
    ".git",
    ".github",
    "api-specs",
    "scripts",
    "site-scripts",
    "images",
    "logo",
    "snippets",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageCheck {
    /// Navigation references with no page file.
    pub missing: Vec<String>,
    /// Page files no navigation entry points at.
    pub orphaned: Vec<String>,
}

impl PageCheck {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

fn is_external(page: &str) -> bool {
    page.starts_with("http://") || page.starts_with("https://")
}

/// Every page under `root` as a site path without leading slash or
/// extension, e.g. `guides/intro`.
pub fn discover_pages(root: &Path) -> Result<BTreeSet<String>, SiteError> {
    let mut pages = BTreeSet::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
    {
        let entry = entry.map_err(|e| SiteError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != PAGE_EXTENSION)
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let page = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        debug!("found page {page}");
        pages.insert(page);
    }

    Ok(pages)
}

/// Compares the navigation in `config` with the pages under `root`.
#[instrument(skip(config), fields(config = %config.path.display()))]
pub fn check_pages(root: &Path, config: &SiteConfig) -> Result<PageCheck, SiteError> {
    let referenced: BTreeSet<String> = config
        .navigation()
        .map(collect_pages)
        .unwrap_or_default()
        .into_iter()
        .filter(|page| !is_external(page))
        .map(|page| page.trim_start_matches('/').to_string())
        .collect();
    let on_disk = discover_pages(root)?;

    Ok(PageCheck {
        missing: referenced.difference(&on_disk).cloned().collect(),
        orphaned: on_disk.difference(&referenced).cloned().collect(),
    })
}
