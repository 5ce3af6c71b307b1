//! Rewriting links in page bodies that point at redirected paths.
//!
//! Markdown links (`[text](/old)`, images included) and `href`/`src`
//! attributes are followed through the site's redirects to the end of their
//! chain. Anchors and query strings are carried over; external and relative
//! links are never touched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use super::config::{Redirect, SiteConfig};
use super::redirects::{MAX_CHAIN_DEPTH, follow_chain};
use crate::document::write_atomic;
use crate::error::{DocumentError, SiteError};

/// Directories never scanned for links.
pub const LINK_EXCLUDED_DIRS: [&str; 5] = [".git", "node_modules", ".next", "dist", "build"];

/// Extensions of the files scanned for links.
pub const LINK_FILE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

lazy_static! {
    /// `[text](target)` or `[text](target "title")`.
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r#"(\[[^\]]*\]\()([^)\s]+)((?:\s+"[^"]*")?\))"#)
            .expect("markdown link pattern");

    /// `href="target"` or `src='target'`.
    static ref ATTRIBUTE_LINK: Regex =
        Regex::new(r#"(\b(?:href|src)=)(?:"([^"]+)"|'([^']+)')"#)
            .expect("attribute link pattern");
}

/// A link target that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkChange {
    pub from: String,
    pub to: String,
}

/// Links rewritten in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLinks {
    /// Path relative to the site root.
    pub file: PathBuf,
    pub changes: Vec<LinkChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub files_scanned: usize,
    pub updated: Vec<FileLinks>,
}

impl LinkReport {
    pub fn link_count(&self) -> usize {
        self.updated.iter().map(|file| file.changes.len()).sum()
    }
}

/// Redirect sources mapped to the final destination of their chain.
#[derive(Debug, Clone, Default)]
pub struct LinkMap {
    targets: HashMap<String, String>,
}

impl LinkMap {
    /// Cyclic and over-long chains are left out.
    pub fn new(redirects: &[Redirect]) -> Self {
        let map: HashMap<&str, &str> = redirects
            .iter()
            .map(|r| (r.source.as_str(), r.destination.as_str()))
            .collect();

        let mut targets = HashMap::new();
        for redirect in redirects {
            let walk = follow_chain(&map, &redirect.source, MAX_CHAIN_DEPTH);
            if walk.cyclic || walk.truncated {
                warn!("not rewriting links to {}: {}", redirect.source, walk.hops.join(" -> "));
                continue;
            }
            targets.insert(redirect.source.clone(), walk.target().to_string());
        }
        Self { targets }
    }

    /// The new target for a root-relative link, or `None` when it is not
    /// redirected. A `.md`/`.mdx` extension or trailing slash on the link
    /// still matches.
    pub fn rewrite(&self, target: &str) -> Option<String> {
        if !target.starts_with('/') || target.starts_with("//") {
            return None;
        }
        let split = target.find(['#', '?']).unwrap_or(target.len());
        let (base, suffix) = target.split_at(split);
        let without_extension = base
            .strip_suffix(".mdx")
            .or_else(|| base.strip_suffix(".md"))
            .unwrap_or(base);

        let destination = [base, without_extension]
            .into_iter()
            .flat_map(|candidate| [candidate, candidate.trim_end_matches('/')])
            .find_map(|candidate| self.targets.get(candidate))?;
        let rewritten = format!("{destination}{suffix}");
        (rewritten != target).then_some(rewritten)
    }
}

/// Rewrites every redirected link in `content`.
pub fn rewrite_links(content: &str, links: &LinkMap) -> (String, Vec<LinkChange>) {
    let mut changes = Vec::new();

    let markdown = MARKDOWN_LINK.replace_all(content, |caps: &Captures| {
        let target = &caps[2];
        match links.rewrite(target) {
            Some(to) => {
                changes.push(LinkChange {
                    from: target.to_string(),
                    to: to.clone(),
                });
                format!("{}{to}{}", &caps[1], &caps[3])
            }
            None => caps[0].to_string(),
        }
    });

    let rewritten = ATTRIBUTE_LINK.replace_all(&markdown, |caps: &Captures| {
        let (quote, target) = match (caps.get(2), caps.get(3)) {
            (Some(target), _) => ('"', target.as_str()),
            (None, Some(target)) => ('\'', target.as_str()),
            (None, None) => return caps[0].to_string(),
        };
        match links.rewrite(target) {
            Some(to) => {
                changes.push(LinkChange {
                    from: target.to_string(),
                    to: to.clone(),
                });
                format!("{}{quote}{to}{quote}", &caps[1])
            }
            None => caps[0].to_string(),
        }
    });

    (rewritten.into_owned(), changes)
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| LINK_EXCLUDED_DIRS.contains(&name))
}

/// Every `.md`/`.mdx` file under `root`, in file name order.
pub fn discover_link_files(root: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
    {
        let entry = entry.map_err(|e| SiteError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        let is_page = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| LINK_FILE_EXTENSIONS.contains(&ext));
        if entry.file_type().is_file() && is_page {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Points every link under `root` that targets a redirect source at the
/// redirect's final destination. With `dry_run` nothing is written.
#[instrument(skip(config), fields(config = %config.path.display()))]
pub fn update_links(
    root: &Path,
    config: &SiteConfig,
    dry_run: bool,
) -> Result<LinkReport, SiteError> {
    let links = LinkMap::new(&config.redirects()?);
    let files = discover_link_files(root)?;
    let mut report = LinkReport {
        files_scanned: files.len(),
        ..LinkReport::default()
    };

    for path in files {
        let content = fs::read_to_string(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        let (rewritten, changes) = rewrite_links(&content, &links);
        if changes.is_empty() {
            continue;
        }

        let file = path.strip_prefix(root).unwrap_or(path.as_path()).to_path_buf();
        for change in &changes {
            debug!("{}: {} -> {}", file.display(), change.from, change.to);
        }
        if !dry_run {
            write_atomic(&path, &rewritten)?;
        }
        info!("{} link(s) in {}", changes.len(), file.display());
        report.updated.push(FileLinks { file, changes });
    }

    if dry_run && !report.updated.is_empty() {
        info!("dry run, {} file(s) would change", report.updated.len());
    }
    Ok(report)
}
