//! Moving a documentation page while keeping its old URL alive.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::config::{Redirect, SiteConfig};
use super::navigation::rewrite_page;
use crate::error::SiteError;

/// Page file extension.
pub const PAGE_EXTENSION: &str = "mdx";

/// A validated page move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub source_file: PathBuf,
    pub destination_file: PathBuf,
    /// Site path of the page before the move, e.g. `/guides/intro`.
    pub source_path: String,
    pub destination_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMoveReport {
    pub plan: PagePlan,
    pub redirect: Redirect,
    pub navigation_updates: usize,
}

/// Appends `.mdx` unless the name already ends with it.
fn with_page_extension(page: &Path) -> PathBuf {
    if page.extension().is_some_and(|ext| ext == PAGE_EXTENSION) {
        return page.to_path_buf();
    }
    let mut name = page.as_os_str().to_os_string();
    name.push(".");
    name.push(PAGE_EXTENSION);
    PathBuf::from(name)
}

/// The path of `file` relative to `root`, with `.` and `..` resolved
/// lexically. Fails when the result would leave `root`.
fn relative_to_root(root: &Path, file: &Path) -> Result<Vec<String>, SiteError> {
    let outside = || SiteError::OutsideRoot {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    };
    let relative = if file.is_absolute() {
        file.strip_prefix(root).map_err(|_| outside())?
    } else {
        file
    };

    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop().ok_or_else(outside)?;
            }
            Component::RootDir | Component::Prefix(_) => return Err(outside()),
        }
    }
    if parts.is_empty() {
        return Err(outside());
    }
    Ok(parts)
}

/// Site path for a page file: root-relative, `/`-separated, no extension.
fn site_path(parts: &[String]) -> String {
    let joined = parts.join("/");
    let suffix = format!(".{PAGE_EXTENSION}");
    format!("/{}", joined.strip_suffix(&suffix).unwrap_or(&joined))
}

/// Checks a move of `source` to `destination` under `root` without touching
/// anything. Relative paths are taken from `root`.
pub fn plan_page_move(
    root: &Path,
    source: &Path,
    destination: &Path,
) -> Result<PagePlan, SiteError> {
    let source_parts = relative_to_root(root, &with_page_extension(source))?;
    let destination_parts = relative_to_root(root, &with_page_extension(destination))?;

    let source_file = source_parts.iter().fold(root.to_path_buf(), |p, s| p.join(s));
    let destination_file = destination_parts
        .iter()
        .fold(root.to_path_buf(), |p, s| p.join(s));

    if !source_file.is_file() {
        return Err(SiteError::SourceMissing(source_file));
    }
    if destination_file.exists() {
        return Err(SiteError::DestinationExists(destination_file));
    }

    Ok(PagePlan {
        source_path: site_path(&source_parts),
        destination_path: site_path(&destination_parts),
        source_file,
        destination_file,
    })
}

/// Moves a page file, adds a redirect from its old site path to the new one
/// and rewrites every navigation reference to it.
///
/// Nothing is touched unless the source exists, the destination does not and
/// the site config's redirect list can be updated. The config edits are made
/// in memory before the file moves; if the config cannot be written
/// afterwards the file is moved back.
#[instrument]
pub fn move_page(
    root: &Path,
    source: &Path,
    destination: &Path,
    config_path: &Path,
) -> Result<PageMoveReport, SiteError> {
    let plan = plan_page_move(root, source, destination)?;
    let mut config = SiteConfig::load(config_path)?;

    let redirect = Redirect::new(&plan.source_path, &plan.destination_path);
    config.push_redirect(redirect.clone())?;

    let navigation_updates = match config.navigation_mut() {
        Some(navigation) => rewrite_page(navigation, &plan.source_path, &plan.destination_path),
        None => {
            warn!("site config has no navigation");
            0
        }
    };

    let move_error = |source| SiteError::Move {
        from: plan.source_file.clone(),
        to: plan.destination_file.clone(),
        source,
    };
    if let Some(parent) = plan.destination_file.parent() {
        fs::create_dir_all(parent).map_err(move_error)?;
    }
    fs::rename(&plan.source_file, &plan.destination_file).map_err(move_error)?;
    info!(
        "moved {} to {}",
        plan.source_file.display(),
        plan.destination_file.display()
    );

    if let Err(err) = config.save() {
        match fs::rename(&plan.destination_file, &plan.source_file) {
            Ok(()) => warn!("site config not written, moved {} back", plan.source_path),
            Err(undo) => warn!(
                "site config not written and {} could not be moved back: {undo}",
                plan.destination_file.display()
            ),
        }
        return Err(err);
    }

    info!("added redirect {} -> {}", plan.source_path, plan.destination_path);
    if navigation_updates == 0 {
        warn!("{} is not referenced in the navigation", plan.source_path);
    } else {
        info!("updated {navigation_updates} navigation reference(s)");
    }

    Ok(PageMoveReport {
        plan,
        redirect,
        navigation_updates,
    })
}
