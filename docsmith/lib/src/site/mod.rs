//! Documentation site maintenance: page moves, redirects and navigation.
//!
//! The site is described by a single config file ([`config::SiteConfig`])
//! holding a `redirects` list and a free-form `navigation` tree whose string
//! leaves are page paths. Page bodies link to each other by site path;
//! [`links`] keeps those links in step with the redirects.

pub mod config;
pub mod links;
pub mod move_page;
pub mod navigation;
pub mod redirects;
pub mod validate;

use std::path::Path;

use tracing::{info, instrument};

use crate::error::SiteError;
use config::SiteConfig;

/// Removes empty groups and tabs from the navigation of the site config at
/// `config_path`. Returns how many entries were removed.
#[instrument]
pub fn prune_navigation(config_path: &Path, dry_run: bool) -> Result<usize, SiteError> {
    let mut config = SiteConfig::load(config_path)?;
    let Some(navigation) = config.navigation_mut() else {
        info!("site config has no navigation");
        return Ok(0);
    };

    let removed = navigation::prune_empty(navigation);
    if removed == 0 {
        info!("navigation has no empty groups");
    } else if dry_run {
        info!("dry run, would remove {removed} empty navigation entries");
    } else {
        config.save()?;
        info!("removed {removed} empty navigation entries");
    }
    Ok(removed)
}
