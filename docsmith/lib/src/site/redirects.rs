//! Redirect list maintenance: collapsing chains and dropping duplicates.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::config::{Redirect, RedirectEntry, SiteConfig};
use crate::error::SiteError;

/// Longest chain followed before giving up.
pub const MAX_CHAIN_DEPTH: usize = 20;

/// Where following a destination through the redirect map ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainWalk {
    /// Every path visited, starting with the original destination.
    pub hops: Vec<String>,
    pub cyclic: bool,
    pub truncated: bool,
}

impl ChainWalk {
    pub fn target(&self) -> &str {
        self.hops.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_chain(&self) -> bool {
        self.hops.len() > 1
    }
}

/// A redirect whose destination was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRedirect {
    pub source: String,
    pub from: String,
    pub to: String,
    pub hops: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub total: usize,
    pub resolved: Vec<ResolvedRedirect>,
    /// Sources whose chain loops back on itself.
    pub cycles: Vec<String>,
    /// Sources whose chain is longer than [`MAX_CHAIN_DEPTH`].
    pub truncated: Vec<String>,
    /// Records without a usable source and destination, left untouched.
    pub skipped: usize,
}

/// A source that appeared more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSource {
    pub source: String,
    pub kept: String,
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    pub before: usize,
    pub after: usize,
    pub duplicates: Vec<DuplicateSource>,
    /// Records without a usable source and destination, left untouched.
    pub skipped: usize,
}

/// Source to destination. A later redirect for the same source wins.
fn redirect_map(redirects: &[Redirect]) -> HashMap<&str, &str> {
    redirects
        .iter()
        .map(|r| (r.source.as_str(), r.destination.as_str()))
        .collect()
}

/// Follows `start` through `map` until it reaches a path that is not
/// redirected, a cycle, or the depth limit.
pub fn follow_chain(map: &HashMap<&str, &str>, start: &str, max_depth: usize) -> ChainWalk {
    let mut hops = vec![start.to_string()];
    let mut visited = HashSet::new();
    let mut current = start;
    let mut cyclic = false;

    while let Some(&next) = map.get(current) {
        if hops.len() > max_depth {
            return ChainWalk {
                hops,
                cyclic,
                truncated: true,
            };
        }
        if !visited.insert(current) {
            cyclic = true;
            break;
        }
        hops.push(next.to_string());
        current = next;
    }

    ChainWalk {
        hops,
        cyclic,
        truncated: false,
    }
}

/// Points every redirect straight at the end of its chain.
pub fn resolve_chains(redirects: &mut [Redirect], max_depth: usize) -> ChainReport {
    let walks: Vec<ChainWalk> = {
        let map = redirect_map(redirects);
        redirects
            .iter()
            .map(|r| follow_chain(&map, &r.destination, max_depth))
            .collect()
    };

    let mut report = ChainReport {
        total: redirects.len(),
        ..ChainReport::default()
    };

    for (redirect, walk) in redirects.iter_mut().zip(walks) {
        if walk.cyclic {
            warn!("redirect cycle from {}: {}", redirect.source, walk.hops.join(" -> "));
            report.cycles.push(redirect.source.clone());
        }
        if walk.truncated {
            warn!(
                "redirect chain from {} exceeds {max_depth} hops",
                redirect.source
            );
            report.truncated.push(redirect.source.clone());
        }
        if !walk.is_chain() || walk.target() == redirect.destination {
            continue;
        }

        let to = walk.target().to_string();
        report.resolved.push(ResolvedRedirect {
            source: redirect.source.clone(),
            from: std::mem::replace(&mut redirect.destination, to.clone()),
            to,
            hops: walk.hops,
        });
    }

    report
}

/// Redirects whose destination is itself redirected, with the chain each
/// one would follow.
pub fn find_chains(redirects: &[Redirect], max_depth: usize) -> Vec<(String, ChainWalk)> {
    let map = redirect_map(redirects);
    redirects
        .iter()
        .filter_map(|r| {
            let walk = follow_chain(&map, &r.destination, max_depth);
            walk.is_chain().then(|| (r.source.clone(), walk))
        })
        .collect()
}

/// Finds every source listed more than once. Returns the indices of the
/// redirects to drop (all but the last for each source) and a summary per
/// duplicated source.
pub fn find_duplicates(redirects: &[Redirect]) -> (HashSet<usize>, Vec<DuplicateSource>) {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut by_source: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, redirect) in redirects.iter().enumerate() {
        let indices = by_source.entry(redirect.source.as_str()).or_default();
        if indices.is_empty() {
            first_seen.push(redirect.source.as_str());
        }
        indices.push(index);
    }

    let mut dropped = HashSet::new();
    let duplicates = first_seen
        .iter()
        .filter_map(|source| {
            let (last, earlier) = by_source.get(source)?.split_last()?;
            if earlier.is_empty() {
                return None;
            }
            dropped.extend(earlier.iter().copied());
            Some(DuplicateSource {
                source: (*source).to_string(),
                kept: redirects[*last].destination.clone(),
                dropped: earlier
                    .iter()
                    .map(|i| redirects[*i].destination.clone())
                    .collect(),
            })
        })
        .collect();

    (dropped, duplicates)
}

/// Keeps only the last redirect listed for each source. Survivors keep their
/// relative order.
pub fn dedupe(redirects: &[Redirect]) -> (Vec<Redirect>, Vec<DuplicateSource>) {
    let (dropped, duplicates) = find_duplicates(redirects);
    let kept = redirects
        .iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, redirect)| redirect.clone())
        .collect();
    (kept, duplicates)
}

fn usable(entries: &[RedirectEntry]) -> Vec<Redirect> {
    entries
        .iter()
        .filter_map(RedirectEntry::as_redirect)
        .cloned()
        .collect()
}

/// Resolves redirect chains in the site config at `config_path`.
#[instrument]
pub fn resolve_redirect_chains(
    config_path: &Path,
    dry_run: bool,
) -> Result<ChainReport, SiteError> {
    let mut config = SiteConfig::load(config_path)?;
    let mut entries = config.redirect_entries()?;
    let mut redirects = usable(&entries);
    let mut report = resolve_chains(&mut redirects, MAX_CHAIN_DEPTH);
    report.skipped = entries.len() - redirects.len();

    for change in &report.resolved {
        info!("{}: {} -> {}", change.source, change.from, change.to);
    }
    if report.resolved.is_empty() {
        info!("no redirect chains found");
    } else if dry_run {
        info!("dry run, {} redirect(s) would change", report.resolved.len());
    } else {
        let mut resolved = redirects.into_iter();
        for entry in &mut entries {
            if let RedirectEntry::Redirect(slot) = entry {
                if let Some(redirect) = resolved.next() {
                    *slot = redirect;
                }
            }
        }
        config.set_redirect_entries(&entries)?;
        config.save()?;
        info!("updated {} redirect(s)", report.resolved.len());
    }

    Ok(report)
}

/// Lists remaining redirect chains in the site config at `config_path`.
#[instrument]
pub fn check_redirect_chains(config_path: &Path) -> Result<Vec<(String, ChainWalk)>, SiteError> {
    let config = SiteConfig::load(config_path)?;
    Ok(find_chains(&config.redirects()?, MAX_CHAIN_DEPTH))
}

/// Drops duplicate redirect sources in the site config at `config_path`.
/// Unrecognised records stay where they are.
#[instrument]
pub fn dedupe_redirects(config_path: &Path, dry_run: bool) -> Result<DedupeReport, SiteError> {
    let mut config = SiteConfig::load(config_path)?;
    let entries = config.redirect_entries()?;
    let redirects = usable(&entries);
    let (dropped, duplicates) = find_duplicates(&redirects);
    let report = DedupeReport {
        before: redirects.len(),
        after: redirects.len() - dropped.len(),
        duplicates,
        skipped: entries.len() - redirects.len(),
    };

    for duplicate in &report.duplicates {
        info!(
            "{}: keeping {}, dropping {}",
            duplicate.source,
            duplicate.kept,
            duplicate.dropped.join(", ")
        );
    }
    if report.duplicates.is_empty() {
        info!("no duplicate redirects found");
    } else if !dry_run {
        let mut usable_index = 0;
        let kept: Vec<RedirectEntry> = entries
            .into_iter()
            .filter(|entry| match entry {
                RedirectEntry::Redirect(_) => {
                    let keep = !dropped.contains(&usable_index);
                    usable_index += 1;
                    keep
                }
                RedirectEntry::Unrecognised(_) => true,
            })
            .collect();
        config.set_redirect_entries(&kept)?;
        config.save()?;
        info!("removed {} duplicate(s)", report.before - report.after);
    }

    Ok(report)
}
