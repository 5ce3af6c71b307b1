//! Terminal summaries for each command. Logs go to stderr; these go to stdout.

use std::path::Path;

use docsmith_lib::site::redirects::ChainWalk;
use docsmith_lib::{
    ChainReport, DedupeReport, EndpointIdentity, HeaderParameter, HeaderReport, LinkReport,
    PageCheck, PageMoveReport, SpliceReport,
};
use owo_colors::{OwoColorize, Stream};

fn done(message: &str) {
    println!(
        "{} {message}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green())
    );
}

fn warning(message: &str) {
    println!(
        "{} {message}",
        "!".if_supports_color(Stream::Stdout, |t| t.yellow())
    );
}

fn item(text: &str) {
    println!("  {}", text.if_supports_color(Stream::Stdout, |t| t.dimmed()));
}

fn dry_run_note(dry_run: bool) {
    if dry_run {
        println!(
            "{}",
            "(dry run, nothing written)".if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    }
}

pub fn print_splice(identity: &EndpointIdentity, written: &Path, report: &SpliceReport) {
    done(&format!(
        "{} ({}) written to {}",
        identity
            .endpoint_name
            .if_supports_color(Stream::Stdout, |t| t.bold()),
        identity.endpoint_id,
        written.display()
    ));
    println!("Components:");
    report.components.iter().for_each(|c| item(c));
    println!("Paths:");
    report.paths.iter().for_each(|p| item(p));

    if !report.pruned.is_empty() {
        println!("Pruned:");
        report.pruned.iter().for_each(|p| item(p));
    }
    for key in &report.overwritten {
        warning(&format!("replaced existing {key}"));
    }
}

pub fn print_header(header: &HeaderParameter, report: &HeaderReport, dry_run: bool) {
    if !report.changed() {
        done(&format!(
            "all {} operation(s) already have the {} header",
            report.operations_visited, header.name
        ));
        return;
    }

    let verb = if dry_run { "would add" } else { "added" };
    done(&format!(
        "{verb} the {} header to {} of {} operation(s)",
        header.name,
        report.added.len(),
        report.operations_visited
    ));
    for operation in &report.added {
        item(&format!("{} {}", operation.method.to_uppercase(), operation.path));
    }
    dry_run_note(dry_run);
}

pub fn print_security(scheme: &str, target: &Path) {
    done(&format!(
        "enabled optional {} authentication in {}",
        scheme.if_supports_color(Stream::Stdout, |t| t.bold()),
        target.display()
    ));
}

pub fn print_move(report: &PageMoveReport) {
    let plan = &report.plan;
    done(&format!(
        "moved {} to {}",
        plan.source_file.display(),
        plan.destination_file.display()
    ));
    item(&format!(
        "redirect {} -> {}",
        report.redirect.source, report.redirect.destination
    ));
    if report.navigation_updates == 0 {
        warning(&format!("{} was not in the navigation", plan.source_path));
    } else {
        item(&format!(
            "{} navigation reference(s) updated",
            report.navigation_updates
        ));
    }
}

pub fn print_chains(chains: &[(String, ChainWalk)]) {
    if chains.is_empty() {
        done("no redirect chains");
        return;
    }
    for (source, walk) in chains {
        warning(&format!("{source} -> {}", walk.hops.join(" -> ")));
    }
}

fn skipped_note(skipped: usize) {
    if skipped > 0 {
        warning(&format!(
            "skipped {skipped} redirect record(s) without a source and destination"
        ));
    }
}

pub fn print_resolve(report: &ChainReport, dry_run: bool) {
    skipped_note(report.skipped);
    for source in &report.cycles {
        warning(&format!("redirect cycle starting at {source}"));
    }
    for source in &report.truncated {
        warning(&format!("redirect chain from {source} is too long to follow"));
    }
    if report.resolved.is_empty() {
        done(&format!("no chains among {} redirect(s)", report.total));
        return;
    }

    let verb = if dry_run { "would resolve" } else { "resolved" };
    done(&format!(
        "{verb} {} of {} redirect(s)",
        report.resolved.len(),
        report.total
    ));
    for change in &report.resolved {
        item(&format!("{}: {} -> {}", change.source, change.from, change.to));
    }
    dry_run_note(dry_run);
}

pub fn print_dedupe(report: &DedupeReport, dry_run: bool) {
    skipped_note(report.skipped);
    if report.duplicates.is_empty() {
        done(&format!("no duplicates among {} redirect(s)", report.before));
        return;
    }

    let verb = if dry_run { "would remove" } else { "removed" };
    done(&format!(
        "{verb} {} duplicate redirect(s), {} left",
        report.before - report.after,
        report.after
    ));
    for duplicate in &report.duplicates {
        item(&format!(
            "{}: kept {}, dropped {}",
            duplicate.source,
            duplicate.kept,
            duplicate.dropped.join(", ")
        ));
    }
    dry_run_note(dry_run);
}

pub fn print_links(report: &LinkReport, dry_run: bool) {
    if report.updated.is_empty() {
        done(&format!(
            "no redirected links in {} file(s)",
            report.files_scanned
        ));
        return;
    }

    let verb = if dry_run { "would update" } else { "updated" };
    done(&format!(
        "{verb} {} link(s) in {} of {} file(s)",
        report.link_count(),
        report.updated.len(),
        report.files_scanned
    ));
    for file in &report.updated {
        println!("{}", file.file.display());
        for change in &file.changes {
            item(&format!("{} -> {}", change.from, change.to));
        }
    }
    dry_run_note(dry_run);
}

pub fn print_prune(removed: usize, dry_run: bool) {
    if removed == 0 {
        done("no empty navigation entries");
        return;
    }
    let verb = if dry_run { "would remove" } else { "removed" };
    done(&format!("{verb} {removed} empty navigation entries"));
    dry_run_note(dry_run);
}

pub fn print_page_check(check: &PageCheck) {
    if check.is_clean() {
        done("navigation and pages agree");
        return;
    }
    if !check.missing.is_empty() {
        println!("Missing pages:");
        check.missing.iter().for_each(|p| item(p));
    }
    if !check.orphaned.is_empty() {
        println!("Pages not in the navigation:");
        check.orphaned.iter().for_each(|p| item(p));
    }
}
