use std::path::Path;

use colored::Colorize;

use crate::sweep::{ScanEntry, SweepSummary};
use crate::utils::{display_path, format_size};

pub fn print_banner() {
    println!(
        "{}",
        concat!("tidysweep - log and cache sweeper v", env!("CARGO_PKG_VERSION"))
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_scan(entries: &[ScanEntry]) {
    println!("{}", "=== Plan ===".bold().white());
    for entry in entries {
        match &entry.path {
            Some(path) => println!(
                "  {:<24} {}  {} entries, {}",
                entry.category,
                display_path(path).dimmed(),
                entry.entries,
                format_size(entry.size_bytes).yellow()
            ),
            None => println!(
                "  {:<24} {}",
                entry.category,
                "[unresolved path, skipped]".red()
            ),
        }
    }
    println!();
}

pub fn print_sweep(summary: &SweepSummary) {
    println!("{}", "=== Summary ===".bold().white());
    for target in &summary.targets {
        match &target.path {
            Some(path) => println!(
                "  {:<24} {}  {} removed, {} failed",
                target.category,
                display_path(path).dimmed(),
                target.counts.removed.to_string().green(),
                failed_count(target.counts.failed)
            ),
            None => println!("  {:<24} {}", target.category, "[skipped]".dimmed()),
        }
    }
    println!("  {}", "─".repeat(45).dimmed());

    let totals = summary.totals();
    println!(
        "  {:<24} {} removed, {} failed",
        "Total:".bold(),
        totals.removed.to_string().green().bold(),
        failed_count(totals.failed)
    );
    if summary.commands_succeeded + summary.commands_failed > 0 {
        println!(
            "  {:<24} {} succeeded, {} failed",
            "Commands:".bold(),
            summary.commands_succeeded.to_string().green(),
            failed_count(summary.commands_failed)
        );
    }
    println!();
}

fn failed_count(failed: usize) -> colored::ColoredString {
    if failed == 0 {
        failed.to_string().normal()
    } else {
        failed.to_string().red().bold()
    }
}

pub fn print_report_saved(path: &Path) {
    println!(
        "{} {}",
        "Report saved:".green().bold(),
        path.display()
    );
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run scan."
            .yellow()
            .bold()
    );
    println!();
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run `tidysweep clean <PLAN> --confirm` to delete."
            .yellow()
            .bold()
    );
}
