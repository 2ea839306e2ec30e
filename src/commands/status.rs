use crate::commands::CommandReport;
use crate::context::history;
use crate::context::ledger::LedgerStore;
use crate::context::paths::resolve_paths;
use anyhow::Result;
use std::fs;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");
    report.detail(format!(
        "conversations_dir={}",
        paths.conversations_dir.display()
    ));

    if !paths.conversations_dir.is_dir() {
        report.detail("categories=0 (nothing persisted yet)");
        return Ok(report);
    }

    let mut categories = Vec::new();
    for entry in fs::read_dir(&paths.conversations_dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == "summaries" {
            continue;
        }
        categories.push(name);
    }
    categories.sort();
    report.detail(format!("categories={}", categories.len()));

    for category in categories {
        match history::load_history(&paths, &category) {
            Ok(messages) => {
                report.detail(format!("category.{category}.messages={}", messages.len()));

                let store = LedgerStore::for_category(&paths, &category);
                match store.load() {
                    Ok(entries) => {
                        let marker = if entries.len() >= messages.len() {
                            " (caught up)"
                        } else {
                            ""
                        };
                        report.detail(format!(
                            "category.{category}.ledger={}{marker}",
                            entries.len()
                        ));
                    }
                    Err(err) => {
                        report.issue(format!("category.{category}.ledger unreadable: {err:#}"));
                    }
                }
            }
            Err(err) => {
                report.issue(format!("category.{category}.history unreadable: {err:#}"));
            }
        }
    }

    Ok(report)
}
