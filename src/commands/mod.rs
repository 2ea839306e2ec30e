pub mod ask;
pub mod chat;
pub mod status;

use crate::context::ingest::FileReference;
use serde::Serialize;
use std::path::PathBuf;

/// Shared per-invocation inputs for the chat commands.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    pub profile: String,
    pub files: Vec<PathBuf>,
    pub no_summary_files: Vec<PathBuf>,
}

impl TurnOptions {
    /// Typed file references, summarizable files first, order preserved
    /// within each list.
    pub fn file_references(&self) -> Vec<FileReference> {
        let mut refs = Vec::with_capacity(self.files.len() + self.no_summary_files.len());
        refs.extend(self.files.iter().map(|p| FileReference::new(p, true)));
        refs.extend(
            self.no_summary_files
                .iter()
                .map(|p| FileReference::new(p, false)),
        );
        refs
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "[{}] {}\n",
            self.command,
            if self.ok { "ok" } else { "issues found" }
        ));
        for detail in &self.details {
            out.push_str(&format!("  {detail}\n"));
        }
        for issue in &self.issues {
            out.push_str(&format!("  ! {issue}\n"));
        }
        out
    }
}
