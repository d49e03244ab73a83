//! Load progress reporting.
//!
//! Reports observable progress while batches are written so users see how
//! much of the corpus has been sent. Progress is emitted on **stderr** so
//! stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for a load.
#[derive(Clone, Debug)]
pub enum LoadProgressEvent {
    /// Schema or reset step in progress.
    Preparing { step: &'static str },
    /// Batch `n` of `batches` written; `documents` of `total` sent so far.
    Batch {
        n: u64,
        batches: u64,
        documents: u64,
        total: u64,
    },
}

/// Reports load progress. Implementations write to stderr (human or JSON).
pub trait LoadProgressReporter: Send + Sync {
    fn report(&self, event: LoadProgressEvent);
}

/// Human-friendly progress on stderr: "load  batch 2 / 4  500 / 1,000 documents".
pub struct StderrProgress;

impl LoadProgressReporter for StderrProgress {
    fn report(&self, event: LoadProgressEvent) {
        let line = match &event {
            LoadProgressEvent::Preparing { step } => format!("load  {}...\n", step),
            LoadProgressEvent::Batch {
                n,
                batches,
                documents,
                total,
            } => format!(
                "load  batch {} / {}  {} / {} documents\n",
                n,
                batches,
                format_number(*documents),
                format_number(*total)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl LoadProgressReporter for JsonProgress {
    fn report(&self, event: LoadProgressEvent) {
        let obj = match &event {
            LoadProgressEvent::Preparing { step } => serde_json::json!({
                "event": "progress",
                "phase": "preparing",
                "step": step
            }),
            LoadProgressEvent::Batch {
                n,
                batches,
                documents,
                total,
            } => serde_json::json!({
                "event": "progress",
                "phase": "loading",
                "batch": n,
                "batches": batches,
                "documents": documents,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl LoadProgressReporter for NoProgress {
    fn report(&self, _event: LoadProgressEvent) {}
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn LoadProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
