use std::fmt::{Display, Formatter};

use tracing::{error, info, warn};

use crate::google_drive::DriveId;

/// Per-file result of a mirror run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    Copied {
        path: String,
        name: String,
        id: DriveId,
    },
    Skipped {
        path: String,
    },
    /// Dry run: the file would have been copied.
    Planned {
        path: String,
    },
    Unsupported {
        path: String,
        mime_type: String,
    },
    Failed {
        path: String,
        error: String,
    },
}

impl MirrorEvent {
    pub fn path(&self) -> &str {
        match self {
            MirrorEvent::Copied { path, .. }
            | MirrorEvent::Skipped { path }
            | MirrorEvent::Planned { path }
            | MirrorEvent::Unsupported { path, .. }
            | MirrorEvent::Failed { path, .. } => path,
        }
    }
}

/// Receives every event as soon as the file it describes is done.
pub trait MirrorObserver: Send + Sync {
    fn on_event(&self, event: &MirrorEvent);
}

/// Reports events as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MirrorObserver for TracingObserver {
    fn on_event(&self, event: &MirrorEvent) {
        match event {
            MirrorEvent::Copied { path, name, id } => info!("copied {} as {} ({})", path, name, id),
            MirrorEvent::Skipped { path } => info!("skipped (up to date): {}", path),
            MirrorEvent::Planned { path } => info!("would copy: {}", path),
            MirrorEvent::Unsupported { path, mime_type } => {
                warn!("skipped unsupported native type {}: {}", mime_type, path)
            }
            MirrorEvent::Failed { path, error } => error!("failed to copy {}: {}", path, error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Totals of a run plus every per-file failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub copied: usize,
    pub skipped: usize,
    pub planned: usize,
    pub unsupported: usize,
    pub failures: Vec<FileFailure>,
    /// The run stopped before every source file was processed.
    pub cancelled: bool,
}

impl MirrorSummary {
    pub fn record(&mut self, event: &MirrorEvent) {
        match event {
            MirrorEvent::Copied { .. } => self.copied += 1,
            MirrorEvent::Skipped { .. } => self.skipped += 1,
            MirrorEvent::Planned { .. } => self.planned += 1,
            MirrorEvent::Unsupported { .. } => self.unsupported += 1,
            MirrorEvent::Failed { path, error } => self.failures.push(FileFailure {
                path: path.clone(),
                error: error.clone(),
            }),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl Display for MirrorSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "copied: {}, skipped: {}, unsupported: {}, failed: {}",
            self.copied,
            self.skipped,
            self.unsupported,
            self.failures.len()
        )?;
        if self.planned > 0 {
            write!(f, ", would copy: {}", self.planned)?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_events_and_keeps_failures() {
        let mut summary = MirrorSummary::default();
        summary.record(&MirrorEvent::Skipped {
            path: "a".to_string(),
        });
        summary.record(&MirrorEvent::Failed {
            path: "b".to_string(),
            error: "quota exceeded".to_string(),
        });
        assert_eq!(summary.skipped, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.failures[0].path, "b");
        assert_eq!(
            summary.to_string(),
            "copied: 0, skipped: 1, unsupported: 0, failed: 1"
        );
    }
}
