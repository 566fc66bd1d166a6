//! Events emitted while a pass runs.
//!
//! The pass never prints or logs on its own. It hands every lifecycle and
//! per-entry event to an [`EventSink`], which decides where the event goes:
//! the log file, the console, or a buffer in tests.

use crate::pass::{EntryOutcome, EntryStatus, PassError, PassReport};
use std::fmt;
use std::path::Path;

/// Severity attached to every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
    /// A failure that ends the pass.
    Critical,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventLevel::Info => "INFO",
            EventLevel::Warning => "WARNING",
            EventLevel::Error => "ERROR",
            EventLevel::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// A single thing that happened during a pass.
#[derive(Debug, Clone, Copy)]
pub enum PassEvent<'a> {
    /// The snapshot was taken and processing begins.
    Started {
        target: &'a Path,
        entries: usize,
        dry_run: bool,
    },
    /// One entry reached its final state.
    Entry(&'a EntryOutcome),
    /// Every entry of the snapshot was handled.
    Completed(&'a PassReport),
    /// The pass stopped before completing.
    Aborted(&'a PassError),
}

impl PassEvent<'_> {
    /// Returns the severity of this event.
    pub fn level(&self) -> EventLevel {
        match self {
            PassEvent::Started { .. } => EventLevel::Info,
            PassEvent::Entry(outcome) => match outcome.status {
                EntryStatus::Failed { .. } => EventLevel::Error,
                _ => EventLevel::Info,
            },
            PassEvent::Completed(report) if report.failed_count() > 0 => EventLevel::Warning,
            PassEvent::Completed(_) => EventLevel::Info,
            PassEvent::Aborted(_) => EventLevel::Critical,
        }
    }
}

impl fmt::Display for PassEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassEvent::Started {
                target,
                entries,
                dry_run,
            } => {
                let mode = if *dry_run { " (dry run)" } else { "" };
                write!(
                    f,
                    "Organizing {} entries in {}{}",
                    entries,
                    target.display(),
                    mode
                )
            }
            PassEvent::Entry(outcome) => match &outcome.status {
                EntryStatus::Skipped => write!(f, "Skipped directory {}", outcome.name),
                EntryStatus::Moved { folder, .. } => {
                    write!(f, "Moved {} to {}", outcome.name, folder)
                }
                EntryStatus::Planned { folder } => {
                    write!(f, "Would move {} to {}", outcome.name, folder)
                }
                EntryStatus::Failed { error, .. } => {
                    write!(f, "Error moving {}: {}", outcome.name, error)
                }
            },
            PassEvent::Completed(report) => write!(
                f,
                "Pass complete: {} moved, {} skipped, {} failed",
                report.moved_count(),
                report.skipped_count(),
                report.failed_count()
            ),
            PassEvent::Aborted(error) => write!(f, "Pass aborted: {}", error),
        }
    }
}

/// Receives the events of a pass.
pub trait EventSink {
    /// Records one event.
    fn record(&mut self, event: &PassEvent<'_>);
}

/// Forwards events to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &PassEvent<'_>) {
        emit_tracing(event);
    }
}

/// Emits one event through `tracing`.
///
/// `tracing` has no critical level, so critical events are logged as errors
/// carrying `critical = true`.
pub fn emit_tracing(event: &PassEvent<'_>) {
    match event.level() {
        EventLevel::Info => tracing::info!("{}", event),
        EventLevel::Warning => tracing::warn!("{}", event),
        EventLevel::Error => tracing::error!("{}", event),
        EventLevel::Critical => tracing::error!(critical = true, "{}", event),
    }
}

/// Keeps rendered events in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub events: Vec<(EventLevel, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: EventLevel) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &PassEvent<'_>) {
        self.events.push((event.level(), event.to_string()));
    }
}
