//! extsort - sort a cluttered folder into one subdirectory per file extension
//!
//! This library classifies files by their final extension, moves them into
//! `<EXT>_Files` (or `No_Extension`) folders inside the directory being
//! organized, and reports every step to an injected event sink.

pub mod cli;
pub mod config;
pub mod events;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod pass;

pub use config::{ConfigError, ConfiguredTarget, OrganizerConfig, ResolvedTarget, TargetSource};
pub use events::{EventLevel, EventSink, MemorySink, PassEvent, TracingSink};
pub use file_category::CategoryFolder;
pub use file_organizer::{FileOrganizer, OrganizeError};
pub use pass::{EntryOutcome, EntryStatus, OrganizerPass, PassError, PassReport};

pub use cli::{Cli, CliError, run_cli};
