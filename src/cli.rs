//! Command-line interface module for extsort.
//!
//! This module handles:
//! - Argument parsing
//! - Target directory resolution (CLI, config file, platform default)
//! - Running the organizer pass with console and log reporting
//! - The closing summary

use crate::config::{
    ConfigError, ConfiguredTarget, OrganizerConfig, default_downloads_dir, resolve_target_dir,
};
use crate::events::{EventSink, PassEvent, emit_tracing};
use crate::output::OutputFormatter;
use crate::pass::{EntryStatus, PassError, PassReport, organize_directory};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::PathBuf;
use thiserror::Error;

/// Sort the files of a folder into one subdirectory per extension.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "extsort", version)]
#[command(about = "Sort files into <EXT>_Files folders by extension", long_about = None)]
pub struct Cli {
    /// Directory to organize. Defaults to the configured directory, then to
    /// your Downloads folder.
    pub directory: Option<PathBuf>,

    /// JSON configuration file with a `target_directory` key.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show where files would go without moving anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Append log records to this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Errors that end a CLI run with a failure status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pass(#[from] PassError),
}

/// Runs one organizer pass as described by `cli`.
///
/// Per-file failures are reported but still produce `Ok`; only failures
/// that prevent or abort the pass return an error.
///
/// # Examples
///
/// ```no_run
/// use extsort::cli::{Cli, run_cli};
/// use std::path::PathBuf;
///
/// let cli = Cli {
///     directory: Some(PathBuf::from("/path/to/directory")),
///     ..Default::default()
/// };
/// match run_cli(&cli) {
///     Ok(report) => println!("{} files moved", report.moved_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<PassReport, CliError> {
    OutputFormatter::info("Starting file organizer...");

    let configured = if cli.directory.is_none() {
        load_configured_target(cli)
    } else {
        None
    };

    let resolved = resolve_target_dir(
        cli.directory.as_deref(),
        configured.as_ref(),
        default_downloads_dir(),
    )?;
    tracing::info!(
        "target directory {} (from {})",
        resolved.path.display(),
        resolved.source
    );
    OutputFormatter::info(&format!(
        "Organizing files in {} (from {})",
        resolved.path.display(),
        resolved.source
    ));

    let mut reporter = ConsoleReporter::default();
    let report = organize_directory(&resolved.path, cli.dry_run, &mut reporter)?;

    print_summary(&report);
    Ok(report)
}

/// Reads the configured target, downgrading config problems to warnings.
fn load_configured_target(cli: &Cli) -> Option<ConfiguredTarget> {
    match OrganizerConfig::load(cli.config.as_deref()) {
        Ok(Some(config)) => config.target(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("ignoring configuration: {}", e);
            OutputFormatter::warning(&format!(
                "Ignoring configuration ({}); using the default directory",
                e
            ));
            None
        }
    }
}

fn print_summary(report: &PassReport) {
    let total = report.moved_count() + report.planned_count();
    OutputFormatter::summary_table(&report.folder_counts(), total);

    if report.skipped_count() > 0 {
        OutputFormatter::plain(&format!(
            "Skipped {} director{}",
            report.skipped_count(),
            if report.skipped_count() == 1 { "y" } else { "ies" }
        ));
    }

    let failed = report.failed_count();
    if failed > 0 {
        OutputFormatter::warning(&format!(
            "{} file{} could not be moved. Please review the errors above.",
            failed,
            if failed == 1 { "" } else { "s" }
        ));
    }

    let elapsed_ms = report.duration().num_milliseconds();
    if report.dry_run {
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
        OutputFormatter::plain(&format!(
            "Run 'extsort {}' (without --dry-run) to execute the organization.",
            report.target.display()
        ));
    } else {
        OutputFormatter::success(&format!("Organization complete in {} ms.", elapsed_ms));
    }
}

/// Prints pass events to the console and forwards them to the log.
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    fn print(&self, f: impl FnOnce()) {
        match &self.progress {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl EventSink for ConsoleReporter {
    fn record(&mut self, event: &PassEvent<'_>) {
        emit_tracing(event);

        match event {
            PassEvent::Started { entries, .. } => {
                OutputFormatter::plain(&event.to_string());
                self.progress = Some(OutputFormatter::create_progress_bar(*entries as u64));
            }
            PassEvent::Entry(outcome) => {
                let message = event.to_string();
                self.print(|| match outcome.status {
                    EntryStatus::Skipped => OutputFormatter::plain(&format!("  {}", message)),
                    EntryStatus::Moved { .. } => OutputFormatter::success(&message),
                    EntryStatus::Planned { .. } => OutputFormatter::dry_run_notice(&message),
                    EntryStatus::Failed { .. } => OutputFormatter::error(&message),
                });
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
            }
            PassEvent::Completed(_) | PassEvent::Aborted(_) => {
                if let Some(pb) = self.progress.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_positional_directory() {
        let cli = Cli::try_parse_from(["extsort", "/tmp/inbox"]).unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp/inbox")));
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "extsort",
            "--dry-run",
            "--config",
            "cfg.json",
            "--log-file",
            "run.log",
        ])
        .unwrap();

        assert!(cli.directory.is_none());
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_short_dry_run_flag() {
        let cli = Cli::try_parse_from(["extsort", "-n", "."]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Cli::try_parse_from(["extsort", "a", "b"]).is_err());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ target_directory: ").unwrap();

        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        assert_eq!(load_configured_target(&cli), None);
    }

    #[test]
    fn test_missing_config_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();

        let cli = Cli {
            config: Some(temp_dir.path().join("absent.json")),
            ..Default::default()
        };
        assert_eq!(load_configured_target(&cli), None);
    }

    #[test]
    fn test_valid_config_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("extsort.json");
        fs::write(&path, r#"{"target_directory": "Downloads"}"#).unwrap();

        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        assert_eq!(
            load_configured_target(&cli),
            Some(ConfiguredTarget::Downloads)
        );
    }
}
