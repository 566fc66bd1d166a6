//! Log file setup.
//!
//! Records are appended to `extsort.log` under the user state directory. If
//! that file cannot be opened, `main` installs a stderr-only subscriber
//! limited to warnings instead.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const DEFAULT_FILTER: &str = "info";

/// Destination for one batch of log output.
///
/// Each record gets its own handle to the shared append-mode log file. When
/// the handle cannot be duplicated the record still reaches the user on
/// stderr instead of being dropped.
enum LogSink {
    Append(fs::File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Append(file) => file.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Append(file) => file.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Hands `tracing-subscriber` a fresh [`LogSink`] per record.
struct AppendLog(fs::File);

impl<'a> MakeWriter<'a> for AppendLog {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(file) => LogSink::Append(file),
            Err(_) => LogSink::Stderr,
        }
    }
}

/// Default log location: `<state dir>/extsort/extsort.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("extsort").join("extsort.log"))
}

/// Opens `path` for appending, creating it and its parent directory.
pub fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize timestamped, leveled logging to `log_path` (or the default
/// location).
///
/// On failure the subscriber is left uninstalled so the caller can fall back
/// to [`init_logging_stderr`].
pub fn init_logging(log_path: Option<&Path>) -> io::Result<PathBuf> {
    let log_file_path = match log_path {
        Some(path) => path.to_path_buf(),
        None => default_log_path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no state directory for log file")
        })?,
    };

    let file = open_log_file(&log_file_path)?;
    let writer = BoxMakeWriter::new(AppendLog(file));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("logging to {}", log_file_path.display());

    Ok(log_file_path)
}

/// Initialize logging to stderr only, warnings and above, so it does not
/// duplicate the console report.
pub fn init_logging_stderr() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("extsort.log");

        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "first").unwrap();
        }
        {
            let mut file = open_log_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_make_writer_writes_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");
        let maker = AppendLog(open_log_file(&path).unwrap());

        let mut writer = maker.make_writer();
        writer.write_all(b"hello").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }
}
