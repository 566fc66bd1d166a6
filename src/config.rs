//! Target directory configuration.
//!
//! The directory to organize comes from, in order of precedence:
//! 1. the command-line argument
//! 2. the `target_directory` value of a JSON configuration file
//! 3. the platform's downloads folder
//!
//! # Configuration File Format
//!
//! ```json
//! { "target_directory": "~/Downloads" }
//! ```
//!
//! The value may also be the token `"downloads"` (any case), which selects
//! the platform downloads folder. Keys other than `target_directory` (or its
//! alias `downloads_path`) are ignored.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".extsort.json";

/// Token selecting the platform downloads folder.
pub const DOWNLOADS_TOKEN: &str = "downloads";

/// Errors that can occur while loading configuration or resolving the target.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("invalid configuration in {}: {source}", .path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// No CLI path, no configured path, and no home directory to fall back on.
    #[error("could not determine the downloads directory for this platform")]
    NoDefaultDirectory,
}

/// Deserialized configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrganizerConfig {
    #[serde(default, alias = "downloads_path")]
    pub target_directory: Option<String>,
}

/// What the configuration asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfiguredTarget {
    /// The platform downloads folder.
    Downloads,
    Path(PathBuf),
}

impl ConfiguredTarget {
    /// Interprets a configured value. Blank values mean "not configured".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case(DOWNLOADS_TOKEN) {
            Some(Self::Downloads)
        } else {
            Some(Self::Path(expand_user(Path::new(value))))
        }
    }
}

impl OrganizerConfig {
    /// Loads configuration, searching the default locations when no path is
    /// given.
    ///
    /// Lookup order without an explicit path:
    /// 1. `.extsort.json` in the current directory
    /// 2. `<config dir>/extsort/config.json`
    ///
    /// Returns `Ok(None)` when nothing was found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or if any
    /// file found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).map(Some);
        }

        for candidate in default_config_paths() {
            if candidate.is_file() {
                tracing::debug!("using configuration file {}", candidate.display());
                return Self::load_from_file(&candidate).map(Some);
            }
        }

        Ok(None)
    }

    /// Loads configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ConfigInvalid {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The configured target, if any.
    pub fn target(&self) -> Option<ConfiguredTarget> {
        self.target_directory.as_deref().and_then(ConfiguredTarget::parse)
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("extsort").join("config.json"));
    }
    paths
}

/// Where the resolved target came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    CommandLine,
    ConfigFile,
    PlatformDefault,
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetSource::CommandLine => "command line",
            TargetSource::ConfigFile => "configuration file",
            TargetSource::PlatformDefault => "platform default",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub source: TargetSource,
}

/// Picks the target directory: CLI path, then configured value, then the
/// platform default.
///
/// # Errors
///
/// Returns [`ConfigError::NoDefaultDirectory`] when the platform default is
/// needed but unknown.
pub fn resolve_target_dir(
    cli_path: Option<&Path>,
    configured: Option<&ConfiguredTarget>,
    platform_default: Option<PathBuf>,
) -> Result<ResolvedTarget, ConfigError> {
    if let Some(path) = cli_path {
        return Ok(ResolvedTarget {
            path: expand_user(path),
            source: TargetSource::CommandLine,
        });
    }

    match configured {
        Some(ConfiguredTarget::Path(path)) => Ok(ResolvedTarget {
            path: path.clone(),
            source: TargetSource::ConfigFile,
        }),
        Some(ConfiguredTarget::Downloads) => platform_default
            .map(|path| ResolvedTarget {
                path,
                source: TargetSource::ConfigFile,
            })
            .ok_or(ConfigError::NoDefaultDirectory),
        None => platform_default
            .map(|path| ResolvedTarget {
                path,
                source: TargetSource::PlatformDefault,
            })
            .ok_or(ConfigError::NoDefaultDirectory),
    }
}

/// The user's downloads folder.
///
/// Uses the platform's registered downloads location, falling back to
/// `~/Downloads`.
pub fn default_downloads_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

/// Expands a leading `~` to the home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
