//! Extension-based file classification.
//!
//! Every file is assigned to exactly one category folder derived from the
//! literal text of its final extension: `report.pdf` goes to `PDF_Files`,
//! `README` goes to `No_Extension`.
//!
//! # Examples
//!
//! ```
//! use extsort::file_category::{CategoryFolder, extension_of};
//!
//! assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
//! assert_eq!(CategoryFolder::for_file_name("photo.JPG").as_str(), "JPG_Files");
//! assert_eq!(CategoryFolder::for_file_name("README").as_str(), "No_Extension");
//! ```

use std::fmt;

/// Folder name used for files without an extension.
pub const NO_EXTENSION_DIR: &str = "No_Extension";

/// Suffix appended to the upper-cased extension.
pub const FOLDER_SUFFIX: &str = "_Files";

/// A sanitized destination folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryFolder(String);

impl CategoryFolder {
    /// Classifies a file name into its category folder.
    ///
    /// Only the final suffix counts, so `archive.tar.gz` lands in `GZ_Files`.
    pub fn for_file_name(file_name: &str) -> Self {
        Self::for_extension(extension_of(file_name).as_deref())
    }

    /// Builds the folder for an already extracted extension.
    pub fn for_extension(extension: Option<&str>) -> Self {
        let raw = match extension {
            Some(ext) => format!("{}{}", ext.to_uppercase(), FOLDER_SUFFIX),
            None => NO_EXTENSION_DIR.to_string(),
        };
        Self(sanitize_folder_name(&raw))
    }

    /// Returns the folder name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for CategoryFolder {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

/// Returns the lower-cased extension of a file name, without the dot.
///
/// Leading dots do not start an extension, so hidden files such as `.bashrc`
/// have none, while `.config.json` has `json`. A trailing dot (`notes.`)
/// gives an empty extension, which files under `_Files`.
pub fn extension_of(file_name: &str) -> Option<String> {
    let stem_and_ext = file_name.trim_start_matches('.');
    let (_, ext) = stem_and_ext.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

/// Keeps only alphanumeric characters, `_`, `-` and space.
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension_of("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(extension_of("report.pdf"), Some("pdf".to_string()));
    }

    #[test]
    fn test_only_final_suffix_counts() {
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(
            CategoryFolder::for_file_name("archive.tar.gz").as_str(),
            "GZ_Files"
        );
    }

    #[test]
    fn test_names_without_extension() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("..hidden"), None);
        assert_eq!(extension_of(""), None);
    }

    #[test]
    fn test_trailing_dot_gives_empty_extension() {
        assert_eq!(extension_of("notes."), Some(String::new()));
        assert_eq!(extension_of(".bashrc."), Some(String::new()));
        assert_eq!(CategoryFolder::for_file_name("notes.").as_str(), "_Files");
    }

    #[test]
    fn test_hidden_file_with_extension() {
        assert_eq!(extension_of(".config.json"), Some("json".to_string()));
    }

    #[test]
    fn test_folder_names() {
        assert_eq!(CategoryFolder::for_file_name("a.zip").as_str(), "ZIP_Files");
        assert_eq!(CategoryFolder::for_file_name("Makefile").as_str(), NO_EXTENSION_DIR);
        assert_eq!(CategoryFolder::for_extension(Some("mp3")).to_string(), "MP3_Files");
    }

    #[test]
    fn test_sanitize_drops_unsafe_characters() {
        assert_eq!(sanitize_folder_name("A/B\\C:*?_Files"), "ABC_Files");
        assert_eq!(sanitize_folder_name("my-ext 2_Files"), "my-ext 2_Files");
        assert_eq!(
            CategoryFolder::for_file_name("weird.t$x!t").as_str(),
            "TXT_Files"
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in ["PDF_Files", "No_Extension", "a$b%c", "...", "ÄÖ_Files", ""] {
            let once = sanitize_folder_name(raw);
            assert_eq!(sanitize_folder_name(&once), once);
        }
    }

    #[test]
    fn test_extension_of_only_symbols_collapses_to_suffix() {
        assert_eq!(CategoryFolder::for_file_name("odd.$$$").as_str(), "_Files");
    }
}
