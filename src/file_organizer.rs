//! Moving single files into their category folders.
//!
//! This module holds the per-entry move primitive used by the organizer pass.
//! It ensures the category folder exists, refuses to overwrite an existing
//! destination, and relocates the file.

use crate::file_category::CategoryFolder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while organizing one entry.
///
/// These never abort a pass; they are recorded against the entry they
/// concern.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The category path exists but is not a directory.
    #[error("{} exists and is not a directory", .path.display())]
    CategoryNotADirectory { path: PathBuf },
    /// A file with the same name already sits in the category folder.
    #[error("destination {} already exists", .path.display())]
    DestinationExists { path: PathBuf },
    /// Failed to move a file to its category directory.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category subdirectories of a base directory.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates the category folder under `base_path` if it is missing.
    ///
    /// Missing ancestors are created too, and an already existing folder is
    /// not an error, so repeated calls are harmless.
    pub fn ensure_category_dir(
        base_path: &Path,
        folder: &CategoryFolder,
    ) -> OrganizeResult<PathBuf> {
        let category_path = base_path.join(folder);

        fs::create_dir_all(&category_path).map_err(|e| {
            if category_path.exists() && !category_path.is_dir() {
                OrganizeError::CategoryNotADirectory {
                    path: category_path.clone(),
                }
            } else {
                OrganizeError::DirectoryCreationFailed {
                    path: category_path.clone(),
                    source: e,
                }
            }
        })?;

        Ok(category_path)
    }

    /// Moves a file into its category directory and returns its new path.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The directory holding the category folders
    /// * `file_path` - The full path of the file to move
    /// * `folder` - The category folder for this file
    ///
    /// # Errors
    ///
    /// Fails when the folder cannot be created, when the destination already
    /// exists, or when the move itself is refused by the filesystem.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extsort::file_category::CategoryFolder;
    /// use extsort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let folder = CategoryFolder::for_file_name("image.png");
    /// match FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     &folder,
    /// ) {
    ///     Ok(new_path) => println!("Moved to {}", new_path.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        folder: &CategoryFolder,
    ) -> OrganizeResult<PathBuf> {
        let category_path = Self::ensure_category_dir(base_path, folder)?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            })?;
        let destination_path = category_path.join(file_name);

        // symlink_metadata so a dangling link at the destination still counts
        if fs::symlink_metadata(&destination_path).is_ok() {
            return Err(OrganizeError::DestinationExists {
                path: destination_path,
            });
        }

        move_file(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source: e,
        })?;

        Ok(destination_path)
    }
}

/// Renames `from` to `to`, copying and deleting when they sit on different
/// filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            if let Err(remove_err) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(remove_err);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
