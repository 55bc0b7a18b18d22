//! Directory enumeration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

/// A regular file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    /// File name without directory, used as the collection key.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// List the regular files directly inside `dir`.
///
/// Symlinks are followed, so a link to a file counts as a file. Subdirectories
/// are skipped without recursing. Order follows the platform's directory
/// listing and is not guaranteed.
///
/// A file whose name is not valid UTF-8 is an [`io::ErrorKind::InvalidData`]
/// error, since names are used verbatim as collection keys.
pub fn list_files(dir: &Path) -> io::Result<Vec<ReceiptFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // fs::metadata follows symlinks; a dangling link is not a file
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            trace!("Skipping non-file entry {}", path.display());
            continue;
        }

        let name = entry.file_name().into_string().map_err(|raw| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file name is not valid UTF-8: {}", raw.to_string_lossy()),
            )
        })?;

        files.push(ReceiptFile { name, path });
    }

    Ok(files)
}
