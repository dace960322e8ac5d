// Loads the virtual file system from a tar archive. Only member names, types
// and sizes are read; file contents are skipped.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::instrument;

use crate::errors::{Result, ShellError, ShellErrorType};
use crate::paths::{resolve, ROOT};
use crate::vfs::{Entry, EntryKind, VirtualFileSystem};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[instrument]
pub fn load_archive(path: &Path) -> Result<VirtualFileSystem> {
    let file = File::open(path).map_err(|e| {
        ShellError::new(
            ShellErrorType::ArchiveError,
            format!("Failed to open archive {}: {}", path.display(), e),
        )
    })?;
    let vfs = load_from_reader(file).map_err(|mut err| {
        err.message = format!("Failed to load archive {}: {}", path.display(), err.message);
        err
    })?;
    tracing::info!(
        "Loaded {} entries from archive {}",
        vfs.len(),
        path.display()
    );
    Ok(vfs)
}

/// Decode a tar stream, gzip-compressed or not, into a file system.
pub fn load_from_reader<R: Read>(reader: R) -> Result<VirtualFileSystem> {
    let mut reader = BufReader::new(reader);
    let is_gzip = {
        let head = reader.fill_buf().map_err(archive_error)?;
        if head.is_empty() {
            return Err(ShellError::new(
                ShellErrorType::ArchiveError,
                "archive is empty".to_string(),
            ));
        }
        head.starts_with(&GZIP_MAGIC)
    };
    if is_gzip {
        tracing::debug!("Archive is gzip compressed");
        decode(GzDecoder::new(reader))
    } else {
        decode(reader)
    }
}

fn decode<R: Read>(reader: R) -> Result<VirtualFileSystem> {
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();
    for member in archive.entries().map_err(archive_error)? {
        let member = member.map_err(archive_error)?;
        let kind = if member.header().entry_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        // Not the raw header field: a PAX `size` record overrides it.
        let size = member.size();
        let name = member.path().map_err(archive_error)?;
        let path = resolve(ROOT, &name.to_string_lossy());
        tracing::debug!("Archive member {} ({:?}, {} bytes)", path, kind, size);
        entries.push(Entry { path, kind, size });
    }
    Ok(VirtualFileSystem::from_entries(entries))
}

fn archive_error(error: std::io::Error) -> ShellError {
    ShellError::new(ShellErrorType::ArchiveError, error.to_string())
}
