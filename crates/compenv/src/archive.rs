// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

//! Packing environment directories into a single compressed file and back.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::Error;

#[cfg(test)]
#[path = "./archive_test.rs"]
mod archive_test;

/// Visitor invoked with each entry's path and contents during a walk.
pub type EntryVisitor<'a> = dyn FnMut(&Path, &mut dyn Read) -> crate::Result<()> + 'a;

/// Capability to pack, inspect and unpack directory archives.
pub trait ArchiveTransport {
    /// File extension of produced archives, without the leading dot.
    fn extension(&self) -> &str;

    /// Write every directory in `sources`, each under its own file name, to `dest`.
    fn pack(&self, sources: &[&Path], dest: &Path) -> crate::Result<()>;

    /// Visit every entry of `file` in order without extracting anything.
    fn walk(&self, file: &Path, visit: &mut EntryVisitor<'_>) -> crate::Result<()>;

    /// Unpack every entry of `file` beneath `dest_root`.
    fn extract(&self, file: &Path, dest_root: &Path) -> crate::Result<()>;
}

/// Gzip-compressed tar archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGz;

impl TarGz {
    fn open(file: &Path) -> crate::Result<tar::Archive<GzDecoder<File>>> {
        let handle = File::open(file).map_err(|e| Error::ReadFailed {
            path: file.to_path_buf(),
            error: e,
        })?;
        Ok(tar::Archive::new(GzDecoder::new(handle)))
    }
}

impl ArchiveTransport for TarGz {
    fn extension(&self) -> &str {
        "tar.gz"
    }

    fn pack(&self, sources: &[&Path], dest: &Path) -> crate::Result<()> {
        let handle = File::create(dest).map_err(|e| Error::WriteFailed {
            path: dest.to_path_buf(),
            error: e,
        })?;
        let mut builder = tar::Builder::new(GzEncoder::new(handle, Compression::default()));
        builder.follow_symlinks(false);

        for source in sources {
            let base = source.parent().unwrap_or_else(|| Path::new(""));
            for entry in walkdir::WalkDir::new(source).sort_by_file_name() {
                let entry = entry?;
                let rel = entry.path().strip_prefix(base).map_err(|_| {
                    Error::ValidationFailed(format!(
                        "{} is not inside {}",
                        entry.path().display(),
                        base.display()
                    ))
                })?;
                if entry.file_type().is_dir() {
                    builder.append_dir(rel, entry.path())?;
                } else {
                    builder.append_path_with_name(entry.path(), rel)?;
                }
            }
        }

        builder.into_inner()?.finish()?;
        tracing::debug!(archive = %dest.display(), "packed archive");
        Ok(())
    }

    fn walk(&self, file: &Path, visit: &mut EntryVisitor<'_>) -> crate::Result<()> {
        let mut archive = Self::open(file)?;
        for entry in archive.entries()? {
            let mut entry = entry?;
            let path = entry.path()?.into_owned();
            visit(&path, &mut entry)?;
        }
        Ok(())
    }

    fn extract(&self, file: &Path, dest_root: &Path) -> crate::Result<()> {
        let mut archive = Self::open(file)?;
        archive.unpack(dest_root).map_err(|e| Error::WriteFailed {
            path: dest_root.to_path_buf(),
            error: e,
        })?;
        tracing::debug!(archive = %file.display(), dest = %dest_root.display(), "extracted archive");
        Ok(())
    }
}
