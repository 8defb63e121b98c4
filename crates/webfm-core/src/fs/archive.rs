//! Tarball creation/extraction and recursive folder removal.
//!
//! Exposed as a capability trait; the web layer holds an
//! `Arc<dyn ArchiveOps>` and never builds shell command lines.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{CoreError, CoreResult};

/// Archive and bulk-removal operations.
pub trait ArchiveOps: Send + Sync {
    /// Packs `folder` into a gzip-compressed tarball at `archive_path`.
    fn compress(&self, folder: &Path, archive_path: &Path) -> CoreResult<()>;

    /// Unpacks `archive_path` into `target`, or next to the archive when
    /// `target` is `None` or empty. Returns the directory unpacked into.
    fn extract(&self, archive_path: &Path, target: Option<&Path>) -> CoreResult<PathBuf>;

    /// Recursively deletes `folder`.
    fn remove_tree(&self, folder: &Path) -> CoreResult<()>;
}

/// [`ArchiveOps`] backed by the `tar` and `flate2` crates.
#[derive(Debug, Clone, Copy)]
pub struct TarGzArchiver {
    level: u32,
}

impl TarGzArchiver {
    /// Creates an archiver using gzip `level` (clamped to 0–9).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for TarGzArchiver {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ArchiveOps for TarGzArchiver {
    fn compress(&self, folder: &Path, archive_path: &Path) -> CoreResult<()> {
        let meta = std::fs::metadata(folder).map_err(|e| CoreError::from_io(folder, e))?;
        if !meta.is_dir() {
            return Err(CoreError::NotADirectory(folder.to_path_buf()));
        }
        let base_name = folder
            .file_name()
            .ok_or_else(|| CoreError::InvalidName(folder.display().to_string()))?;

        if writes_inside(folder, archive_path) {
            return Err(CoreError::Archive(format!(
                "{} is inside the folder being archived",
                archive_path.display()
            )));
        }

        let level = Compression::new(self.level);
        write_or_discard(archive_path, |file| {
            let mut builder = tar::Builder::new(GzEncoder::new(file, level));
            builder.follow_symlinks(false);
            builder.append_dir_all(base_name, folder).map_err(|e| {
                CoreError::Archive(format!("failed to add {}: {e}", folder.display()))
            })?;
            let encoder = builder
                .into_inner()
                .map_err(|e| CoreError::Archive(format!("failed to finish tar stream: {e}")))?;
            encoder
                .finish()
                .map_err(|e| CoreError::Archive(format!("failed to finish gzip stream: {e}")))?;
            Ok(())
        })?;

        tracing::info!(
            "compressed {} -> {} (level {})",
            folder.display(),
            archive_path.display(),
            self.level
        );
        Ok(())
    }

    fn extract(&self, archive_path: &Path, target: Option<&Path>) -> CoreResult<PathBuf> {
        let target = match target {
            Some(t) if !t.as_os_str().is_empty() => t.to_path_buf(),
            _ => default_extract_target(archive_path),
        };
        if !target.is_dir() {
            return Err(if target.exists() {
                CoreError::NotADirectory(target)
            } else {
                CoreError::NotFound(target)
            });
        }

        let file = File::open(archive_path).map_err(|e| CoreError::from_io(archive_path, e))?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        // unpack() skips entries whose paths would escape `target`
        archive.unpack(&target).map_err(|e| {
            CoreError::Archive(format!("failed to extract {}: {e}", archive_path.display()))
        })?;

        tracing::info!("extracted {} into {}", archive_path.display(), target.display());
        Ok(target)
    }

    fn remove_tree(&self, folder: &Path) -> CoreResult<()> {
        if folder.as_os_str().is_empty() || folder.parent().is_none() {
            return Err(CoreError::InvalidName(folder.display().to_string()));
        }
        let meta = std::fs::symlink_metadata(folder).map_err(|e| CoreError::from_io(folder, e))?;
        if !meta.is_dir() {
            return Err(CoreError::NotADirectory(folder.to_path_buf()));
        }
        std::fs::remove_dir_all(folder).map_err(|e| CoreError::from_io(folder, e))?;
        tracing::info!("removed tree {}", folder.display());
        Ok(())
    }
}

/// Creates `path` and hands it to `write`, removing the partial file if
/// `write` fails.
fn write_or_discard<F>(path: &Path, write: F) -> CoreResult<()>
where
    F: FnOnce(File) -> CoreResult<()>,
{
    let file = File::create(path).map_err(|e| CoreError::from_io(path, e))?;
    write(file).inspect_err(|e| {
        tracing::warn!("discarding partial archive {}: {e}", path.display());
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!("failed to remove {}: {rm}", path.display());
        }
    })
}

fn default_extract_target(archive_path: &Path) -> PathBuf {
    match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn writes_inside(folder: &Path, archive_path: &Path) -> bool {
    let Ok(folder) = folder.canonicalize() else {
        return false;
    };
    let parent = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent
        .canonicalize()
        .map(|p| p.starts_with(&folder))
        .unwrap_or(false)
}
