//! Batch copy with a destination conflict policy.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::fs::ops::same_file;

/// Decides whether an existing destination file blocks a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Always copy, replacing whatever is at the destination.
    Overwrite,
    /// Copy only when the destination does not exist yet.
    SkipExisting,
    /// Copy when the destination is missing or strictly older than the source.
    NewerOnly,
}

impl CopyPolicy {
    /// The tag used by forms and the HTTP API.
    pub fn tag(self) -> &'static str {
        match self {
            CopyPolicy::Overwrite => "overwrite",
            CopyPolicy::SkipExisting => "skip_existing",
            CopyPolicy::NewerOnly => "check_date",
        }
    }
}

impl FromStr for CopyPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(CopyPolicy::Overwrite),
            "skip_existing" => Ok(CopyPolicy::SkipExisting),
            "check_date" => Ok(CopyPolicy::NewerOnly),
            other => Err(CoreError::UnknownTag {
                kind: "copy policy",
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CopyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Outcome of [`copy_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyResult {
    /// Files actually written. Skipped candidates are not counted.
    pub copied: usize,
}

/// Computes `destination/basename(candidate)`.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if `candidate` does not end in a normal
/// component (`/`, `..`, empty).
pub fn destination_for(candidate: &Path, destination: &Path) -> CoreResult<PathBuf> {
    match candidate.components().next_back() {
        Some(Component::Normal(name)) => Ok(destination.join(name)),
        _ => Err(CoreError::InvalidName(candidate.display().to_string())),
    }
}

/// Applies `policy` to a single source/destination pair.
///
/// Only reads metadata; never writes.
pub fn should_copy(source: &Path, dest_path: &Path, policy: CopyPolicy) -> CoreResult<bool> {
    match policy {
        CopyPolicy::Overwrite => Ok(true),
        // a dangling symlink still occupies the name
        CopyPolicy::SkipExisting => Ok(std::fs::symlink_metadata(dest_path).is_err()),
        CopyPolicy::NewerOnly => {
            let dest_meta = match std::fs::metadata(dest_path) {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
                Err(e) => return Err(CoreError::from_io(dest_path, e)),
            };
            let src_meta =
                std::fs::metadata(source).map_err(|e| CoreError::from_io(source, e))?;
            let src_time = src_meta.modified()?;
            let dest_time = dest_meta.modified()?;
            // equal timestamps count as "not newer"
            Ok(src_time > dest_time)
        }
    }
}

/// Copies each of `paths` into `destination` under `policy`, in order.
///
/// Returns how many files were written. A candidate that already is the
/// destination file is skipped. The first failing candidate aborts the
/// batch; files copied before it stay in place.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if `paths` is empty.
/// - [`CoreError::InvalidName`] if a candidate has no file name.
/// - [`CoreError::NotFound`] if a source does not exist.
/// - [`CoreError::PermissionDenied`] / [`CoreError::Io`] if a copy fails.
///
/// # Examples
///
/// ```no_run
/// use webfm_core::{copy_batch, CopyPolicy};
/// use std::path::{Path, PathBuf};
///
/// let sources = vec![PathBuf::from("/data/a.txt"), PathBuf::from("/data/b.txt")];
/// let result = copy_batch(&sources, Path::new("/backup"), CopyPolicy::SkipExisting).unwrap();
/// println!("{} file(s) copied", result.copied);
/// ```
pub fn copy_batch(
    paths: &[PathBuf],
    destination: &Path,
    policy: CopyPolicy,
) -> CoreResult<CopyResult> {
    if paths.is_empty() {
        return Err(CoreError::EmptyInput("path list"));
    }

    let mut result = CopyResult::default();

    for source in paths {
        let dest_path = destination_for(source, destination)?;

        if std::fs::symlink_metadata(source).is_err() {
            return Err(CoreError::NotFound(source.clone()));
        }

        if same_file(source, &dest_path) {
            tracing::debug!("skip {} (already in destination)", source.display());
            continue;
        }

        if !should_copy(source, &dest_path, policy)? {
            tracing::debug!("skip {} ({policy})", source.display());
            continue;
        }

        std::fs::copy(source, &dest_path).map_err(|e| {
            tracing::warn!(
                "copy {} -> {} failed: {e}",
                source.display(),
                dest_path.display()
            );
            CoreError::from_io(&dest_path, e)
        })?;
        tracing::debug!("copied {} -> {}", source.display(), dest_path.display());
        result.copied += 1;
    }

    tracing::info!(
        "batch copy into {} ({policy}): {}/{} copied",
        destination.display(),
        result.copied,
        paths.len()
    );
    Ok(result)
}
