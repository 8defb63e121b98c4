//! Single-step file operations.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Creates a single directory. The parent must already exist.
///
/// # Errors
///
/// - [`CoreError::AlreadyExists`] if `path` exists.
/// - [`CoreError::NotFound`] if the parent is missing.
pub fn make_directory(path: &Path) -> CoreResult<()> {
    std::fs::create_dir(path).map_err(|e| CoreError::from_io(path, e))?;
    tracing::info!("created directory {}", path.display());
    Ok(())
}

/// Copies one file and returns where it landed.
///
/// When `dest` is an existing directory the file is copied into it under
/// its own name; otherwise `dest` is the target file path.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `src` does not exist.
/// - [`CoreError::NotAFile`] if `src` is a directory.
/// - [`CoreError::Io`] for any other I/O failure.
pub fn copy_file(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    let meta = std::fs::metadata(src).map_err(|e| CoreError::from_io(src, e))?;
    if meta.is_dir() {
        return Err(CoreError::NotAFile(src.to_path_buf()));
    }

    let target = if dest.is_dir() {
        let name = src
            .file_name()
            .ok_or_else(|| CoreError::InvalidName(src.display().to_string()))?;
        dest.join(name)
    } else {
        dest.to_path_buf()
    };

    if same_file(src, &target) {
        tracing::debug!("copy {} onto itself skipped", src.display());
        return Ok(target);
    }

    std::fs::copy(src, &target).map_err(|e| CoreError::from_io(&target, e))?;
    tracing::info!("copied {} -> {}", src.display(), target.display());
    Ok(target)
}

/// True when `a` and `b` name the same file on disk, including through
/// hard links or symlinks. A missing path is never the same file.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        match (std::fs::metadata(a), std::fs::metadata(b)) {
            (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
            _ => false,
        }
    }
    #[cfg(not(unix))]
    {
        match (a.canonicalize(), b.canonicalize()) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        }
    }
}

/// Renames (or moves, on the same filesystem) `from` to `to`.
pub fn rename_path(from: &Path, to: &Path) -> CoreResult<()> {
    // symlink_metadata: a dangling link is still renameable
    if std::fs::symlink_metadata(from).is_err() {
        return Err(CoreError::NotFound(from.to_path_buf()));
    }
    std::fs::rename(from, to).map_err(|e| CoreError::from_io(to, e))?;
    tracing::info!("renamed {} -> {}", from.display(), to.display());
    Ok(())
}

/// Deletes a file or symlink. Directories are refused; see
/// [`crate::fs::archive::ArchiveOps::remove_tree`].
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::NotAFile`] if `path` is a directory.
pub fn delete_file(path: &Path) -> CoreResult<()> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(path, e))?;
    if meta.is_dir() {
        return Err(CoreError::NotAFile(path.to_path_buf()));
    }
    std::fs::remove_file(path).map_err(|e| CoreError::from_io(path, e))?;
    tracing::info!("deleted {}", path.display());
    Ok(())
}

/// Parses an octal mode string such as `"755"` or `"0644"`.
pub fn parse_mode(mode: &str) -> CoreResult<u32> {
    let trimmed = mode.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(CoreError::InvalidMode(mode.to_string()));
    }
    let value =
        u32::from_str_radix(digits, 8).map_err(|_| CoreError::InvalidMode(mode.to_string()))?;
    if value > 0o7777 {
        return Err(CoreError::InvalidMode(mode.to_string()));
    }
    Ok(value)
}

/// Changes the permission bits of `path`, like `chmod`.
///
/// On non-unix platforms only the owner-write bit is honoured, as the
/// read-only flag.
pub fn set_permissions(path: &Path, mode: &str) -> CoreResult<()> {
    let bits = parse_mode(mode)?;
    let meta = std::fs::metadata(path).map_err(|e| CoreError::from_io(path, e))?;

    #[cfg(unix)]
    let perms = {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = meta.permissions();
        perms.set_mode(bits);
        perms
    };
    #[cfg(not(unix))]
    let perms = {
        let mut perms = meta.permissions();
        perms.set_readonly(bits & 0o200 == 0);
        perms
    };

    std::fs::set_permissions(path, perms).map_err(|e| CoreError::from_io(path, e))?;
    tracing::info!("chmod {bits:o} {}", path.display());
    Ok(())
}

/// Reads a whole file as UTF-8 text.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::NotAFile`] if `path` is a directory.
/// - [`CoreError::Io`] if the content is not valid UTF-8.
pub fn read_text_file(path: &Path) -> CoreResult<String> {
    if path.is_dir() {
        return Err(CoreError::NotAFile(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))
}

/// Replaces the content of `path` with `content`, creating the file if needed.
pub fn write_text_file(path: &Path, content: &str) -> CoreResult<()> {
    if path.is_dir() {
        return Err(CoreError::NotAFile(path.to_path_buf()));
    }
    std::fs::write(path, content).map_err(|e| CoreError::from_io(path, e))?;
    tracing::info!("saved {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Resolves where an uploaded file named `original_name` should be written.
///
/// Only the last path component of the client-supplied name is kept, so
/// `../../etc/passwd` lands as `dest_dir/passwd`.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if nothing usable remains.
pub fn upload_destination(dest_dir: &Path, original_name: &str) -> CoreResult<PathBuf> {
    let name = original_name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or_default();
    if !is_valid_filename(name) {
        return Err(CoreError::InvalidName(original_name.to_string()));
    }
    Ok(dest_dir.join(name))
}

fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}
