//! Directory entry representation.

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Names starting with this character are hidden and never listed.
pub const HIDDEN_MARKER: char = '.';

/// Placeholder for the timestamp and size columns when `stat` fails.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for the mode column when `stat` fails.
pub const UNKNOWN_MODE: &str = "0000000";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What the directory enumeration reported an entry to be.
///
/// The kind comes from the directory entry itself (symlinks are not
/// followed), not from `stat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// A symbolic link together with its immediate (unresolved) target.
    Symlink(PathBuf),
}

/// One row of a directory listing.
///
/// All four columns are preformatted strings. When the entry could not be
/// stat'ed the metadata columns carry the [`UNKNOWN`] / [`UNKNOWN_MODE`]
/// sentinels instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    display_name: String,
    modified_at: String,
    size_label: String,
    mode_octal: String,
}

impl DirectoryEntry {
    /// Builds a row for `name`. Pass `None` for `metadata` when `stat` failed.
    ///
    /// Directories get a trailing `/`, symlinks render as `name=target`,
    /// everything else keeps its bare name.
    pub fn new(name: &str, kind: &EntryKind, metadata: Option<&Metadata>) -> Self {
        let display_name = match kind {
            EntryKind::File => name.to_string(),
            EntryKind::Directory => format!("{name}/"),
            EntryKind::Symlink(target) => format!("{name}={}", target.display()),
        };

        match metadata {
            Some(meta) => Self {
                display_name,
                modified_at: meta
                    .modified()
                    .map(format_modified)
                    .unwrap_or_else(|_| UNKNOWN.to_string()),
                size_label: size_label(meta.len()),
                mode_octal: mode_octal(meta),
            },
            None => Self {
                display_name,
                modified_at: UNKNOWN.to_string(),
                size_label: UNKNOWN.to_string(),
                mode_octal: UNKNOWN_MODE.to_string(),
            },
        }
    }

    /// Name as shown in the listing (`dir/`, `link=target`, `file`).
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Modification time as `yyyy-MM-dd HH:mm:ss`, or [`UNKNOWN`].
    pub fn modified_at(&self) -> &str {
        &self.modified_at
    }

    /// Size in KiB rounded up, suffixed `KB`, or [`UNKNOWN`].
    pub fn size_label(&self) -> &str {
        &self.size_label
    }

    /// File mode in octal, or [`UNKNOWN_MODE`].
    pub fn mode_octal(&self) -> &str {
        &self.mode_octal
    }
}

/// Returns `true` if `name` starts with [`HIDDEN_MARKER`].
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Formats a timestamp in local time, zero-padded, 24-hour clock.
pub fn format_modified(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats a byte count as whole KiB, rounded up.
pub fn size_label(bytes: u64) -> String {
    format!("{}KB", bytes.div_ceil(1024))
}

/// Formats the full `st_mode` (type bits included) in octal.
#[cfg(unix)]
pub fn mode_octal(metadata: &Metadata) -> String {
    use std::os::unix::fs::MetadataExt;
    format!("{:o}", metadata.mode())
}

/// Synthesises a unix-style mode from the type and read-only flag.
#[cfg(not(unix))]
pub fn mode_octal(metadata: &Metadata) -> String {
    let type_bits = if metadata.is_dir() { 0o040000 } else { 0o100000 };
    let perm_bits = if metadata.permissions().readonly() { 0o444 } else { 0o666 };
    format!("{:o}", type_bits | perm_bits)
}
