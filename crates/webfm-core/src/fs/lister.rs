//! Directory listing with per-entry metadata.

use std::fs::DirEntry;
use std::path::Path;

use crate::fs::entry::{is_hidden, DirectoryEntry, EntryKind};

/// Lists the visible entries of `folder`.
///
/// Hidden entries (leading `.`) are skipped entirely. Every other entry is
/// `stat`'ed (following symlinks); when that fails the entry is still
/// returned with sentinel metadata. A folder that cannot be opened yields
/// an empty listing rather than an error.
///
/// Entries come back in directory enumeration order. No sorting is applied.
///
/// # Examples
///
/// ```no_run
/// use webfm_core::list_directory;
/// use std::path::Path;
///
/// for entry in list_directory(Path::new("/var/log")) {
///     println!("{}\t{}", entry.display_name(), entry.size_label());
/// }
/// ```
pub fn list_directory(folder: &Path) -> Vec<DirectoryEntry> {
    let read_dir = match std::fs::read_dir(folder) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!("cannot open {}: {e}", folder.display());
            return Vec::new();
        }
    };

    let mut entries = Vec::new();

    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {e}", folder.display());
                continue;
            }
        };

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let kind = entry_kind(&dir_entry);
        let path = dir_entry.path();
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!("stat failed for {}: {e}", path.display());
                None
            }
        };

        entries.push(DirectoryEntry::new(&name, &kind, metadata.as_ref()));
    }

    tracing::debug!("listed {} entries in {}", entries.len(), folder.display());
    entries
}

fn entry_kind(dir_entry: &DirEntry) -> EntryKind {
    // file_type() does not follow symlinks
    let Ok(ft) = dir_entry.file_type() else {
        return EntryKind::File;
    };

    if ft.is_dir() {
        EntryKind::Directory
    } else if ft.is_symlink() {
        match std::fs::read_link(dir_entry.path()) {
            Ok(target) => EntryKind::Symlink(target),
            Err(e) => {
                tracing::warn!("readlink failed for {}: {e}", dir_entry.path().display());
                EntryKind::File
            }
        }
    } else {
        EntryKind::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::{UNKNOWN, UNKNOWN_MODE};
    use std::fs;
    use tempfile::TempDir;

    fn names(entries: &[DirectoryEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.display_name()).collect()
    }

    #[test]
    fn lists_visible_files_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "alpha").unwrap();
        fs::write(tmp.path().join("b.txt"), "beta").unwrap();
        fs::write(tmp.path().join(".cfg"), "hidden").unwrap();

        let entries = list_directory(tmp.path());

        assert_eq!(entries.len(), 2);
        let names = names(&entries);
        assert!(names.contains(&"a.txt"));
        assert!(names.contains(&"b.txt"));
        assert!(entries.iter().all(|e| e.size_label().ends_with("KB")));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::create_dir(tmp.path().join("src")).unwrap();

        let entries = list_directory(tmp.path());

        assert_eq!(names(&entries), vec!["src/"]);
    }

    #[test]
    fn never_returns_hidden_names() {
        let tmp = TempDir::new().unwrap();
        for name in [".a", ".b", "c", ".d.txt", "e.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let entries = list_directory(tmp.path());

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.display_name().starts_with('.')));
    }

    #[test]
    fn directories_get_trailing_slash() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("photos")).unwrap();
        fs::write(tmp.path().join("readme"), "").unwrap();

        let entries = list_directory(tmp.path());

        let names = names(&entries);
        assert!(names.contains(&"photos/"));
        assert!(names.contains(&"readme"));
    }

    #[test]
    fn nonexistent_folder_is_empty() {
        let entries = list_directory(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(entries.is_empty());
    }

    #[test]
    fn file_path_is_empty() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        assert!(list_directory(&file).is_empty());
    }

    #[test]
    fn empty_folder_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(list_directory(tmp.path()).is_empty());
    }

    #[test]
    fn sizes_are_rounded_up_kib() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.bin"), vec![0u8; 1]).unwrap();
        fs::write(tmp.path().join("exact.bin"), vec![0u8; 2048]).unwrap();
        fs::write(tmp.path().join("over.bin"), vec![0u8; 2049]).unwrap();

        let entries = list_directory(tmp.path());
        let size_of = |name: &str| {
            entries
                .iter()
                .find(|e| e.display_name() == name)
                .map(|e| e.size_label().to_string())
                .unwrap()
        };

        assert_eq!(size_of("one.bin"), "1KB");
        assert_eq!(size_of("exact.bin"), "2KB");
        assert_eq!(size_of("over.bin"), "3KB");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_renders_immediate_target() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("real.txt"), "data").unwrap();
        std::os::unix::fs::symlink("real.txt", tmp.path().join("link")).unwrap();

        let entries = list_directory(tmp.path());

        let link = entries
            .iter()
            .find(|e| e.display_name().starts_with("link"))
            .unwrap();
        assert_eq!(link.display_name(), "link=real.txt");
        // stat follows the link, so metadata comes from real.txt
        assert_eq!(link.size_label(), "1KB");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_keeps_entry_with_sentinels() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ok.txt"), "fine").unwrap();
        std::os::unix::fs::symlink("missing-target", tmp.path().join("dangling")).unwrap();

        let entries = list_directory(tmp.path());

        assert_eq!(entries.len(), 2);
        let dangling = entries
            .iter()
            .find(|e| e.display_name() == "dangling=missing-target")
            .unwrap();
        assert_eq!(dangling.modified_at(), UNKNOWN);
        assert_eq!(dangling.size_label(), UNKNOWN);
        assert_eq!(dangling.mode_octal(), UNKNOWN_MODE);
    }

    #[test]
    fn unicode_names_survive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("한글.txt"), "").unwrap();
        fs::write(tmp.path().join("日本語.md"), "").unwrap();

        let entries = list_directory(tmp.path());

        let names = names(&entries);
        assert!(names.contains(&"한글.txt"));
        assert!(names.contains(&"日本語.md"));
    }

    #[test]
    fn listed_directory_name_leads_back_to_it() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("\u{1100}\u{1161}")).unwrap();

        let entries = list_directory(tmp.path());

        let shown = entries[0].display_name().trim_end_matches('/');
        assert!(tmp.path().join(shown).is_dir());
    }

    #[test]
    fn does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("nested.txt"), "").unwrap();

        let entries = list_directory(tmp.path());

        assert_eq!(names(&entries), vec!["sub/"]);
    }
}
