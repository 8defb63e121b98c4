//! Candidate resolution for batch operations.
//!
//! Turns a folder plus user-supplied text into a list of paths, either by
//! regex-matching file names, by glob expansion, or by taking the text as
//! an explicit newline-delimited list.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// How [`search`] interprets its text argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Regular expression matched against the names of the folder's direct children.
    RegexFilename,
    /// Shell-style wildcard appended to the folder and expanded.
    GlobPath,
    /// The text already is the list: one path per line.
    ExplicitList,
}

impl SearchMode {
    /// The tag used by forms and the HTTP API.
    pub fn tag(self) -> &'static str {
        match self {
            SearchMode::RegexFilename => "regexp",
            SearchMode::GlobPath => "wildcard",
            SearchMode::ExplicitList => "list",
        }
    }
}

impl FromStr for SearchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regexp" => Ok(SearchMode::RegexFilename),
            "wildcard" => Ok(SearchMode::GlobPath),
            "list" => Ok(SearchMode::ExplicitList),
            other => Err(CoreError::UnknownTag {
                kind: "search mode",
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Paths produced by [`search`], in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    paths: Vec<PathBuf>,
}

impl SearchResult {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Newline-delimited rendering for display.
    pub fn to_text(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Resolves `text` against `folder` according to `mode`.
///
/// - [`SearchMode::RegexFilename`] scans the direct children of `folder`
///   (non-recursive, hidden files included) and keeps those whose name
///   matches anywhere. Each match is returned joined onto `folder`.
/// - [`SearchMode::GlobPath`] expands `folder/text` as a glob. Hidden files
///   are not filtered.
/// - [`SearchMode::ExplicitList`] parses `text` with [`parse_path_list`]
///   without touching the filesystem; relative lines are joined onto `folder`.
///
/// # Errors
///
/// - [`CoreError::EmptyInput`] if `text` is empty (checked first).
/// - [`CoreError::InvalidPattern`] if the regex or glob does not compile.
/// - [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] if `folder`
///   cannot be read in regex mode.
pub fn search(folder: &Path, text: &str, mode: SearchMode) -> CoreResult<SearchResult> {
    if text.is_empty() {
        return Err(CoreError::EmptyInput("search text"));
    }

    let paths = match mode {
        SearchMode::RegexFilename => regex_search(folder, text)?,
        SearchMode::GlobPath => glob_search(folder, text)?,
        SearchMode::ExplicitList => {
            let list = parse_path_list(text);
            if list.is_empty() {
                return Err(CoreError::EmptyInput("path list"));
            }
            list.into_iter().map(|p| folder.join(p)).collect()
        }
    };

    tracing::debug!(
        "search {mode} '{text}' in {} -> {} paths",
        folder.display(),
        paths.len()
    );
    Ok(SearchResult { paths })
}

/// Splits newline-delimited text into paths, trimming each line and
/// dropping blank ones. Order is preserved.
pub fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn regex_search(folder: &Path, pattern: &str) -> CoreResult<Vec<PathBuf>> {
    let re = Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let read_dir = std::fs::read_dir(folder).map_err(|e| CoreError::from_io(folder, e))?;

    let mut matches = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| CoreError::from_io(folder, e))?;
        let name = dir_entry.file_name();
        if re.is_match(&name.to_string_lossy()) {
            matches.push(folder.join(name));
        }
    }
    Ok(matches)
}

fn glob_search(folder: &Path, pattern: &str) -> CoreResult<Vec<PathBuf>> {
    let folder_str = folder.to_string_lossy();
    let expression = format!(
        "{}/{}",
        glob::Pattern::escape(folder_str.trim_end_matches('/')),
        pattern
    );

    let paths = glob::glob(&expression).map_err(|e| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => tracing::warn!("glob skipped unreadable path: {e}"),
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("c.log"), "c").unwrap();
        fs::write(tmp.path().join(".hidden.txt"), "h").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("d.txt"), "d").unwrap();
        tmp
    }

    fn as_set(result: &SearchResult) -> HashSet<PathBuf> {
        result.paths().iter().cloned().collect()
    }

    // --- tags ---

    #[test]
    fn parses_known_tags() {
        assert_eq!("regexp".parse::<SearchMode>().unwrap(), SearchMode::RegexFilename);
        assert_eq!("wildcard".parse::<SearchMode>().unwrap(), SearchMode::GlobPath);
        assert_eq!("list".parse::<SearchMode>().unwrap(), SearchMode::ExplicitList);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "fuzzy".parse::<SearchMode>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownTag { kind: "search mode", .. }));
    }

    #[test]
    fn display_matches_tag() {
        for mode in [
            SearchMode::RegexFilename,
            SearchMode::GlobPath,
            SearchMode::ExplicitList,
        ] {
            assert_eq!(mode.to_string().parse::<SearchMode>().unwrap(), mode);
        }
    }

    // --- empty input ---

    #[test]
    fn empty_text_rejected_before_touching_fs() {
        let missing = Path::new("/nonexistent/folder");
        for mode in [
            SearchMode::RegexFilename,
            SearchMode::GlobPath,
            SearchMode::ExplicitList,
        ] {
            let err = search(missing, "", mode).unwrap_err();
            assert!(matches!(err, CoreError::EmptyInput(_)), "{mode}");
        }
    }

    // --- regex ---

    #[test]
    fn regex_matches_file_names() {
        let tmp = fixture();

        let result = search(tmp.path(), r"\.txt$", SearchMode::RegexFilename).unwrap();

        let expected: HashSet<PathBuf> = ["a.txt", "b.txt", ".hidden.txt"]
            .iter()
            .map(|n| tmp.path().join(n))
            .collect();
        assert_eq!(as_set(&result), expected);
    }

    #[test]
    fn regex_is_unanchored() {
        let tmp = fixture();

        let result = search(tmp.path(), "lo", SearchMode::RegexFilename).unwrap();

        assert_eq!(result.paths(), &[tmp.path().join("c.log")]);
    }

    #[test]
    fn regex_does_not_recurse() {
        let tmp = fixture();

        let result = search(tmp.path(), "^d", SearchMode::RegexFilename).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn invalid_regex_reports_pattern() {
        let tmp = fixture();

        let err = search(tmp.path(), "([a-z", SearchMode::RegexFilename).unwrap_err();

        match err {
            CoreError::InvalidPattern { pattern, message } => {
                assert_eq!(pattern, "([a-z");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn regex_on_missing_folder_is_not_found() {
        let err = search(
            Path::new("/nonexistent/path/that/does/not/exist"),
            "x",
            SearchMode::RegexFilename,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    // --- glob ---

    #[test]
    fn glob_returns_matches_under_folder() {
        let tmp = fixture();

        let result = search(tmp.path(), "*.txt", SearchMode::GlobPath).unwrap();

        assert!(result.paths().iter().all(|p| p.starts_with(tmp.path())));
        assert!(result.paths().contains(&tmp.path().join("a.txt")));
        assert!(result.paths().contains(&tmp.path().join("b.txt")));
        assert!(!result.paths().contains(&tmp.path().join("c.log")));
        assert!(!result.paths().contains(&tmp.path().join("sub").join("d.txt")));
    }

    #[test]
    fn glob_does_not_filter_hidden() {
        let tmp = fixture();

        let result = search(tmp.path(), "*.txt", SearchMode::GlobPath).unwrap();

        assert!(result.paths().contains(&tmp.path().join(".hidden.txt")));
    }

    #[test]
    fn glob_can_descend_explicitly() {
        let tmp = fixture();

        let result = search(tmp.path(), "sub/?.txt", SearchMode::GlobPath).unwrap();

        assert_eq!(result.paths(), &[tmp.path().join("sub").join("d.txt")]);
    }

    #[test]
    fn glob_with_trailing_slash_folder() {
        let tmp = fixture();
        let folder = PathBuf::from(format!("{}/", tmp.path().display()));

        let result = search(&folder, "c.*", SearchMode::GlobPath).unwrap();

        assert_eq!(result.paths(), &[tmp.path().join("c.log")]);
    }

    #[test]
    fn glob_escapes_folder_metacharacters() {
        let tmp = TempDir::new().unwrap();
        let odd = tmp.path().join("[draft]");
        fs::create_dir(&odd).unwrap();
        fs::write(odd.join("x.txt"), "").unwrap();

        let result = search(&odd, "*.txt", SearchMode::GlobPath).unwrap();

        assert_eq!(result.paths(), &[odd.join("x.txt")]);
    }

    #[test]
    fn invalid_glob_reports_pattern() {
        let tmp = fixture();

        let err = search(tmp.path(), "***", SearchMode::GlobPath).unwrap_err();

        assert!(matches!(err, CoreError::InvalidPattern { .. }));
    }

    #[test]
    fn glob_on_missing_folder_is_empty() {
        let result = search(
            Path::new("/nonexistent/path/that/does/not/exist"),
            "*",
            SearchMode::GlobPath,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    // --- explicit list ---

    #[test]
    fn explicit_list_joins_relative_lines() {
        let result = search(
            Path::new("/data"),
            "a.txt\n  /etc/hosts  \n\n b.txt\n",
            SearchMode::ExplicitList,
        )
        .unwrap();

        assert_eq!(
            result.paths(),
            &[
                PathBuf::from("/data/a.txt"),
                PathBuf::from("/etc/hosts"),
                PathBuf::from("/data/b.txt"),
            ]
        );
    }

    #[test]
    fn explicit_list_of_blank_lines_is_empty_input() {
        let err = search(Path::new("/data"), " \n\t\n", SearchMode::ExplicitList).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput("path list")));
    }

    #[test]
    fn parse_path_list_trims_and_filters() {
        let list = parse_path_list("  one \r\n\ntwo\n   \nthree");
        assert_eq!(
            list,
            vec![
                PathBuf::from("one"),
                PathBuf::from("two"),
                PathBuf::from("three")
            ]
        );
    }

    #[test]
    fn to_text_joins_with_newlines() {
        let result = search(Path::new("/d"), "x\ny", SearchMode::ExplicitList).unwrap();
        assert_eq!(result.to_text(), "/d/x\n/d/y");
    }
}
