//! The folder currently being browsed.

use std::path::{Component, Path, PathBuf};

/// Navigation state for one browser session.
///
/// `Location` is an immutable value: every transition returns a **new**
/// instance, so callers store whatever they get back. Paths are kept in
/// their forward-slash display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
}

impl Location {
    /// Wraps `path` after normalising separators.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize(&path.into()),
        }
    }

    /// The filesystem root: `/`, or `C:/` on Windows.
    pub fn root() -> Self {
        let root = if cfg!(windows) { "C:/" } else { "/" };
        Self {
            path: root.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Returns `true` for `/` or a bare drive root such as `C:/`.
    pub fn is_root(&self) -> bool {
        self.path == "/" || is_drive_root(&self.path)
    }

    /// Validates the location against the live filesystem.
    ///
    /// Falls back to [`Location::root`] when the path is empty or no longer
    /// exists. On Windows a bare `/` also becomes `C:/`.
    pub fn resolve(&self) -> Self {
        if self.path.is_empty() || (cfg!(windows) && self.path == "/") {
            return Self::root();
        }
        if !self.as_path().exists() {
            tracing::debug!("location {} vanished, falling back to root", self.path);
            return Self::root();
        }
        self.clone()
    }

    /// Steps into `name`, or up one level for `".."`.
    ///
    /// Going up from the root stays at the root. `name` may itself contain
    /// several components; `.` and `..` inside it are applied lexically.
    pub fn enter(&self, name: &str) -> Self {
        if name == ".." {
            return self.parent();
        }

        let mut joined = PathBuf::from(&self.path);
        for component in Path::new(&normalize(name)).components() {
            match component {
                Component::Normal(part) => joined.push(part),
                Component::ParentDir => {
                    if joined.parent().is_some() {
                        joined.pop();
                    }
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self::new(joined.to_string_lossy().into_owned())
    }

    /// The enclosing folder, or `self` at the root.
    pub fn parent(&self) -> Self {
        if self.is_root() {
            return self.clone();
        }
        match self.as_path().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                Self::new(parent.to_string_lossy().into_owned())
            }
            _ => Self::root(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

fn is_drive_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Backslashes become `/`, runs of `/` collapse, trailing `/` is dropped
/// except on a root.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') && !is_drive_root(&out) {
        out.pop();
    }
    out
}
