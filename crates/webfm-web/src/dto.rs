use serde::{Deserialize, Serialize};
use webfm_core::DirectoryEntry;

#[derive(Debug, Serialize)]
pub struct DirectoryEntryDto {
    pub name: String,
    pub modified: String,
    pub size: String,
    pub mode: String,
}

impl From<&DirectoryEntry> for DirectoryEntryDto {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.display_name().to_string(),
            modified: entry.modified_at().to_string(),
            size: entry.size_label().to_string(),
            mode: entry.mode_octal().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub place: String,
    pub places: Vec<String>,
    pub entries: Vec<DirectoryEntryDto>,
}

#[derive(Debug, Deserialize)]
pub struct SetLocationRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// A single path argument: mkdir, delete, removedir, download, text reads.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SourceDestRequest {
    pub source: String,
    pub dest: String,
}

#[derive(Debug, Deserialize)]
pub struct ChmodRequest {
    pub path: String,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct TarballRequest {
    pub folder: String,
    pub archive: String,
}

#[derive(Debug, Deserialize)]
pub struct InflateRequest {
    pub archive: String,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Defaults to the session's current location.
    #[serde(default)]
    pub folder: Option<String>,
    pub text: String,
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub paths: Vec<String>,
    /// Newline-joined form, ready to drop into the batch copy box.
    pub text: String,
}

/// Candidates as a newline-delimited string or a JSON array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    Text(String),
    List(Vec<String>),
}

impl PathList {
    pub fn into_paths(self) -> Vec<std::path::PathBuf> {
        match self {
            PathList::Text(text) => webfm_core::parse_path_list(&text),
            PathList::List(items) => {
                webfm_core::parse_path_list(&items.join("\n"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchCopyRequest {
    pub paths: PathList,
    pub destination: String,
    pub policy: String,
}

#[derive(Debug, Serialize)]
pub struct BatchCopyResponse {
    pub success: bool,
    pub copied: usize,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PlacesBody {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TextFileBody {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecRequest {
    pub command: String,
    /// Defaults to the session's current location.
    #[serde(default)]
    pub cwd: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExecResponse {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub truncated: bool,
}
