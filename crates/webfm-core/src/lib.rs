//! Directory listing and batch file operations for the webfm file manager.
//!
//! `webfm-core` holds everything the file manager does to the filesystem.
//! It knows nothing about HTTP, sessions or templates; the web front end
//! (`webfm-web`) passes in validated strings and renders what comes back.
//!
//! # Modules
//!
//! - [`fs`]: listing ([`list_directory`]), candidate search ([`search`]), conflict-policy batch copy ([`copy_batch`]), single-step ops and archives.
//! - [`nav`]: the browsed [`Location`] and the known [`Places`].
//! - [`exec`]: allow-list policy for opt-in command execution.
//! - [`config`]: TOML settings shared with the web server.
//! - [`error`]: [`CoreError`] and the [`CoreResult`] alias.

pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod nav;

pub use config::settings::{ArchiveConfig, Config, ExecConfig, PlacesConfig};
pub use error::{CoreError, CoreResult};
pub use exec::{CommandLine, CommandPolicy};
pub use fs::archive::{ArchiveOps, TarGzArchiver};
pub use fs::batch::{copy_batch, destination_for, should_copy, CopyPolicy, CopyResult};
pub use fs::entry::{DirectoryEntry, EntryKind};
pub use fs::lister::list_directory;
pub use fs::ops::{
    copy_file, delete_file, make_directory, read_text_file, rename_path, set_permissions,
    upload_destination, write_text_file,
};
pub use fs::search::{parse_path_list, search, SearchMode, SearchResult};
pub use nav::location::Location;
pub use nav::places::Places;
