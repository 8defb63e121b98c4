//! File system abstractions for webfm.
//!
//! This module provides the directory listing ([`lister::list_directory`]),
//! candidate resolution for batch work ([`search::search`]), the
//! conflict-policy batch copy ([`batch::copy_batch`]), single-step
//! operations ([`ops`]) and the archive capability ([`archive::ArchiveOps`]).

pub mod archive;
pub mod batch;
pub mod entry;
pub mod lister;
pub mod ops;
pub mod search;

pub use archive::{ArchiveOps, TarGzArchiver};
pub use batch::{CopyPolicy, CopyResult};
pub use entry::{DirectoryEntry, EntryKind};
pub use search::{SearchMode, SearchResult};
