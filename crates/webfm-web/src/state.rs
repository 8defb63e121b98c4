use std::sync::Arc;

use webfm_core::ArchiveOps;

use crate::config::ServerConfig;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionStore>,
    /// Tarball creation, extraction and recursive removal.
    pub archiver: Arc<dyn ArchiveOps>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session.ttl_secs));
        let archiver: Arc<dyn ArchiveOps> = Arc::new(config.core.archive.archiver());
        Self {
            config: Arc::new(config),
            sessions,
            archiver,
        }
    }
}
