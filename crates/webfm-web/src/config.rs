use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    /// `[places]`, `[exec]` and `[archive]` sections shared with the core.
    #[serde(flatten)]
    pub core: webfm_core::Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesystemConfig {
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl TlsConfig {
    pub fn is_enabled(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3230))
}

fn default_max_upload_size_mb() -> usize { 100 }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }
fn default_session_ttl_secs() -> u64 { 24 * 60 * 60 }

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_size_mb(),
            public_dir: default_public_dir(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: default_session_ttl_secs() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            filesystem: FilesystemConfig::default(),
            session: SessionConfig::default(),
            tls: TlsConfig::default(),
            core: webfm_core::Config::default(),
        }
    }
}

impl ServerConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.filesystem.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("WEBFM_CONFIG").map(PathBuf::from).ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&contents)?
        } else {
            ServerConfig::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.guard_exposure(std::env::var("WEBFM_INSECURE").is_ok());
        Ok(config)
    }

    /// Applies `WEBFM_*` (and `PORT`) overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(addr) = lookup("WEBFM_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }
        if let Some(port) = lookup("PORT") {
            self.bind_addr.set_port(port.parse()?);
        }

        if let Some(file) = lookup("WEBFM_PLACES_FILE") {
            self.core.places.file = PathBuf::from(file);
        }
        if let Some(dir) = lookup("WEBFM_PUBLIC_DIR") {
            self.filesystem.public_dir = PathBuf::from(dir);
        }
        if let Some(val) = lookup("WEBFM_MAX_UPLOAD_SIZE_MB") {
            if let Ok(mb) = val.parse::<usize>() {
                self.filesystem.max_upload_size_mb = mb;
            }
        }

        if let Some(cert) = lookup("WEBFM_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = lookup("WEBFM_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        if let Some(val) = lookup("WEBFM_EXEC_ENABLED") {
            self.core.exec.enabled = matches!(val.as_str(), "1" | "true" | "yes");
        }

        Ok(())
    }

    /// There is no login in front of the file manager, so refuse to listen
    /// on every interface unless explicitly told to.
    pub fn guard_exposure(&mut self, insecure: bool) {
        if !self.bind_addr.ip().is_unspecified() {
            return;
        }
        if insecure {
            tracing::warn!(
                "Listening on all interfaces ({}) without authentication. \
                 Anyone on the network can read and modify files!",
                self.bind_addr
            );
            if self.core.exec.enabled {
                tracing::warn!("Command execution is enabled on a public interface.");
            }
        } else {
            let safe_addr: SocketAddr = ([127, 0, 0, 1], self.bind_addr.port()).into();
            tracing::warn!(
                "Binding to {} instead of {} for safety. \
                 Set WEBFM_INSECURE=1 to override (NOT RECOMMENDED).",
                safe_addr,
                self.bind_addr
            );
            self.bind_addr = safe_addr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:3230".parse().unwrap());
        assert_eq!(config.filesystem.max_upload_size_mb, 100);
        assert_eq!(config.filesystem.public_dir, PathBuf::from("public"));
        assert_eq!(config.session.ttl_secs, 86_400);
        assert!(!config.tls.is_enabled());
        assert!(!config.core.exec.enabled);
        assert_eq!(config.max_body_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn toml_with_core_sections() {
        let config = ServerConfig::from_toml_str(
            r#"
bind_addr = "127.0.0.1:8080"

[filesystem]
public_dir = "/srv/webfm/public"

[places]
file = "/etc/webfm/folders.txt"

[exec]
enabled = true
allowed_programs = ["ls"]
"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.filesystem.public_dir, PathBuf::from("/srv/webfm/public"));
        assert_eq!(config.filesystem.max_upload_size_mb, 100);
        assert_eq!(config.core.places.file, PathBuf::from("/etc/webfm/folders.txt"));
        assert!(config.core.exec.enabled);
        assert_eq!(config.core.exec.allowed_programs, vec!["ls"]);
        assert_eq!(config.core.archive.compression_level, 6);
    }

    #[test]
    fn empty_toml_is_default() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.core.places.file, PathBuf::from("folders.txt"));
    }

    #[test]
    fn env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("WEBFM_BIND_ADDR", "127.0.0.1:9000"),
                ("WEBFM_PLACES_FILE", "/tmp/places.txt"),
                ("WEBFM_MAX_UPLOAD_SIZE_MB", "5"),
                ("WEBFM_TLS_CERT", "cert.pem"),
                ("WEBFM_TLS_KEY", "key.pem"),
                ("WEBFM_EXEC_ENABLED", "true"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.core.places.file, PathBuf::from("/tmp/places.txt"));
        assert_eq!(config.filesystem.max_upload_size_mb, 5);
        assert!(config.tls.is_enabled());
        assert!(config.core.exec.enabled);
    }

    #[test]
    fn port_overrides_only_port() {
        let mut config = ServerConfig::default();
        config.apply_env(env(&[("PORT", "4000")])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:4000".parse().unwrap());
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut config = ServerConfig::default();
        assert!(config.apply_env(env(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn unspecified_bind_falls_back_to_loopback() {
        let mut config = ServerConfig {
            bind_addr: "0.0.0.0:3230".parse().unwrap(),
            ..ServerConfig::default()
        };
        config.guard_exposure(false);
        assert_eq!(config.bind_addr, "127.0.0.1:3230".parse().unwrap());
    }

    #[test]
    fn insecure_keeps_unspecified_bind() {
        let mut config = ServerConfig {
            bind_addr: "0.0.0.0:3230".parse().unwrap(),
            ..ServerConfig::default()
        };
        config.guard_exposure(true);
        assert!(config.bind_addr.ip().is_unspecified());
    }
}
