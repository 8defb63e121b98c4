//! Configuration management for webfm.
//!
//! Core settings ([`settings::Config`]) are stored as a TOML file and
//! loaded at startup. The web server embeds the same sections in its own
//! configuration file.

pub mod settings;
