//! Navigation state for webfm.
//!
//! [`location::Location`] is the folder a session is browsing;
//! [`places::Places`] is the list of known locations offered as shortcuts.

pub mod location;
pub mod places;
