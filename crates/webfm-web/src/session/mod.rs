pub mod middleware;
pub mod store;

pub use middleware::{session_cookie, SessionId};
pub use store::SessionStore;
