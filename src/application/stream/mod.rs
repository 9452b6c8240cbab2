pub mod protocol;
pub mod session_manager;

pub use session_manager::{SessionConfig, SessionState, StreamSessionManager};
