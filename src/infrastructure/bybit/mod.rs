pub mod universe;
pub mod websocket;

pub use universe::BybitUniverseProvider;
pub use websocket::{BybitFeedConnection, BybitFeedConnector};
