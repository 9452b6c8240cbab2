//! Signal notification sinks

pub mod log_sink;
pub mod telegram;

pub use log_sink::LogSink;
pub use telegram::TelegramNotifier;
