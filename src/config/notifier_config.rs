//! Notifier configuration parsing from environment variables.
//!
//! Telegram delivery is enabled only when both the bot token and the chat id
//! are present; otherwise signals go to the log.

use std::env;

#[derive(Debug, Clone)]
pub struct NotifierEnvConfig {
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    pub timeout_secs: u64,
}

impl NotifierEnvConfig {
    pub fn from_env() -> Self {
        Self {
            telegram_token: non_empty(env::var("TG_TOKEN").ok()),
            telegram_chat_id: non_empty(env::var("TG_CHAT_ID").ok()),
            telegram_api_url: env::var("TG_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            timeout_secs: env::var("NOTIFY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .unwrap_or(10),
        }
    }

    /// Token and chat id, when both are configured.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some((token.as_str(), chat_id.as_str())),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
