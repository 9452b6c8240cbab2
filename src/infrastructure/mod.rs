pub mod bybit;
pub mod core;
pub mod notifier;
pub mod observability;
