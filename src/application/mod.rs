// Candle validation, volatility tracking and signal classification
pub mod market_data;

// Websocket session lifecycle and wire protocol
pub mod stream;
