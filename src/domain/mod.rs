// Domain-specific error types
pub mod errors;

// Symbol categories and volatility state
pub mod market;

// Port interfaces
pub mod ports;

// Candle and signal value objects
pub mod trading;
