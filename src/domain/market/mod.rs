// Market analysis domain
pub mod symbol_category;
pub mod volatility;
