// Market data processing modules
pub mod candle_pipeline;
pub mod signal_classifier;

pub use candle_pipeline::CandlePipeline;
pub use signal_classifier::{SignalClassifier, Verdict};
