pub mod prediction_analyzer;

pub use prediction_analyzer::{MetricDrift, PredictionAnalyzer, PredictionMetrics};
