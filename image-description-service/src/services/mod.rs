pub mod analyzer;
pub mod providers;

pub use analyzer::{AnalysisError, ImageAnalyzer};
