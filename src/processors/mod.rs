pub mod anomaly_detector;
pub mod derived_metrics;
pub mod hourly_resampler;
pub mod normalizer;
pub mod parallel_processor;
pub mod quality_checker;
pub mod regional_aggregator;
pub mod severity_scorer;
pub mod trend_analyzer;

pub use anomaly_detector::{AnomalyDetector, TemperatureBaseline};
pub use derived_metrics::{feels_like, heat_index, weather_condition, DerivedMetricCalculator};
pub use hourly_resampler::HourlyResampler;
pub use normalizer::{parse_timestamp, RawObservation, ReadingNormalizer};
pub use parallel_processor::{ParallelProcessor, PipelineOutput};
pub use quality_checker::{
    InsufficientDataKind, InsufficientDataWarning, QualityChecker, QualityReport,
    StationStatistics, WarningScope,
};
pub use regional_aggregator::RegionalAggregator;
pub use severity_scorer::SeverityScorer;
pub use trend_analyzer::TrendAnalyzer;
