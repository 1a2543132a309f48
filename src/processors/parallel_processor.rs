use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedReading, HourlyRecord, Reading, RegionalDailySummary, SeverityRow};
use crate::processors::hourly_resampler::merge_station_tables;
use crate::processors::{
    AnomalyDetector, DerivedMetricCalculator, HourlyResampler, QualityChecker, QualityReport,
    RawObservation, ReadingNormalizer, RegionalAggregator, SeverityScorer, TrendAnalyzer,
};
use crate::settings::{PipelineConfig, SeverityWeights};
use crate::utils::constants::{DEFAULT_ANOMALY_SIGMA, DEFAULT_STD_EPSILON, DEFAULT_TREND_WINDOW};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use tracing::{debug, info};

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub hourly: Vec<HourlyRecord>,
    /// Scored region-days, already in ranking order
    pub summaries: Vec<RegionalDailySummary>,
    pub quality: QualityReport,
}

impl PipelineOutput {
    /// The external five-column ranking
    pub fn ranking(&self) -> Vec<SeverityRow> {
        self.summaries.iter().map(|s| s.to_row()).collect()
    }
}

pub struct ParallelProcessor {
    max_workers: usize,
    trend_window: usize,
    anomaly_sigma: f64,
    std_epsilon: f64,
    weights: SeverityWeights,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            trend_window: DEFAULT_TREND_WINDOW,
            anomaly_sigma: DEFAULT_ANOMALY_SIGMA,
            std_epsilon: DEFAULT_STD_EPSILON,
            weights: SeverityWeights::default(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.max_workers)
            .with_trend_window(config.trend_window)
            .with_anomaly_threshold(config.anomaly_sigma, config.std_epsilon)
            .with_weights(config.severity_weights)
    }

    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    pub fn with_anomaly_threshold(mut self, sigma: f64, epsilon: f64) -> Self {
        self.anomaly_sigma = sigma;
        self.std_epsilon = epsilon;
        self
    }

    pub fn with_weights(mut self, weights: SeverityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Run the full pipeline over raw observations
    pub fn process(
        &self,
        observations: &[RawObservation],
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if let Some(p) = progress {
            p.set_message("Normalizing readings...");
        }

        let readings = ReadingNormalizer::new().normalize(observations)?;
        self.process_readings(readings, progress)
    }

    /// Run the pipeline over readings that are already canonical.
    ///
    /// Readings need not be sorted; they are ordered by time here.
    pub fn process_readings(
        &self,
        mut readings: Vec<Reading>,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if readings.is_empty() {
            return Err(ProcessingError::EmptyInput);
        }
        readings.sort_by_key(|r| r.timestamp);

        if let Some(p) = progress {
            p.set_message("Computing derived metrics...");
        }
        let enriched = DerivedMetricCalculator::new().enrich_all(readings.clone());

        let hourly = self.process_stations(&enriched, progress)?;
        info!("Built {} hourly records", hourly.len());

        if let Some(p) = progress {
            p.set_message("Aggregating regional days...");
        }
        let aggregates = RegionalAggregator::new().aggregate(&hourly);

        let quality = QualityChecker::new().check(&readings, &hourly, &aggregates);

        if let Some(p) = progress {
            p.set_message("Scoring severity...");
        }
        let summaries = SeverityScorer::new()
            .with_weights(self.weights)
            .score(aggregates);

        if let Some(p) = progress {
            if !quality.warnings.is_empty() {
                p.println(&format!(
                    "{} insufficient-data warnings; see the quality report",
                    quality.warnings.len()
                ));
            }
            p.finish_with_message(&format!("Ranked {} region-days", summaries.len()));
        }

        Ok(PipelineOutput {
            hourly,
            summaries,
            quality,
        })
    }

    /// Resample, trend and flag every station on a worker pool.
    ///
    /// Station tables are collected in station order before the merge, so the
    /// result does not depend on the number of workers.
    fn process_stations(
        &self,
        enriched: &[EnrichedReading],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<HourlyRecord>> {
        let resampler = HourlyResampler::new();
        let stations: Vec<(String, Vec<&EnrichedReading>)> =
            resampler.group_by_station(enriched).into_iter().collect();

        if let Some(p) = progress {
            p.set_message(&format!("Processing {} stations...", stations.len()));
            p.set_length(stations.len() as u64);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let tables: Vec<Vec<HourlyRecord>> = pool.install(|| {
            stations
                .par_iter()
                .map(|(station_id, group)| {
                    let table = self.process_single_station(&resampler, station_id, group);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    table
                })
                .collect()
        });

        Ok(merge_station_tables(tables))
    }

    fn process_single_station(
        &self,
        resampler: &HourlyResampler,
        station_id: &str,
        group: &[&EnrichedReading],
    ) -> Vec<HourlyRecord> {
        let hourly = resampler.resample_station(station_id, group);
        let hourly = TrendAnalyzer::new()
            .with_window(self.trend_window)
            .analyze_station(hourly);
        let hourly = AnomalyDetector::new()
            .with_sigma(self.anomaly_sigma)
            .with_epsilon(self.std_epsilon)
            .detect_station(hourly);

        debug!("Station {} processed: {} hours", station_id, hourly.len());
        hourly
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
