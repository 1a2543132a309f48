use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_ANOMALY_SIGMA, DEFAULT_COMPRESSION, DEFAULT_INTENSITY_WEIGHT,
    DEFAULT_RANGE_WEIGHT, DEFAULT_ROW_GROUP_SIZE, DEFAULT_STD_EPSILON, DEFAULT_TREND_WINDOW,
    DEFAULT_WIND_WEIGHT,
};

/// Weights of the three normalized daily metrics in the severity index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SeverityWeights {
    #[validate(range(min = 0.0, max = 1.0))]
    pub temp_range: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub precipitation_intensity: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub wind_speed: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            temp_range: DEFAULT_RANGE_WEIGHT,
            precipitation_intensity: DEFAULT_INTENSITY_WEIGHT,
            wind_speed: DEFAULT_WIND_WEIGHT,
        }
    }
}

/// Tunables for a pipeline run. Defaults reproduce the reference scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    pub trend_window: usize,

    #[validate(range(min = 0.0))]
    pub anomaly_sigma: f64,

    pub std_epsilon: f64,

    #[validate(nested)]
    pub severity_weights: SeverityWeights,

    pub compression: String,

    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            trend_window: DEFAULT_TREND_WINDOW,
            anomaly_sigma: DEFAULT_ANOMALY_SIGMA,
            std_epsilon: DEFAULT_STD_EPSILON,
            severity_weights: SeverityWeights::default(),
            compression: DEFAULT_COMPRESSION.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, an optional settings file and `CLIMATE_AGG_*`
    /// environment variables, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: PipelineConfig = builder.build()?.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_compression(mut self, compression: &str) -> Self {
        self.compression = compression.to_string();
        self
    }

    /// Field ranges plus the constraints validator cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.std_epsilon <= 0.0 {
            return Err(ProcessingError::Config(format!(
                "std_epsilon must be positive, got {}",
                self.std_epsilon
            )));
        }

        Ok(())
    }
}
