/// Input field names
pub const FIELD_STATION_ID: &str = "station_id";
pub const FIELD_REGION: &str = "region";
pub const FIELD_ELEVATION: &str = "elevation";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_TEMPERATURE: &str = "temperature";
pub const FIELD_HUMIDITY: &str = "humidity";
pub const FIELD_PRESSURE: &str = "pressure";
pub const FIELD_PRECIPITATION: &str = "precipitation";
pub const FIELD_WIND_SPEED: &str = "wind_speed";
pub const FIELD_WIND_DIRECTION: &str = "wind_direction";

/// Wind-chill applies below this temperature (°C) ...
pub const WIND_CHILL_MAX_TEMP: f64 = 10.0;
/// ... and above this wind speed
pub const WIND_CHILL_MIN_WIND: f64 = 5.0;

/// Heat index applies above this temperature (°C) and humidity (%)
pub const HEAT_INDEX_MIN_TEMP: f64 = 25.0;
pub const HEAT_INDEX_MIN_HUMIDITY: f64 = 40.0;

/// Weather condition thresholds, all exclusive lower bounds
pub const STORM_PRECIP_THRESHOLD: f64 = 10.0;
pub const RAIN_PRECIP_THRESHOLD: f64 = 0.0;
pub const WINDY_SPEED_THRESHOLD: f64 = 20.0;
pub const HUMID_THRESHOLD: f64 = 85.0;

/// Trend and anomaly defaults
pub const DEFAULT_TREND_WINDOW: usize = 3;
pub const DEFAULT_ANOMALY_SIGMA: f64 = 2.0;
pub const DEFAULT_STD_EPSILON: f64 = 1e-6;

/// Severity weights
pub const DEFAULT_RANGE_WEIGHT: f64 = 0.3;
pub const DEFAULT_INTENSITY_WEIGHT: f64 = 0.3;
pub const DEFAULT_WIND_WEIGHT: f64 = 0.4;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_COMPRESSION: &str = "snappy";

/// `--input` value that reads observations from stdin
pub const STDIN_PATH: &str = "-";

/// Environment prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "CLIMATE_AGG";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
