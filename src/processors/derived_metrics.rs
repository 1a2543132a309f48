use crate::models::{EnrichedReading, Reading, WeatherCondition};
use crate::utils::constants::{
    HEAT_INDEX_MIN_HUMIDITY, HEAT_INDEX_MIN_TEMP, HUMID_THRESHOLD, RAIN_PRECIP_THRESHOLD,
    STORM_PRECIP_THRESHOLD, WINDY_SPEED_THRESHOLD, WIND_CHILL_MAX_TEMP, WIND_CHILL_MIN_WIND,
};

// A missing operand never satisfies a threshold.
fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

/// Wind-chill adjusted temperature; `temperature` unchanged unless cold and windy.
pub fn feels_like(temperature: Option<f64>, wind_speed: Option<f64>) -> Option<f64> {
    match (temperature, wind_speed) {
        (Some(t), Some(w)) if t < WIND_CHILL_MAX_TEMP && w > WIND_CHILL_MIN_WIND => {
            let v = w.powf(0.16);
            Some(13.12 + 0.6215 * t - 11.37 * v + 0.3965 * t * v)
        }
        _ => temperature,
    }
}

/// Humidity adjusted temperature; `temperature` unchanged unless hot and humid.
pub fn heat_index(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    match (temperature, humidity) {
        (Some(t), Some(h)) if t > HEAT_INDEX_MIN_TEMP && h > HEAT_INDEX_MIN_HUMIDITY => {
            Some(-8.784 + 1.61 * h + 2.338 * t - 0.14 * h * t)
        }
        _ => temperature,
    }
}

/// First matching rule wins: Storm, Rain, Windy, Humid, then Clear.
pub fn weather_condition(
    precipitation: Option<f64>,
    wind_speed: Option<f64>,
    humidity: Option<f64>,
) -> WeatherCondition {
    if above(precipitation, STORM_PRECIP_THRESHOLD) {
        WeatherCondition::Storm
    } else if above(precipitation, RAIN_PRECIP_THRESHOLD) {
        WeatherCondition::Rain
    } else if above(wind_speed, WINDY_SPEED_THRESHOLD) {
        WeatherCondition::Windy
    } else if above(humidity, HUMID_THRESHOLD) {
        WeatherCondition::Humid
    } else {
        WeatherCondition::Clear
    }
}

pub struct DerivedMetricCalculator;

impl DerivedMetricCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn enrich(&self, reading: Reading) -> EnrichedReading {
        EnrichedReading {
            feels_like: feels_like(reading.temperature, reading.wind_speed),
            heat_index: heat_index(reading.temperature, reading.humidity),
            weather_condition: weather_condition(
                reading.precipitation,
                reading.wind_speed,
                reading.humidity,
            ),
            reading,
        }
    }

    pub fn enrich_all(&self, readings: Vec<Reading>) -> Vec<EnrichedReading> {
        readings.into_iter().map(|r| self.enrich(r)).collect()
    }
}

impl Default for DerivedMetricCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_wind_chill_applies_when_cold_and_windy() {
        let adjusted = feels_like(Some(5.0), Some(10.0)).unwrap();
        assert_ne!(adjusted, 5.0);

        let v = 10.0_f64.powf(0.16);
        let expected = 13.12 + 0.6215 * 5.0 - 11.37 * v + 0.3965 * 5.0 * v;
        assert!((adjusted - expected).abs() < 1e-12);
    }

    #[test]
    fn test_wind_chill_passthrough() {
        assert_eq!(feels_like(Some(20.0), Some(10.0)), Some(20.0));
        assert_eq!(feels_like(Some(5.0), Some(5.0)), Some(5.0));
        assert_eq!(feels_like(Some(10.0), Some(30.0)), Some(10.0));
        assert_eq!(feels_like(Some(5.0), None), Some(5.0));
        assert_eq!(feels_like(None, Some(30.0)), None);
    }

    #[test]
    fn test_heat_index() {
        let hi = heat_index(Some(30.0), Some(60.0)).unwrap();
        let expected = -8.784 + 1.61 * 60.0 + 2.338 * 30.0 - 0.14 * 60.0 * 30.0;
        assert!((hi - expected).abs() < 1e-12);

        assert_eq!(heat_index(Some(25.0), Some(90.0)), Some(25.0));
        assert_eq!(heat_index(Some(30.0), Some(40.0)), Some(30.0));
        assert_eq!(heat_index(Some(30.0), None), Some(30.0));
    }

    #[test]
    fn test_condition_priority() {
        assert_eq!(
            weather_condition(Some(15.0), Some(25.0), Some(95.0)),
            WeatherCondition::Storm
        );
        assert_eq!(
            weather_condition(Some(2.0), Some(25.0), Some(95.0)),
            WeatherCondition::Rain
        );
        assert_eq!(
            weather_condition(Some(0.0), Some(25.0), Some(95.0)),
            WeatherCondition::Windy
        );
        assert_eq!(
            weather_condition(Some(0.0), Some(10.0), Some(95.0)),
            WeatherCondition::Humid
        );
        assert_eq!(
            weather_condition(Some(0.0), Some(10.0), Some(50.0)),
            WeatherCondition::Clear
        );
    }

    #[test]
    fn test_condition_boundaries_fall_through() {
        assert_eq!(
            weather_condition(Some(10.0), None, None),
            WeatherCondition::Rain
        );
        assert_eq!(
            weather_condition(Some(0.0), Some(20.0), Some(85.0)),
            WeatherCondition::Clear
        );
        assert_eq!(weather_condition(None, None, None), WeatherCondition::Clear);
    }

    #[test]
    fn test_enrich_keeps_reading() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let reading = Reading::builder("ST-1", ts)
            .temperature(2.0)
            .humidity(70.0)
            .precipitation(12.0)
            .wind(8.0, "N")
            .build();

        let enriched = DerivedMetricCalculator::new().enrich(reading.clone());
        assert_eq!(enriched.reading, reading);
        assert_eq!(enriched.weather_condition, WeatherCondition::Storm);
        assert_eq!(enriched.heat_index, Some(2.0));
        assert_ne!(enriched.feels_like, Some(2.0));
    }
}
