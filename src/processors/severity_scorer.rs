use crate::models::{DailyRegionalAggregate, RegionalDailySummary, SeverityRow};
use crate::settings::SeverityWeights;
use crate::utils::stats::{min_max_normalize, round2};
use std::cmp::Ordering;
use tracing::info;

/// Scores region-days against each other.
///
/// Normalization is global over every row passed to [`SeverityScorer::score`],
/// never per region.
pub struct SeverityScorer {
    weights: SeverityWeights,
}

impl SeverityScorer {
    pub fn new() -> Self {
        Self {
            weights: SeverityWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: SeverityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn score(&self, aggregates: Vec<DailyRegionalAggregate>) -> Vec<RegionalDailySummary> {
        let ranges: Vec<Option<f64>> = aggregates.iter().map(|a| a.daily_temp_range).collect();
        let intensities: Vec<Option<f64>> = aggregates
            .iter()
            .map(|a| Some(a.precipitation_intensity))
            .collect();
        let winds: Vec<Option<f64>> = aggregates.iter().map(|a| a.avg_wind_speed).collect();

        let norm_range = min_max_normalize(&ranges);
        let norm_intensity = min_max_normalize(&intensities);
        let norm_wind = min_max_normalize(&winds);

        let mut summaries: Vec<RegionalDailySummary> = aggregates
            .into_iter()
            .enumerate()
            .map(|(i, aggregate)| {
                let index = match (norm_range[i], norm_intensity[i], norm_wind[i]) {
                    (Some(r), Some(p), Some(w)) => Some(round2(
                        self.weights.temp_range * r
                            + self.weights.precipitation_intensity * p
                            + self.weights.wind_speed * w,
                    )),
                    _ => None,
                };

                RegionalDailySummary {
                    region: aggregate.region,
                    date: aggregate.date,
                    daily_temp_range: aggregate.daily_temp_range,
                    precipitation_intensity: aggregate.precipitation_intensity,
                    wind_direction_mode: aggregate.wind_direction_mode,
                    regional_severity_index: index,
                }
            })
            .collect();

        summaries.sort_by(compare_by_severity);

        info!("Scored {} region-days", summaries.len());
        summaries
    }

    /// Scored, sorted and projected to the five external columns
    pub fn rank(&self, aggregates: Vec<DailyRegionalAggregate>) -> Vec<SeverityRow> {
        self.score(aggregates).iter().map(|s| s.to_row()).collect()
    }
}

impl Default for SeverityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity descending with missing indices last, then region ascending.
pub fn compare_by_severity(a: &RegionalDailySummary, b: &RegionalDailySummary) -> Ordering {
    let by_index = match (a.regional_severity_index, b.regional_severity_index) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_index.then_with(|| a.region.cmp(&b.region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn aggregate(region: &str, day: u32, range: f64, intensity: f64, wind: f64) -> DailyRegionalAggregate {
        DailyRegionalAggregate {
            region: region.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            daily_temp_range: Some(range),
            precip_total: 0.0,
            hours_with_precip: 0,
            wind_direction_mode: Some("N".to_string()),
            avg_wind_speed: Some(wind),
            precipitation_intensity: intensity,
        }
    }

    #[test]
    fn test_weighted_index() {
        let summaries = SeverityScorer::new().score(vec![
            aggregate("A", 1, 0.0, 0.0, 0.0),
            aggregate("B", 1, 10.0, 4.0, 2.0),
            aggregate("C", 1, 5.0, 4.0, 1.0),
        ]);

        let indices: Vec<(String, Option<f64>)> = summaries
            .iter()
            .map(|s| (s.region.clone(), s.regional_severity_index))
            .collect();
        assert_eq!(
            indices,
            vec![
                ("B".to_string(), Some(1.0)),
                ("C".to_string(), Some(0.65)),
                ("A".to_string(), Some(0.0)),
            ]
        );
    }

    #[test]
    fn test_identical_inputs_identical_index() {
        let summaries = SeverityScorer::new().score(vec![
            aggregate("Beta", 1, 3.0, 2.0, 5.0),
            aggregate("Alpha", 1, 3.0, 2.0, 5.0),
            aggregate("Gamma", 1, 1.0, 0.0, 2.0),
        ]);

        assert_eq!(
            summaries[0].regional_severity_index,
            summaries[1].regional_severity_index
        );
        assert_eq!(summaries[0].region, "Alpha");
        assert_eq!(summaries[1].region, "Beta");
    }

    #[test]
    fn test_constant_column_contributes_nothing() {
        // wind constant across the set: index uses only range and intensity
        let summaries = SeverityScorer::new().score(vec![
            aggregate("A", 1, 0.0, 0.0, 7.0),
            aggregate("B", 1, 10.0, 10.0, 7.0),
        ]);

        assert_eq!(summaries[0].region, "B");
        assert_eq!(summaries[0].regional_severity_index, Some(0.6));
        assert_eq!(summaries[1].regional_severity_index, Some(0.0));
    }

    #[test]
    fn test_missing_index_sorts_last() {
        let mut no_wind = aggregate("Aardvark", 1, 9.0, 9.0, 0.0);
        no_wind.avg_wind_speed = None;

        let rows = SeverityScorer::new().rank(vec![
            no_wind,
            aggregate("Zulu", 1, 1.0, 0.0, 1.0),
            aggregate("Yankee", 1, 2.0, 0.0, 3.0),
        ]);

        let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["Yankee", "Zulu", "Aardvark"]);
        assert_eq!(rows[2].regional_severity_index, None);
    }
}
