use crate::models::{DailyRegionalAggregate, HourlyRecord};
use crate::utils::stats::{self, round2};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct RegionalAggregator;

impl RegionalAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Group hourly rows by (region, calendar date), ordered by region then date.
    ///
    /// Rows without a region, which includes every gap hour, join no group.
    pub fn group_by_region_and_date<'a>(
        &self,
        records: &'a [HourlyRecord],
    ) -> BTreeMap<(String, NaiveDate), Vec<&'a HourlyRecord>> {
        let mut groups: BTreeMap<(String, NaiveDate), Vec<&HourlyRecord>> = BTreeMap::new();
        let mut unassigned = 0usize;

        for record in records {
            match record.region {
                Some(ref region) => groups
                    .entry((region.clone(), record.date()))
                    .or_default()
                    .push(record),
                None => unassigned += 1,
            }
        }

        debug!("{} hourly rows without a region skipped", unassigned);
        groups
    }

    pub fn aggregate(&self, records: &[HourlyRecord]) -> Vec<DailyRegionalAggregate> {
        let aggregates: Vec<DailyRegionalAggregate> = self
            .group_by_region_and_date(records)
            .into_iter()
            .map(|((region, date), rows)| Self::aggregate_group(region, date, &rows))
            .collect();

        info!("Aggregated {} region-days", aggregates.len());
        aggregates
    }

    fn aggregate_group(
        region: String,
        date: NaiveDate,
        rows: &[&HourlyRecord],
    ) -> DailyRegionalAggregate {
        let temps = || rows.iter().map(|r| r.temperature);
        let daily_temp_range = match (stats::max(temps()), stats::min(temps())) {
            (Some(hi), Some(lo)) => Some(round2(hi - lo)),
            _ => None,
        };

        let precip_total: f64 = rows.iter().map(|r| r.precipitation).sum();
        let hours_with_precip = rows.iter().filter(|r| r.precipitation > 0.0).count();

        let precipitation_intensity = if hours_with_precip == 0 {
            0.0
        } else {
            round2(precip_total / hours_with_precip as f64)
        };

        DailyRegionalAggregate {
            region,
            date,
            daily_temp_range,
            precip_total,
            hours_with_precip,
            wind_direction_mode: stats::mode(rows.iter().map(|r| r.wind_direction.clone())),
            avg_wind_speed: stats::mean(rows.iter().map(|r| r.wind_speed)).map(round2),
            precipitation_intensity,
        }
    }
}

impl Default for RegionalAggregator {
    fn default() -> Self {
        Self::new()
    }
}
