use chrono::{Duration, NaiveDate};
use climate_aggregator::models::Reading;
use climate_aggregator::processors::{
    DerivedMetricCalculator, HourlyResampler, ParallelProcessor, RawObservation,
    ReadingNormalizer, RegionalAggregator, SeverityScorer,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const DIRECTIONS: [&str; 4] = ["N", "E", "S", "W"];

// Two readings per hour, with every seventh hour left empty
fn create_test_readings(station_count: usize, hours: usize) -> Vec<Reading> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut readings = Vec::with_capacity(station_count * hours * 2);

    for station in 0..station_count {
        let station_id = format!("ST{:04}", station);
        let region = REGIONS[station % REGIONS.len()];

        for hour in (0..hours).filter(|h| h % 7 != 3) {
            for minute in [10, 40] {
                let ts = start + Duration::hours(hour as i64) + Duration::minutes(minute);
                let wave = ((hour % 24) as f64 / 24.0 * std::f64::consts::TAU).sin();

                readings.push(
                    Reading::builder(&station_id, ts)
                        .region(region)
                        .elevation(50.0 + station as f64)
                        .temperature(12.0 + 8.0 * wave + station as f64 * 0.1)
                        .humidity(60.0 + 20.0 * wave)
                        .pressure(1010.0 - wave * 5.0)
                        .precipitation(if hour % 11 == 0 { 4.5 } else { 0.0 })
                        .wind(6.0 + (hour % 5) as f64, DIRECTIONS[hour % DIRECTIONS.len()])
                        .build(),
                );
            }
        }
    }

    readings
}

fn create_test_observations(station_count: usize, hours: usize) -> Vec<RawObservation> {
    create_test_readings(station_count, hours)
        .into_iter()
        .filter_map(|r| {
            let value = json!({
                "station_id": r.station_id,
                "region": r.region,
                "elevation": r.elevation,
                "timestamp": r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                "temperature": r.temperature,
                "humidity": r.humidity,
                "pressure": r.pressure,
                "precipitation": r.precipitation,
                "wind_speed": r.wind_speed,
                "wind_direction": r.wind_direction,
            });
            value.as_object().cloned()
        })
        .collect()
}

fn benchmark_normalizer(c: &mut Criterion) {
    let observations = create_test_observations(10, 48);

    c.bench_function("reading_normalizer", |b| {
        b.iter(|| {
            let readings = ReadingNormalizer::new().normalize(&observations);
            black_box(readings.map(|r| r.len()).unwrap_or(0))
        })
    });
}

fn benchmark_hourly_resampler(c: &mut Criterion) {
    let enriched = DerivedMetricCalculator::new().enrich_all(create_test_readings(10, 72));

    c.bench_function("hourly_resampler", |b| {
        b.iter(|| {
            let hourly = HourlyResampler::new().resample(&enriched);
            black_box(hourly.len())
        })
    });
}

fn benchmark_regional_scoring(c: &mut Criterion) {
    let output = ParallelProcessor::new(1)
        .process_readings(create_test_readings(20, 96), None)
        .unwrap();

    c.bench_function("regional_scoring", |b| {
        b.iter(|| {
            let aggregates = RegionalAggregator::new().aggregate(&output.hourly);
            let rows = SeverityScorer::new().rank(aggregates);
            black_box(rows.len())
        })
    });
}

fn benchmark_varying_station_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_by_station_count");

    for &size in &[10, 50, 100, 500] {
        group.bench_with_input(BenchmarkId::new("stations", size), &size, |b, &stations| {
            let readings = create_test_readings(stations, 48);
            let processor = ParallelProcessor::default();

            b.iter(|| {
                let output = processor.process_readings(readings.clone(), None);
                black_box(output.map(|o| o.hourly.len()).unwrap_or(0))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_normalizer,
    benchmark_hourly_resampler,
    benchmark_regional_scoring,
    benchmark_varying_station_counts
);
criterion_main!(benches);
