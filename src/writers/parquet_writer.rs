use crate::error::{ProcessingError, Result};
use crate::models::{HourlyRecord, SeverityRow};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, StringArray, TimestampSecondArray, UInt32Array,
    UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    fn write_batches(&self, path: &Path, schema: Arc<Schema>, batches: Vec<RecordBatch>) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        for batch in &batches {
            writer.write(batch)?;
        }
        writer.close()?;

        Ok(())
    }

    /// Write the hourly station table
    pub fn write_hourly_records(&self, records: &[HourlyRecord], path: &Path) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = Self::hourly_schema();
        let batches = records
            .chunks(self.row_group_size)
            .map(|chunk| Self::hourly_to_batch(chunk, schema.clone()))
            .collect::<Result<Vec<_>>>()?;

        self.write_batches(path, schema, batches)?;
        info!("Wrote {} hourly records to {}", records.len(), path.display());
        Ok(())
    }

    /// Write the five-column severity ranking
    pub fn write_severity_rows(&self, rows: &[SeverityRow], path: &Path) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let schema = Self::severity_schema();
        let batch = Self::severity_to_batch(rows, schema.clone())?;

        self.write_batches(path, schema, vec![batch])?;
        info!("Wrote {} severity rows to {}", rows.len(), path.display());
        Ok(())
    }

    fn hourly_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("station_id", DataType::Utf8, false),
            Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None), false),
            Field::new("reading_count", DataType::UInt64, false),
            Field::new("region", DataType::Utf8, true),
            Field::new("elevation", DataType::Float64, true),
            Field::new("month", DataType::UInt32, true),
            Field::new("day", DataType::UInt32, true),
            Field::new("hour", DataType::UInt32, true),
            Field::new("temperature", DataType::Float64, true),
            Field::new("humidity", DataType::Float64, true),
            Field::new("pressure", DataType::Float64, true),
            Field::new("precipitation", DataType::Float64, false),
            Field::new("wind_speed", DataType::Float64, true),
            Field::new("wind_direction", DataType::Utf8, true),
            Field::new("feels_like", DataType::Float64, true),
            Field::new("heat_index", DataType::Float64, true),
            Field::new("weather_condition", DataType::Utf8, true),
            Field::new("temperature_trend", DataType::Float64, true),
            Field::new("pressure_change_rate", DataType::Float64, true),
            Field::new("temperature_anomaly", DataType::Boolean, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn hourly_to_batch(records: &[HourlyRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(
                records.iter().map(|r| r.station_id.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(TimestampSecondArray::from(
                records
                    .iter()
                    .map(|r| r.timestamp.and_utc().timestamp())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(UInt64Array::from(
                records.iter().map(|r| r.reading_count as u64).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                records.iter().map(|r| r.region.as_deref()).collect::<Vec<_>>(),
            )),
            float_column(records, |r| r.elevation),
            u32_column(records, |r| r.month),
            u32_column(records, |r| r.day),
            u32_column(records, |r| r.hour),
            float_column(records, |r| r.temperature),
            float_column(records, |r| r.humidity),
            float_column(records, |r| r.pressure),
            float_column(records, |r| Some(r.precipitation)),
            float_column(records, |r| r.wind_speed),
            Arc::new(StringArray::from(
                records
                    .iter()
                    .map(|r| r.wind_direction.as_deref())
                    .collect::<Vec<_>>(),
            )),
            float_column(records, |r| r.feels_like),
            float_column(records, |r| r.heat_index),
            Arc::new(StringArray::from(
                records
                    .iter()
                    .map(|r| r.weather_condition.map(|c| c.as_str()))
                    .collect::<Vec<_>>(),
            )),
            float_column(records, |r| r.temperature_trend),
            float_column(records, |r| r.pressure_change_rate),
            Arc::new(BooleanArray::from(
                records.iter().map(|r| r.temperature_anomaly).collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    fn severity_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("region", DataType::Utf8, false),
            Field::new("daily_temp_range", DataType::Float64, true),
            Field::new("precipitation_intensity", DataType::Float64, false),
            Field::new("wind_direction_mode", DataType::Utf8, true),
            Field::new("regional_severity_index", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn severity_to_batch(rows: &[SeverityRow], schema: Arc<Schema>) -> Result<RecordBatch> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.daily_temp_range).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter()
                    .map(|r| r.precipitation_intensity)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter()
                    .map(|r| r.wind_direction_mode.as_deref())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter()
                    .map(|r| r.regional_severity_index)
                    .collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            columns,
        })
    }
}

fn float_column<F>(records: &[HourlyRecord], f: F) -> ArrayRef
where
    F: Fn(&HourlyRecord) -> Option<f64>,
{
    Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
}

fn u32_column<F>(records: &[HourlyRecord], f: F) -> ArrayRef
where
    F: Fn(&HourlyRecord) -> Option<u32>,
{
    Arc::new(UInt32Array::from(records.iter().map(f).collect::<Vec<_>>()))
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.row_groups as f64
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Avg rows per group: {:.0}\n\
            - Columns: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            avg_rows,
            self.columns.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tempfile::NamedTempFile;

    fn records(count: usize) -> Vec<HourlyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        (0..count)
            .map(|i| {
                let ts = start + Duration::hours(i as i64);
                if i % 3 == 1 {
                    HourlyRecord::gap("S1", ts)
                } else {
                    HourlyRecord {
                        region: Some("North".to_string()),
                        temperature: Some(20.0 + i as f64),
                        reading_count: 2,
                        ..HourlyRecord::gap("S1", ts)
                    }
                }
            })
            .collect()
    }

    #[test]
    fn test_write_empty_records() {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new().unwrap();

        assert!(writer.write_hourly_records(&[], temp_file.path()).is_ok());
        assert!(writer.write_severity_rows(&[], temp_file.path()).is_ok());
    }

    #[test]
    fn test_write_hourly_records_in_row_groups() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(4);
        let temp_file = NamedTempFile::new().unwrap();

        writer.write_hourly_records(&records(10), temp_file.path())?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 10);
        assert_eq!(info.row_groups, 3);
        assert!(info.columns.contains(&"temperature_anomaly".to_string()));
        Ok(())
    }

    #[test]
    fn test_write_severity_rows() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new().unwrap();

        let rows = vec![
            SeverityRow {
                region: "North".to_string(),
                daily_temp_range: Some(4.2),
                precipitation_intensity: 3.0,
                wind_direction_mode: Some("N".to_string()),
                regional_severity_index: Some(0.8),
            },
            SeverityRow {
                region: "South".to_string(),
                daily_temp_range: None,
                precipitation_intensity: 0.0,
                wind_direction_mode: None,
                regional_severity_index: None,
            },
        ];

        writer.write_severity_rows(&rows, temp_file.path())?;
        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.columns.len(), 5);
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        let compressions = ["snappy", "gzip", "lz4", "zstd", "none"];

        for compression in &compressions {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new().unwrap();

            let result = writer.write_hourly_records(&records(3), temp_file.path());
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli-ish").is_err());
        Ok(())
    }
}
