use crate::error::{ProcessingError, Result};
use crate::processors::RawObservation;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("csv") => Ok(InputFormat::Csv),
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Cannot infer input format of {}; pass --format",
                path.display()
            ))),
        }
    }
}

impl FromStr for InputFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unsupported input format: {}",
                other
            ))),
        }
    }
}

/// Loads observation records from JSON arrays or CSV tables.
pub struct ObservationReader {
    format: Option<InputFormat>,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { format: None }
    }

    pub fn with_format(format: InputFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    fn resolve_format(&self, path: &Path) -> Result<InputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => InputFormat::from_path(path),
        }
    }

    pub async fn read_async(&self, path: &Path) -> Result<Vec<RawObservation>> {
        let format = self.resolve_format(path)?;
        let text = tokio::fs::read_to_string(path).await?;
        let observations = self.parse(&text, format)?;

        info!("Read {} observations from {}", observations.len(), path.display());
        Ok(observations)
    }

    /// Read a whole stream such as stdin. Without a forced format the
    /// stream is taken to be JSON.
    pub async fn read_stream<R>(&self, mut source: R) -> Result<Vec<RawObservation>>
    where
        R: AsyncRead + Unpin,
    {
        let mut text = String::new();
        source.read_to_string(&mut text).await?;
        let observations = self.parse(&text, self.format.unwrap_or(InputFormat::Json))?;

        info!("Read {} observations from stream", observations.len());
        Ok(observations)
    }

    pub fn parse(&self, text: &str, format: InputFormat) -> Result<Vec<RawObservation>> {
        match format {
            InputFormat::Json => parse_json(text),
            InputFormat::Csv => parse_csv(text),
        }
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A top-level array of objects, or an object holding one under `observations`
fn parse_json(text: &str) -> Result<Vec<RawObservation>> {
    let document: Value = serde_json::from_str(text)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("observations") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ProcessingError::InvalidFormat(
                    "JSON object input needs an 'observations' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(ProcessingError::InvalidFormat(
                "JSON input must be an array of observations".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(ProcessingError::MalformedInput {
                index,
                reason: format!("observation is not an object: {}", other),
            }),
        })
        .collect()
}

/// Header row names the fields; every cell is kept as text
fn parse_csv(text: &str) -> Result<Vec<RawObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut observations = Vec::new();

    for record in reader.records() {
        let record = record?;
        let observation: RawObservation = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        observations.push(observation);
    }

    Ok(observations)
}
