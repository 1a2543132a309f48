use crate::error::Result;
use crate::models::SeverityRow;
use std::path::Path;
use tracing::info;

const COLUMN_GAP: &str = "  ";

/// Renders the severity ranking as text or CSV.
///
/// The text layout is a positional index column followed by the five ranking
/// columns, each right-aligned to its widest cell. Numbers carry two decimals
/// and missing values print as `NaN`.
pub struct TableWriter;

impl TableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, rows: &[SeverityRow]) -> String {
        if rows.is_empty() {
            return format!(
                "Empty ranking\nColumns: [{}]\nIndex: []\n",
                SeverityRow::COLUMNS.join(", ")
            );
        }

        let cells: Vec<[String; 5]> = rows.iter().map(|r| r.cells()).collect();
        let index_width = (rows.len() - 1).to_string().len();

        let widths: Vec<usize> = SeverityRow::COLUMNS
            .iter()
            .enumerate()
            .map(|(col, header)| {
                cells
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut output = String::new();

        output.push_str(&" ".repeat(index_width));
        for (header, width) in SeverityRow::COLUMNS.iter().zip(&widths) {
            output.push_str(COLUMN_GAP);
            output.push_str(&format!("{:>width$}", header, width = width));
        }
        output.push('\n');

        for (i, row) in cells.iter().enumerate() {
            output.push_str(&format!("{:<width$}", i, width = index_width));
            for (cell, width) in row.iter().zip(&widths) {
                output.push_str(COLUMN_GAP);
                output.push_str(&format!("{:>width$}", cell, width = width));
            }
            output.push('\n');
        }

        output
    }

    /// Write the ranking as CSV with a header row
    pub fn write_csv(&self, rows: &[SeverityRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(SeverityRow::COLUMNS)?;
        for row in rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;

        info!("Wrote {} severity rows to {}", rows.len(), path.display());
        Ok(())
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn rows() -> Vec<SeverityRow> {
        vec![
            SeverityRow {
                region: "North".to_string(),
                daily_temp_range: Some(4.2),
                precipitation_intensity: 12.5,
                wind_direction_mode: Some("NW".to_string()),
                regional_severity_index: Some(1.0),
            },
            SeverityRow {
                region: "South".to_string(),
                daily_temp_range: None,
                precipitation_intensity: 0.0,
                wind_direction_mode: None,
                regional_severity_index: None,
            },
        ]
    }

    #[test]
    fn test_render_aligns_columns() {
        let text = TableWriter::new().render(&rows());
        let expected = concat!(
            "   region  daily_temp_range  precipitation_intensity  wind_direction_mode  regional_severity_index\n",
            "0   North              4.20                    12.50                   NW                     1.00\n",
            "1   South               NaN                     0.00                  NaN                      NaN\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_empty() {
        let text = TableWriter::new().render(&[]);
        assert!(text.starts_with("Empty ranking"));
        assert!(text.contains("regional_severity_index"));
    }

    #[test]
    fn test_write_csv() {
        let file = NamedTempFile::new().unwrap();
        TableWriter::new().write_csv(&rows(), file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "region,daily_temp_range,precipitation_intensity,wind_direction_mode,regional_severity_index"
        );
        assert_eq!(lines[1], "North,4.20,12.50,NW,1.00");
        assert_eq!(lines[2], "South,NaN,0.00,NaN,NaN");
    }
}
