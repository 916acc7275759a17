//! CSV target column reader.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::{open, record_line, TargetSource};
use crate::error::SourceError;

/// Numeric label column of a CSV file with a header row, one row per node.
#[derive(Debug, Clone)]
pub struct TargetCsvFile {
    path: PathBuf,
    column: String,
}

impl TargetCsvFile {
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `column` from any reader.
    pub fn read_from<R: Read>(reader: R, column: &str) -> Result<Vec<f64>, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let index = rdr
            .headers()?
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| SourceError::MissingColumn(column.to_string()))?;

        let mut target = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = record.get(index).unwrap_or_default();
            let value = field.parse().map_err(|_| SourceError::Malformed {
                record: record_line(&record, row),
                reason: format!("target `{field}` is not numeric"),
            })?;
            target.push(value);
        }

        tracing::debug!("Read {} target values from column `{}`", target.len(), column);
        Ok(target)
    }
}

impl TargetSource for TargetCsvFile {
    fn load_target(&self) -> Result<Vec<f64>, SourceError> {
        Self::read_from(open(&self.path)?, &self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_named_column() {
        let csv = "id,target\n0,1\n1,0\n2,2.5\n";
        let target = TargetCsvFile::read_from(csv.as_bytes(), "target").unwrap();
        assert_eq!(target, vec![1.0, 0.0, 2.5]);
    }

    #[test]
    fn test_missing_column() {
        let err = TargetCsvFile::read_from("id,label\n0,1\n".as_bytes(), "target").unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(c) if c == "target"));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = TargetCsvFile::read_from("target\n1\nspam\n".as_bytes(), "target").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { record: 3, .. }));
    }
}
