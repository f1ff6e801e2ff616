//! Builds index snapshots from the raw dataset file

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::error::IndexError;
use crate::index::snapshot::Snapshot;
use crate::system::metrics::Metrics;

/// Reads the dataset file and parses it into a snapshot
///
/// The dataset holds one base-10 integer per line and is assumed to be
/// sorted ascending by whoever produces it. The builder performs no sorting;
/// an unsorted dataset is not detected and yields undefined lookup results.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    path: PathBuf,
}

impl IndexBuilder {
    /// Create a builder reading from the given dataset path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Configured dataset location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the dataset into a fresh, unpublished snapshot
    ///
    /// Fails with [`IndexError::SourceUnavailable`] when the file cannot be
    /// read; the caller's previously published snapshot is unaffected.
    ///
    /// Blank lines are skipped. A non-empty token that does not parse as an
    /// integer is recorded as `0` so later values keep their position; the
    /// anomaly count is logged and exported as a metric.
    pub async fn build(&self) -> Result<Snapshot, IndexError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| IndexError::SourceUnavailable {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "read dataset");

        let content = String::from_utf8_lossy(&bytes);
        let mut values = Vec::new();
        let mut anomalies: u64 = 0;

        for line in content.lines() {
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<i64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    anomalies += 1;
                    values.push(0);
                }
            }
        }

        if anomalies > 0 {
            warn!(
                count = anomalies,
                path = %self.path.display(),
                "dataset contained unparsable tokens, substituted zero"
            );
            Metrics::global().index.parse_anomalies.inc_by(anomalies);
        }

        debug!(values = values.len(), "parsed dataset");

        Ok(Snapshot::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn builds_snapshot_from_sorted_file() {
        let file = dataset("10\n20\n30\n");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert_eq!(snapshot.values(), &[10, 20, 30]);
        assert!(snapshot.published_at().is_none());
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let builder = IndexBuilder::new("does/not/exist.txt");

        let err = builder.build().await.unwrap_err();
        assert!(matches!(err, IndexError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn malformed_tokens_become_zero_in_place() {
        let file = dataset("10\nnot-a-number\n30\n");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert_eq!(snapshot.values(), &[10, 0, 30]);
    }

    #[tokio::test]
    async fn blank_lines_and_trailing_newline_are_skipped() {
        let file = dataset("10\n\n20\n30\n\n");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert_eq!(snapshot.values(), &[10, 20, 30]);
    }

    #[tokio::test]
    async fn windows_line_endings_are_tolerated() {
        let file = dataset("10\r\n20\r\n");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert_eq!(snapshot.values(), &[10, 20]);
    }

    #[tokio::test]
    async fn empty_file_builds_an_empty_snapshot() {
        let file = dataset("");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn negative_values_parse() {
        let file = dataset("-30\n-20\n-10\n");
        let builder = IndexBuilder::new(file.path());

        let snapshot = builder.build().await.unwrap();
        assert_eq!(snapshot.values(), &[-30, -20, -10]);
    }
}
