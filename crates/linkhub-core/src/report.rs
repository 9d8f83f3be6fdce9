//! Import result reporting
//!
//! Folds per-record outcomes into one [`ImportResult`]. Rendering is left to
//! the caller; the result serializes as-is for machine-readable output.

use serde::Serialize;

/// A record that could not be parsed or written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    /// 1-based position of the record in the input
    pub line: usize,
    pub message: String,
}

impl ImportError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Terminal state of one reconciled record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
    Failed(ImportError),
}

/// Summary of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Parse and write errors, ascending by line
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    /// Start a result carrying the errors found while parsing
    pub fn with_parse_errors(errors: Vec<ImportError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Count one reconciled record
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.added += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(error) => {
                self.failed += 1;
                self.errors.push(error);
            }
        }
    }

    /// Order errors by line; records sharing a line keep their order
    pub fn finish(mut self) -> Self {
        self.errors.sort_by_key(|e| e.line);
        self
    }

    /// Number of records that reached reconciliation
    pub fn processed(&self) -> usize {
        self.added + self.updated + self.skipped + self.failed
    }

    /// Completed, but some records were not imported
    pub fn is_partial_failure(&self) -> bool {
        self.failed > 0 || !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut result = ImportResult::default();
        for outcome in [
            Outcome::Created,
            Outcome::Created,
            Outcome::Updated,
            Outcome::Skipped,
            Outcome::Failed(ImportError::new(5, "boom")),
        ] {
            result.record(outcome);
        }
        let result = result.finish();

        assert_eq!(result.added, 2);
        assert_eq!(result.updated, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.processed(), 5);
        assert_eq!(result.errors, vec![ImportError::new(5, "boom")]);
        assert!(result.is_partial_failure());
    }

    #[test]
    fn test_parse_errors_are_not_failures() {
        let mut result = ImportResult::with_parse_errors(vec![ImportError::new(4, "missing url")]);
        result.record(Outcome::Failed(ImportError::new(2, "rejected")));
        result.record(Outcome::Created);
        let result = result.finish();

        assert_eq!(result.failed, 1);
        assert_eq!(result.processed(), 2);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_clean_run_is_not_partial_failure() {
        let mut result = ImportResult::default();
        result.record(Outcome::Created);
        result.record(Outcome::Skipped);
        assert!(!result.is_partial_failure());
    }

    #[test]
    fn test_serialization_shape() {
        let mut result = ImportResult::default();
        result.record(Outcome::Failed(ImportError::new(1, "bad")));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "added": 0,
                "updated": 0,
                "skipped": 0,
                "failed": 1,
                "errors": [{"line": 1, "message": "bad"}]
            })
        );
    }
}
