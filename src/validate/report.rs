use std::collections::BTreeSet;

use super::codes::{ErrorCode, Level};

/// One detected defect: what, at which level, and where.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub code: ErrorCode,
    pub level: Level,
    /// Human-readable location, e.g. `"polygon 3, inner ring 1"`.
    pub context: String,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(code: ErrorCode, level: Level, context: impl Into<String>) -> Self {
        Self {
            code,
            level,
            context: context.into(),
        }
    }
}

/// The result of validating one primitive.
///
/// Records accumulate in phase-traversal order; [`codes`](Self::codes)
/// exposes the contract view: the ascending, deduplicated union across all
/// phases reached. An empty report means the object is valid.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    records: Vec<ErrorRecord>,
}

impl ValidationReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ErrorRecord>) {
        self.records.extend(records);
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.records.is_empty()
    }

    /// Ascending, deduplicated defect codes.
    #[must_use]
    pub fn codes(&self) -> Vec<u16> {
        self.records
            .iter()
            .map(|r| r.code.code())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.records.iter().any(|r| r.code == code)
    }

    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// All records attributed at the given level.
    #[must_use]
    pub fn records_at(&self, level: Level) -> Vec<&ErrorRecord> {
        self.records.iter().filter(|r| r.level == level).collect()
    }

    /// Plain-text summary, one unique code per line.
    #[must_use]
    pub fn summary(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        if self.is_valid() {
            out.push_str("VALID\n");
            return out;
        }
        out.push_str("INVALID\nErrors present:\n");
        let mut seen = BTreeSet::new();
        for r in &self.records {
            seen.insert(r.code);
        }
        for code in seen {
            let _ = writeln!(out, "  {code}");
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(report.codes().is_empty());
        assert_eq!(report.summary(), "VALID\n");
    }

    #[test]
    fn codes_are_deduplicated_and_ascending() {
        let mut report = ValidationReport::new();
        report.push(ErrorRecord::new(
            ErrorCode::DanglingFace,
            Level::Shell,
            "polygon 4",
        ));
        report.push(ErrorRecord::new(
            ErrorCode::ShellSelfIntersection,
            Level::Shell,
            "polygons 1 and 5",
        ));
        report.push(ErrorRecord::new(
            ErrorCode::ShellSelfIntersection,
            Level::Shell,
            "polygons 2 and 5",
        ));
        assert_eq!(report.codes(), vec![303, 307]);
    }

    #[test]
    fn records_at_filters_by_level() {
        let mut report = ValidationReport::new();
        report.push(ErrorRecord::new(
            ErrorCode::TooFewPoints,
            Level::Ring,
            "outer ring",
        ));
        report.push(ErrorRecord::new(
            ErrorCode::ShellNotClosed,
            Level::Shell,
            "shell",
        ));
        assert_eq!(report.records_at(Level::Ring).len(), 1);
        assert_eq!(report.records_at(Level::Solid).len(), 0);
    }

    #[test]
    fn summary_lists_unique_codes() {
        let mut report = ValidationReport::new();
        report.push(ErrorRecord::new(
            ErrorCode::ShellNotClosed,
            Level::Shell,
            "shell",
        ));
        report.push(ErrorRecord::new(
            ErrorCode::ShellNotClosed,
            Level::Shell,
            "shell again",
        ));
        let text = report.summary();
        assert!(text.contains("INVALID"));
        assert_eq!(text.matches("302").count(), 1);
    }
}
