use crate::converter::FilterDecision;
use serde::Serialize;
use std::path::PathBuf;

/// Counters collected over one conversion pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    /// `None` for a dry run.
    pub output_path: Option<PathBuf>,
    pub items_total: usize,
    pub items_included: usize,
    pub items_skipped_no_login: usize,
    pub items_excluded: usize,
    pub items_outside_filter: usize,
    pub records_written: usize,
    pub warnings: Vec<String>,
}

impl ConversionReport {
    pub fn new<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn record_decision(&mut self, decision: FilterDecision) {
        self.items_total += 1;
        match decision {
            FilterDecision::Included => self.items_included += 1,
            FilterDecision::SkippedNoLogin => self.items_skipped_no_login += 1,
            FilterDecision::Excluded => self.items_excluded += 1,
            FilterDecision::NotInFolder => self.items_outside_filter += 1,
        }
    }

    pub fn add_warning<S: Into<String>>(&mut self, warning: S) {
        self.warnings.push(warning.into());
    }

    pub fn is_dry_run(&self) -> bool {
        self.output_path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_counters() {
        let mut report = ConversionReport::new("export.json");
        report.record_decision(FilterDecision::Included);
        report.record_decision(FilterDecision::Included);
        report.record_decision(FilterDecision::SkippedNoLogin);
        report.record_decision(FilterDecision::Excluded);
        report.record_decision(FilterDecision::NotInFolder);

        assert_eq!(report.items_total, 5);
        assert_eq!(report.items_included, 2);
        assert_eq!(report.items_skipped_no_login, 1);
        assert_eq!(report.items_excluded, 1);
        assert_eq!(report.items_outside_filter, 1);
        assert!(report.is_dry_run());
    }
}
