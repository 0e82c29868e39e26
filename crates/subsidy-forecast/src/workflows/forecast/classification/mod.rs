mod policy;
mod rules;

use super::calendar::ReportingWindow;
use super::config::ForecastConfig;
use super::domain::{AttendanceCategory, ChildRecord};
use policy::decide_category;

/// Stateless classifier assigning each child row an attendance-risk category.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    config: ForecastConfig,
}

impl RiskClassifier {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Expects `record.family` to hold the case totals.
    pub fn classify(&self, record: &ChildRecord, window: &ReportingWindow) -> AttendanceCategory {
        let signals = rules::collect_signals(record, window, &self.config);
        decide_category(&signals, &self.config)
    }
}
