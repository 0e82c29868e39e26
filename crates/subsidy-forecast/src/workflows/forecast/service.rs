use super::config::ForecastConfig;
use super::domain::ForecastError;
use super::pipeline::ForecastPipeline;
use super::report::views::DashboardView;
use crate::workflows::ingest::{ApprovalImporter, AttendanceImporter, ImportError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Inline CSV payloads plus per-request overrides of the configured tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub attendance_csv: String,
    pub payment_csv: String,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub payment_skip_rows: Option<usize>,
    #[serde(default)]
    pub attendance_threshold: Option<f64>,
    #[serde(default)]
    pub cap_attendance: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ForecastServiceError {
    #[error("attendance export: {0}")]
    Attendance(#[source] ImportError),
    #[error("payment export: {0}")]
    Payment(#[source] ImportError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("attendance threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),
}

/// Runs the pipeline over CSV text supplied by a caller.
#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    defaults: ForecastConfig,
    payment_skip_rows: usize,
}

impl ForecastService {
    pub fn new(defaults: ForecastConfig, payment_skip_rows: usize) -> Self {
        Self {
            defaults,
            payment_skip_rows,
        }
    }

    pub fn dashboard(
        &self,
        request: DashboardRequest,
    ) -> Result<DashboardView, ForecastServiceError> {
        let mut config = self.defaults.clone();
        if let Some(threshold) = request.attendance_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ForecastServiceError::InvalidThreshold(threshold));
            }
            config.attendance_threshold = threshold;
        }
        if let Some(cap) = request.cap_attendance {
            config.cap_attendance = cap;
        }

        let attendance = AttendanceImporter::from_reader(Cursor::new(request.attendance_csv))
            .map_err(ForecastServiceError::Attendance)?;
        let approvals = ApprovalImporter::from_reader(
            Cursor::new(request.payment_csv),
            request.payment_skip_rows.unwrap_or(self.payment_skip_rows),
        )
        .map_err(ForecastServiceError::Payment)?;

        let dashboard = ForecastPipeline::new(config).run(&attendance, approvals, request.as_of)?;
        Ok(dashboard.view())
    }
}
