use serde::{Deserialize, Serialize};

/// Share of approved days a family must attend for the provider to be paid the full approval.
pub const ATTENDANCE_THRESHOLD: f64 = 0.495;

/// Share of the month that must have elapsed before attendance is projected.
pub const MINIMUM_ELAPSED_FRACTION: f64 = 0.5;

/// Tunables for one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub attendance_threshold: f64,
    pub minimum_elapsed_fraction: f64,
    /// Cap attended days at the adjusted approval before family totals are computed.
    pub cap_attendance: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            attendance_threshold: ATTENDANCE_THRESHOLD,
            minimum_elapsed_fraction: MINIMUM_ELAPSED_FRACTION,
            cap_attendance: true,
        }
    }
}
