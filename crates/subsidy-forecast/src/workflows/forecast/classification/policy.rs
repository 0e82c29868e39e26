use super::super::config::ForecastConfig;
use super::super::domain::AttendanceCategory;
use super::rules::RiskSignals;

/// First matching rule wins.
pub(crate) fn decide_category(signals: &RiskSignals, config: &ForecastConfig) -> AttendanceCategory {
    if signals.elapsed_fraction < config.minimum_elapsed_fraction {
        return AttendanceCategory::NotEnoughInfo;
    }

    let (Some(attendance_ratio), Some(paced_ratio)) =
        (signals.attendance_ratio, signals.paced_ratio)
    else {
        return AttendanceCategory::NotEnoughInfo;
    };

    if attendance_ratio >= config.attendance_threshold && signals.child_pattern_met {
        return AttendanceCategory::SureBet;
    }

    if signals.shortfall > signals.remaining_capacity as f64 {
        return AttendanceCategory::NotMet;
    }

    if paced_ratio < config.attendance_threshold {
        return AttendanceCategory::AtRisk;
    }

    AttendanceCategory::OnTrack
}
