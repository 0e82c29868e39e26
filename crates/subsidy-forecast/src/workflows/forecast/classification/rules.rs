use super::super::calendar::ReportingWindow;
use super::super::config::ForecastConfig;
use super::super::domain::ChildRecord;

/// Family-level measurements feeding the category decision.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiskSignals {
    pub elapsed_fraction: f64,
    /// Attended over approved; `None` when nothing is approved.
    pub attendance_ratio: Option<f64>,
    /// Attendance ratio scaled to the share of the month already elapsed.
    pub paced_ratio: Option<f64>,
    /// Days still needed to reach the threshold.
    pub shortfall: f64,
    /// Days the family could still attend if every child came every remaining day.
    pub remaining_capacity: u32,
    pub child_pattern_met: bool,
}

pub(crate) fn collect_signals(
    record: &ChildRecord,
    window: &ReportingWindow,
    config: &ForecastConfig,
) -> RiskSignals {
    let family = &record.family;
    let approved = family.total_days_approved() as f64;
    let attended = family.total_days_attended() as f64;
    let elapsed_fraction = window.elapsed_fraction();

    let attendance_ratio = (approved > 0.0).then(|| attended / approved);
    let expected_so_far = elapsed_fraction * approved;
    let paced_ratio = (expected_so_far > 0.0).then(|| attended / expected_so_far);

    RiskSignals {
        elapsed_fraction,
        attendance_ratio,
        paced_ratio,
        shortfall: config.attendance_threshold * approved - attended,
        remaining_capacity: family.num_children * window.days_left,
        child_pattern_met: child_attendance_pattern_met(record),
    }
}

/// A child only counts as safe when they attended in every category they are
/// approved for, so one sibling cannot coast on the others' attendance.
pub(crate) fn child_attendance_pattern_met(record: &ChildRecord) -> bool {
    let attended_full = record.full_days_attended >= 1;
    let attended_part = record.part_days_attended >= 1;

    match (
        record.adj_full_days_approved > 0,
        record.adj_part_days_approved > 0,
    ) {
        (true, false) => attended_full,
        (false, true) => attended_part,
        (true, true) => attended_full && attended_part,
        (false, false) => false,
    }
}
