use super::aggregation::{
    adjust_school_age_days, business_mismatches, calculate_family_days, cap_attendance,
    count_days_attended, join_attendance,
};
use super::calendar::ReportingWindow;
use super::classification::RiskClassifier;
use super::config::ForecastConfig;
use super::domain::{
    ApprovalRecord, AttendanceCategory, AttendanceRecord, ChildForecast, ChildRecord,
    ForecastError, RevenueEstimate,
};
use super::report::views::{DashboardRow, DashboardView};
use super::report::ForecastReport;
use super::revenue::{e_learning_revenue_potential, estimate_revenue};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Runs the attendance/approval join through classification and revenue estimation.
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// `as_of` drops attendance recorded after the snapshot date.
    pub fn run(
        &self,
        attendance: &[AttendanceRecord],
        approvals: Vec<ApprovalRecord>,
        as_of: Option<NaiveDate>,
    ) -> Result<ForecastDashboard, ForecastError> {
        let snapshot: Vec<&AttendanceRecord> = attendance
            .iter()
            .filter(|record| as_of.map_or(true, |cutoff| record.date <= cutoff))
            .collect();

        let latest_date = snapshot
            .iter()
            .map(|record| record.date)
            .max()
            .or(as_of)
            .ok_or(ForecastError::NoAttendance)?;
        let window = ReportingWindow::from_latest_date(latest_date);

        let in_month: Vec<AttendanceRecord> = snapshot
            .into_iter()
            .filter(|record| window.contains(record.date))
            .cloned()
            .collect();
        let excluded = attendance.len() - in_month.len();
        if excluded > 0 {
            warn!(
                excluded,
                latest_date = %window.latest_date,
                "attendance outside the reporting month or after the snapshot was ignored"
            );
        }

        let per_child = count_days_attended(&in_month)?;
        let approved_ids: HashSet<&str> = approvals
            .iter()
            .map(|approval| approval.child_id.as_str())
            .collect();
        let orphaned = per_child
            .keys()
            .filter(|child_id| !approved_ids.contains(child_id.as_str()))
            .count();
        if orphaned > 0 {
            warn!(orphaned, "attendance found for children without an approval");
        }
        let mismatched = business_mismatches(&in_month, &approvals);
        if !mismatched.is_empty() {
            warn!(
                children = ?mismatched,
                "attendance logged under a different business than the approval"
            );
        }

        let mut records = adjust_school_age_days(join_attendance(approvals, &per_child));
        if self.config.cap_attendance {
            records = cap_attendance(records);
        }

        let (eligible, expired): (Vec<(usize, ChildRecord)>, Vec<(usize, ChildRecord)>) = records
            .into_iter()
            .enumerate()
            .partition(|(_, record)| record.approval.is_eligible());
        let (positions, eligible): (Vec<usize>, Vec<ChildRecord>) = eligible.into_iter().unzip();
        debug!(
            eligible = eligible.len(),
            expired = expired.len(),
            "approvals joined with attendance"
        );

        let classifier = RiskClassifier::new(self.config.clone());
        let mut children: Vec<(usize, ChildForecast)> = positions
            .into_iter()
            .zip(calculate_family_days(eligible))
            .map(|(position, record)| {
                let category = classifier.classify(&record, &window);
                let revenue = estimate_revenue(&record, category, window.days_left);
                let e_learning_revenue_potential = e_learning_revenue_potential(&record);
                (
                    position,
                    ChildForecast {
                        record,
                        category,
                        revenue,
                        e_learning_revenue_potential,
                    },
                )
            })
            .collect();

        children.extend(expired.into_iter().map(|(position, record)| {
            (
                position,
                ChildForecast {
                    record,
                    category: AttendanceCategory::CaseExpired,
                    revenue: RevenueEstimate::default(),
                    e_learning_revenue_potential: 0.0,
                },
            )
        }));
        children.sort_by_key(|(position, _)| *position);

        let dashboard = ForecastDashboard {
            window,
            is_data_insufficient: window.is_data_insufficient(self.config.minimum_elapsed_fraction),
            days_req_for_warnings: window.days_required_for_warnings(),
            children: children.into_iter().map(|(_, child)| child).collect(),
        };

        info!(
            children = dashboard.children.len(),
            latest_date = %window.latest_date,
            insufficient = dashboard.is_data_insufficient,
            "attendance forecast computed"
        );

        Ok(dashboard)
    }
}

/// Output of one forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDashboard {
    pub window: ReportingWindow,
    pub is_data_insufficient: bool,
    pub days_req_for_warnings: u32,
    pub children: Vec<ChildForecast>,
}

impl ForecastDashboard {
    pub fn latest_date(&self) -> String {
        self.window.latest_date_label()
    }

    pub fn rows(&self) -> Vec<DashboardRow> {
        self.children.iter().map(DashboardRow::from_forecast).collect()
    }

    pub fn report(&self) -> ForecastReport {
        ForecastReport::from_forecasts(&self.children)
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            latest_date: self.latest_date(),
            is_data_insufficient: self.is_data_insufficient,
            days_req_for_warnings: self.days_req_for_warnings,
            rows: self.rows(),
            summary: self.report().summary(),
        }
    }
}
