use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceCategory {
    NotEnoughInfo,
    SureBet,
    NotMet,
    AtRisk,
    OnTrack,
    CaseExpired,
}

impl AttendanceCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::SureBet,
            Self::OnTrack,
            Self::AtRisk,
            Self::NotMet,
            Self::NotEnoughInfo,
            Self::CaseExpired,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotEnoughInfo => "Not enough info",
            Self::SureBet => "Sure bet",
            Self::NotMet => "Not met",
            Self::AtRisk => "At risk",
            Self::OnTrack => "On track",
            Self::CaseExpired => "Case expired",
        }
    }
}

/// One check-in event after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub child_id: String,
    /// Business the visit was logged under, compared against the approval.
    pub business_name: Option<String>,
    pub date: NaiveDate,
    pub time_in_care_hours: f64,
}

/// Per-day rates from the approval letter; quality add-ons only appear in some exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub full_day_rate: f64,
    pub part_day_rate: f64,
    pub full_day_quality_add_on: Option<f64>,
    pub part_day_quality_add_on: Option<f64>,
}

impl RateTable {
    pub fn new(full_day_rate: f64, part_day_rate: f64) -> Self {
        Self {
            full_day_rate,
            part_day_rate,
            full_day_quality_add_on: None,
            part_day_quality_add_on: None,
        }
    }

    pub fn full_rate(&self) -> f64 {
        self.full_day_rate + self.full_day_quality_add_on.unwrap_or(0.0)
    }

    pub fn part_rate(&self) -> f64 {
        self.part_day_rate + self.part_day_quality_add_on.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Copay {
    PerChild(f64),
    /// Charged once per case and shared evenly by the eligible children.
    Family(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Ineligible,
}

/// Approved payment terms for one child in the billing cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRecord {
    pub business_name: String,
    pub case_number: String,
    pub first_name: String,
    pub last_name: String,
    pub child_id: String,
    pub school_age: bool,
    pub full_days_approved: u32,
    pub part_days_approved: u32,
    pub rates: RateTable,
    pub copay: Option<Copay>,
    pub max_monthly_payment: Option<f64>,
    pub eligibility: Eligibility,
}

impl ApprovalRecord {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_eligible(&self) -> bool {
        self.eligibility == Eligibility::Eligible
    }
}

/// Day units earned by a single stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub full_days: u32,
    pub part_days: u32,
}

impl DayCounts {
    pub const fn new(full_days: u32, part_days: u32) -> Self {
        Self {
            full_days,
            part_days,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChildAttendanceSummary {
    pub full_days_attended: u32,
    pub part_days_attended: u32,
}

impl AddAssign<DayCounts> for ChildAttendanceSummary {
    fn add_assign(&mut self, counts: DayCounts) {
        self.full_days_attended += counts.full_days;
        self.part_days_attended += counts.part_days;
    }
}

/// Case-level sums attached to every child of the case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FamilyTotals {
    pub full_days_approved: u32,
    pub full_days_attended: u32,
    pub part_days_approved: u32,
    pub part_days_attended: u32,
    pub num_children: u32,
}

impl FamilyTotals {
    pub fn total_days_approved(&self) -> u32 {
        self.full_days_approved.saturating_add(self.part_days_approved)
    }

    pub fn total_days_attended(&self) -> u32 {
        self.full_days_attended.saturating_add(self.part_days_attended)
    }

    /// `None` when the family has no approved days at all.
    pub fn attendance_rate(&self) -> Option<f64> {
        match self.total_days_approved() {
            0 => None,
            approved => Some(self.total_days_attended() as f64 / approved as f64),
        }
    }
}

/// Approval joined with attendance, after school-age adjustment and capping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRecord {
    pub approval: ApprovalRecord,
    pub full_days_attended: u32,
    pub part_days_attended: u32,
    pub adj_full_days_approved: u32,
    pub adj_part_days_approved: u32,
    pub family: FamilyTotals,
}

impl ChildRecord {
    pub fn from_approval(approval: ApprovalRecord, attendance: ChildAttendanceSummary) -> Self {
        let adj_full_days_approved = approval.full_days_approved;
        let adj_part_days_approved = approval.part_days_approved;
        Self {
            approval,
            full_days_attended: attendance.full_days_attended,
            part_days_attended: attendance.part_days_attended,
            adj_full_days_approved,
            adj_part_days_approved,
            family: FamilyTotals::default(),
        }
    }

    pub fn case_number(&self) -> &str {
        &self.approval.case_number
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RevenueEstimate {
    pub min_revenue: f64,
    pub potential_revenue: f64,
    pub max_revenue: f64,
}

/// Terminal per-child result of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildForecast {
    pub record: ChildRecord,
    pub category: AttendanceCategory,
    pub revenue: RevenueEstimate,
    pub e_learning_revenue_potential: f64,
}

impl ChildForecast {
    pub fn attendance_rate(&self) -> Option<f64> {
        match self.category {
            AttendanceCategory::CaseExpired => None,
            _ => self.record.family.attendance_rate(),
        }
    }
}

/// Raised when a stay cannot physically fit in one calendar day.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("time in care of {hours} hours is outside the 0-24 hour range")]
pub struct DomainError {
    pub hours: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("attendance for {child_id} on {date}: {source}")]
    TimeInCare {
        child_id: String,
        date: NaiveDate,
        #[source]
        source: DomainError,
    },
    #[error("no attendance records and no snapshot date to place the reporting month")]
    NoAttendance,
}
