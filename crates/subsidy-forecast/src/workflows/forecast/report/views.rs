use super::super::domain::{AttendanceCategory, ChildForecast};
use super::summary::RevenueTotals;
use serde::Serialize;
use std::io::Write;

/// One line of the provider dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub name: String,
    pub case_number: String,
    pub business_name: String,
    pub attendance_category: AttendanceCategory,
    pub attendance_category_label: &'static str,
    pub attendance_rate: Option<f64>,
    pub min_revenue: f64,
    pub potential_revenue: f64,
    pub max_revenue: f64,
    pub max_monthly_payment: Option<f64>,
    pub e_learning_revenue_potential: f64,
}

impl DashboardRow {
    pub fn from_forecast(child: &ChildForecast) -> Self {
        let approval = &child.record.approval;
        Self {
            name: approval.name(),
            case_number: approval.case_number.clone(),
            business_name: approval.business_name.clone(),
            attendance_category: child.category,
            attendance_category_label: child.category.label(),
            attendance_rate: child.attendance_rate(),
            min_revenue: child.revenue.min_revenue,
            potential_revenue: child.revenue.potential_revenue,
            max_revenue: child.revenue.max_revenue,
            max_monthly_payment: approval.max_monthly_payment,
            e_learning_revenue_potential: child.e_learning_revenue_potential,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCountEntry {
    pub category: AttendanceCategory,
    pub category_label: &'static str,
    pub children: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastReportSummary {
    pub category_counts: Vec<CategoryCountEntry>,
    pub revenue_totals: RevenueTotals,
}

/// Everything a dashboard client renders for one run.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub latest_date: String,
    pub is_data_insufficient: bool,
    pub days_req_for_warnings: u32,
    pub rows: Vec<DashboardRow>,
    pub summary: ForecastReportSummary,
}

pub fn write_dashboard_csv<W: Write>(rows: &[DashboardRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
