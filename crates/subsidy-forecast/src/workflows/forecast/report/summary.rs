use super::super::domain::{AttendanceCategory, ChildForecast};
use super::views::{CategoryCountEntry, ForecastReportSummary};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueTotals {
    pub min_revenue: f64,
    pub potential_revenue: f64,
    pub max_revenue: f64,
    pub e_learning_revenue_potential: f64,
}

/// Provider-level roll-up of a forecast run.
#[derive(Debug, Default)]
pub struct ForecastReport {
    pub category_counts: HashMap<AttendanceCategory, usize>,
    pub revenue_totals: RevenueTotals,
}

impl ForecastReport {
    pub fn from_forecasts(children: &[ChildForecast]) -> Self {
        let mut report = Self::default();

        for child in children {
            *report.category_counts.entry(child.category).or_default() += 1;

            let totals = &mut report.revenue_totals;
            totals.min_revenue += child.revenue.min_revenue;
            totals.potential_revenue += child.revenue.potential_revenue;
            totals.max_revenue += child.revenue.max_revenue;
            totals.e_learning_revenue_potential += child.e_learning_revenue_potential;
        }

        report
    }

    pub fn summary(&self) -> ForecastReportSummary {
        let category_counts = AttendanceCategory::ordered()
            .into_iter()
            .map(|category| CategoryCountEntry {
                category,
                category_label: category.label(),
                children: self.category_counts.get(&category).copied().unwrap_or(0),
            })
            .collect();

        ForecastReportSummary {
            category_counts,
            revenue_totals: self.revenue_totals,
        }
    }
}
