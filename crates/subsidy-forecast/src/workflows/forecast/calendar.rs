use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Position of the snapshot within its calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingWindow {
    pub latest_date: NaiveDate,
    pub days_in_month: u32,
    pub days_left: u32,
}

impl ReportingWindow {
    pub fn from_latest_date(latest_date: NaiveDate) -> Self {
        let days_in_month = days_in_month(latest_date);
        Self {
            latest_date,
            days_in_month,
            days_left: days_in_month - latest_date.day(),
        }
    }

    pub fn days_elapsed(&self) -> u32 {
        self.days_in_month - self.days_left
    }

    pub fn elapsed_fraction(&self) -> f64 {
        self.days_elapsed() as f64 / self.days_in_month as f64
    }

    pub fn is_data_insufficient(&self, minimum_elapsed_fraction: f64) -> bool {
        self.elapsed_fraction() < minimum_elapsed_fraction
    }

    /// Days of data needed before risk warnings mean anything (half the month, rounded up).
    pub fn days_required_for_warnings(&self) -> u32 {
        self.days_in_month.div_ceil(2)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.latest_date.year() && date.month() == self.latest_date.month()
    }

    pub fn latest_date_label(&self) -> String {
        self.latest_date.format("%b %d %Y").to_string()
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next_month| next_month.pred_opt())
        .map(|last_day| last_day.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn window_counts_days_left_in_month() {
        let window = ReportingWindow::from_latest_date(date(2020, 9, 2));
        assert_eq!((window.days_in_month, window.days_left), (30, 28));
        assert_eq!(window.days_elapsed(), 2);
    }

    #[test]
    fn handles_february_and_december() {
        assert_eq!(
            ReportingWindow::from_latest_date(date(2020, 2, 10)).days_in_month,
            29
        );
        assert_eq!(
            ReportingWindow::from_latest_date(date(2021, 2, 10)).days_in_month,
            28
        );
        let december = ReportingWindow::from_latest_date(date(2020, 12, 31));
        assert_eq!((december.days_in_month, december.days_left), (31, 0));
    }

    #[test]
    fn insufficient_data_before_half_month() {
        let early = ReportingWindow::from_latest_date(date(2020, 9, 8));
        assert!(early.is_data_insufficient(0.5));

        let midpoint = ReportingWindow::from_latest_date(date(2020, 9, 15));
        assert!(!midpoint.is_data_insufficient(0.5));
    }

    #[test]
    fn warnings_need_half_the_month_rounded_up() {
        assert_eq!(
            ReportingWindow::from_latest_date(date(2020, 9, 1)).days_required_for_warnings(),
            15
        );
        assert_eq!(
            ReportingWindow::from_latest_date(date(2020, 10, 1)).days_required_for_warnings(),
            16
        );
    }

    #[test]
    fn contains_only_same_calendar_month() {
        let window = ReportingWindow::from_latest_date(date(2020, 9, 13));
        assert!(window.contains(date(2020, 9, 1)));
        assert!(!window.contains(date(2020, 8, 31)));
        assert!(!window.contains(date(2019, 9, 1)));
        assert_eq!(window.latest_date_label(), "Sep 13 2020");
    }
}
