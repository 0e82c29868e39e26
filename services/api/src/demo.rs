use crate::infra::{parse_date, parse_threshold};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use subsidy_forecast::config::AppConfig;
use subsidy_forecast::error::AppError;
use subsidy_forecast::workflows::forecast::report::views::write_dashboard_csv;
use subsidy_forecast::workflows::forecast::{ForecastDashboard, ForecastPipeline};
use subsidy_forecast::workflows::ingest::{ApprovalImporter, AttendanceImporter};

const SAMPLE_ATTENDANCE: &str =
    include_str!("../../../crates/subsidy-forecast/data/sample_attendance.csv");
const SAMPLE_PAYMENT: &str = include_str!("../../../crates/subsidy-forecast/data/sample_payment.csv");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Snapshot date (YYYY-MM-DD); attendance after it is ignored.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ForecastReportArgs {
    /// Attendance export (defaults to the configured data directory)
    #[arg(long)]
    pub(crate) attendance_csv: Option<PathBuf>,
    /// State payment export (defaults to the configured data directory)
    #[arg(long)]
    pub(crate) payment_csv: Option<PathBuf>,
    /// Snapshot date (YYYY-MM-DD); attendance after it is ignored.
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Share of approved days a family must attend (0-1)
    #[arg(long, value_parser = parse_threshold)]
    pub(crate) threshold: Option<f64>,
    /// Keep attended days above the approval instead of capping them
    #[arg(long)]
    pub(crate) no_cap: bool,
    /// Banner lines above the payment export header
    #[arg(long)]
    pub(crate) payment_skip_rows: Option<usize>,
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub(crate) format: OutputFormat,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_forecast_report(args: ForecastReportArgs) -> Result<(), AppError> {
    let ForecastReportArgs {
        attendance_csv,
        payment_csv,
        as_of,
        threshold,
        no_cap,
        payment_skip_rows,
        format,
        out,
    } = args;

    let config = AppConfig::load()?;
    let mut forecast = config.forecast.clone();
    if let Some(threshold) = threshold {
        forecast.attendance_threshold = threshold;
    }
    if no_cap {
        forecast.cap_attendance = false;
    }

    let attendance_path = attendance_csv.unwrap_or_else(|| config.data.attendance_path());
    let payment_path = payment_csv.unwrap_or_else(|| config.data.payment_path());
    let skip_rows = payment_skip_rows.unwrap_or(config.data.payment_skip_rows);

    let attendance = AttendanceImporter::from_path(&attendance_path)?;
    let approvals = ApprovalImporter::from_path(&payment_path, skip_rows)?;
    let dashboard = ForecastPipeline::new(forecast).run(&attendance, approvals, as_of)?;

    match out {
        Some(path) => {
            let mut file = io::BufWriter::new(std::fs::File::create(&path)?);
            write_output(&dashboard, format, &mut file)?;
            file.flush()?;
            println!("Report written to {}", path.display());
        }
        None => write_output(&dashboard, format, &mut io::stdout().lock())?,
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, format } = args;
    let dashboard = sample_dashboard(as_of)?;

    if format == OutputFormat::Text {
        println!("Subsidy forecast demo (sample provider: Lil Baby Ducklings)\n");
    }
    write_output(&dashboard, format, &mut io::stdout().lock())
}

pub(crate) fn sample_dashboard(as_of: Option<NaiveDate>) -> Result<ForecastDashboard, AppError> {
    let attendance = AttendanceImporter::from_reader(Cursor::new(SAMPLE_ATTENDANCE))?;
    let approvals = ApprovalImporter::from_reader(Cursor::new(SAMPLE_PAYMENT), 1)?;
    Ok(ForecastPipeline::default().run(&attendance, approvals, as_of)?)
}

pub(crate) fn write_output<W: Write>(
    dashboard: &ForecastDashboard,
    format: OutputFormat,
    writer: &mut W,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => render_text(dashboard, writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &dashboard.view())?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_dashboard_csv(&dashboard.rows(), &mut *writer)?,
    }
    Ok(())
}

pub(crate) fn render_text<W: Write>(dashboard: &ForecastDashboard, out: &mut W) -> io::Result<()> {
    let window = &dashboard.window;
    writeln!(out, "Attendance forecast as of {}", dashboard.latest_date())?;
    writeln!(
        out,
        "Data covers {} of {} days ({} left); risk warnings need {} days.",
        window.days_elapsed(),
        window.days_in_month,
        window.days_left,
        dashboard.days_req_for_warnings
    )?;
    if dashboard.is_data_insufficient {
        writeln!(
            out,
            "Less than half of the month has elapsed; every open case reads Not enough info."
        )?;
    }

    let summary = dashboard.report().summary();
    writeln!(out, "\nCategories")?;
    for entry in &summary.category_counts {
        writeln!(out, "- {}: {}", entry.category_label, entry.children)?;
    }

    let totals = &summary.revenue_totals;
    writeln!(out, "\nRevenue")?;
    writeln!(out, "- Guaranteed: {}", money(totals.min_revenue))?;
    writeln!(out, "- Potential: {}", money(totals.potential_revenue))?;
    writeln!(out, "- Maximum approved: {}", money(totals.max_revenue))?;
    writeln!(
        out,
        "- E-learning upside: {}",
        money(totals.e_learning_revenue_potential)
    )?;

    writeln!(out, "\nChildren")?;
    for row in dashboard.rows() {
        let rate = row
            .attendance_rate
            .map(|rate| format!("{:.0}%", rate * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "- {} (case {}, {}): {} | family attendance {} | min {} | potential {} | max {}",
            row.name,
            row.case_number,
            row.business_name,
            row.attendance_category_label,
            rate,
            money(row.min_revenue),
            money(row.potential_revenue),
            money(row.max_revenue)
        )?;
    }

    Ok(())
}

fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(format: OutputFormat) -> String {
        let dashboard = sample_dashboard(None).expect("sample runs");
        let mut buffer = Vec::new();
        write_output(&dashboard, format, &mut buffer).expect("render");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn text_report_lists_categories_revenue_and_children() {
        let text = rendered(OutputFormat::Text);
        assert!(text.starts_with("Attendance forecast as of Sep 16 2020"));
        assert!(text.contains("- At risk: 2"));
        assert!(text.contains("- Guaranteed: $705.00"));
        assert!(text.contains("- E-learning upside: $120.00"));
        assert!(text.contains(
            "- Jan Schakowsky (case 1001, Lil Baby Ducklings): Sure bet | family attendance 67%"
        ));
        assert!(text.contains("Ilhan Omar (case 1004, Lil Baby Ducklings): Case expired | family attendance n/a"));
        assert!(!text.contains("Less than half"));
    }

    #[test]
    fn early_snapshot_flags_insufficient_data() {
        let dashboard =
            sample_dashboard(NaiveDate::from_ymd_opt(2020, 9, 8)).expect("sample runs");
        let mut buffer = Vec::new();
        render_text(&dashboard, &mut buffer).expect("render");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.contains("Less than half of the month has elapsed"));
        assert!(text.contains("- Not enough info: 5"));
    }

    #[test]
    fn csv_report_has_one_row_per_child() {
        let csv = rendered(OutputFormat::Csv);
        let mut lines = csv.lines();
        let header = lines.next().expect("header");
        assert!(header.starts_with("name,case_number,business_name,attendance_category"));
        assert_eq!(lines.count(), 6);
    }

    #[test]
    fn json_report_carries_summary() {
        let json = rendered(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(
            value.pointer("/summary/revenue_totals/max_revenue"),
            Some(&serde_json::json!(2350.0))
        );
        assert_eq!(value.get("rows").and_then(|rows| rows.as_array()).map(Vec::len), Some(6));
    }

    #[test]
    fn negative_amounts_keep_the_sign_outside_the_symbol() {
        assert_eq!(money(-12.5), "-$12.50");
        assert_eq!(money(0.0), "$0.00");
    }
}
