pub mod aggregation;
pub mod calendar;
mod classification;
pub mod config;
pub mod domain;
mod pipeline;
pub mod report;
pub mod revenue;
mod router;
mod service;
pub mod time_in_care;

pub use calendar::ReportingWindow;
pub use classification::RiskClassifier;
pub use config::ForecastConfig;
pub use pipeline::{ForecastDashboard, ForecastPipeline};
pub use report::ForecastReport;
pub use router::forecast_router;
pub use service::{DashboardRequest, ForecastService, ForecastServiceError};
