use crate::demo::{run_demo, run_forecast_report, DemoArgs, ForecastReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use subsidy_forecast::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "subsidy-forecast",
    about = "Forecast subsidy attendance risk and revenue for childcare providers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the forecast over a month of exported attendance and payment data
    Forecast {
        #[command(subcommand)]
        command: ForecastCommand,
    },
    /// Run the forecast over built-in sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ForecastCommand {
    /// Classify every child and print the provider dashboard
    Report(ForecastReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Forecast {
            command: ForecastCommand::Report(args),
        } => run_forecast_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
