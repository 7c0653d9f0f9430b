use crate::commands::{
    run_dispatch, run_hos, run_ifta, run_rates, run_route, run_settle, DispatchArgs, HosArgs,
    IftaArgs, RatesArgs, RouteArgs, SettleArgs,
};
use crate::demo::run_demo;
use crate::infra::Session;
use clap::{Args, Parser, Subcommand};
use freight_ops::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "freight-ops",
    about = "Load scoring, lane pricing, compliance, routing and settlements for hotshot carriers",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Never call a model; every result comes from the business-rule fallbacks
    #[arg(long, global = true)]
    pub(crate) offline: bool,
    /// Use each agent's fallback model instead of its primary model
    #[arg(long, global = true)]
    pub(crate) fallback_model: bool,
    /// Write the agent decision log to this JSON file after the run
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) export_decisions: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank candidate loads
    Dispatch(DispatchArgs),
    /// Recommend a rate for a lane
    Rates(RatesArgs),
    /// Check a driver's hours of service
    Hos(HosArgs),
    /// Build a quarterly IFTA report from mileage and fuel CSV exports
    Ifta(IftaArgs),
    /// Calculate a driver settlement
    Settle(SettleArgs),
    /// Compare routes and find backhauls
    Route(RouteArgs),
    /// Run every agent against built-in sample data
    Demo,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let session = Session::start(&cli.global)?;

    match cli.command {
        Command::Dispatch(args) => run_dispatch(&session, args).await,
        Command::Rates(args) => run_rates(&session, args).await,
        Command::Hos(args) => run_hos(&session, args).await,
        Command::Ifta(args) => run_ifta(&session, args),
        Command::Settle(args) => run_settle(&session, args),
        Command::Route(args) => run_route(&session, args).await,
        Command::Demo => run_demo(&session).await,
    }
}
