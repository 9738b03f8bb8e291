use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cellcurve_cli::output::OutputFormat;

mod commands;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Battery discharge-curve interpolation and pack energy estimates"
)]
struct Cli {
    /// Override the reference dataset file or directory.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the energy change between two voltage setpoints.
    Energy(EnergyArgs),
    /// Print the estimated discharge curve for a rate and temperature.
    Curve(CurveArgs),
    /// Look up the discharged capacity at a voltage.
    Capacity(CapacityArgs),
    /// Summarize the loaded reference dataset.
    Info,
}

/// Operating condition shared by the curve-based subcommands.
#[derive(Args, Debug, Clone, Copy)]
pub struct ConditionArgs {
    /// Discharge rate in C (0.2 to 2).
    #[arg(long)]
    pub rate: f64,

    /// Cell temperature in °C (-20 to 40).
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: f64,
}

#[derive(Args, Debug, Clone)]
pub struct EnergyArgs {
    #[command(flatten)]
    pub condition: ConditionArgs,

    /// Starting voltage (pack terminal voltage when --pack is set).
    #[arg(long = "from")]
    pub from: f64,

    /// Ending voltage (pack terminal voltage when --pack is set).
    #[arg(long = "to")]
    pub to: f64,

    /// Pack configuration such as 2s3p.
    #[arg(long)]
    pub pack: Option<String>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct CurveArgs {
    #[command(flatten)]
    pub condition: ConditionArgs,

    /// Emit every Nth sample (the last sample is always emitted).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub stride: u32,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct CapacityArgs {
    #[command(flatten)]
    pub condition: ConditionArgs,

    /// Cell voltage to look up.
    #[arg(long)]
    pub voltage: f64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let dataset = cli.dataset.as_deref();

    match &cli.command {
        Command::Energy(args) => commands::energy::handle_energy(args, dataset, cli.format),
        Command::Curve(args) => commands::curve::handle_curve(args, dataset, cli.format),
        Command::Capacity(args) => commands::capacity::handle_capacity(args, dataset, cli.format),
        Command::Info => commands::info::handle_info(dataset, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
