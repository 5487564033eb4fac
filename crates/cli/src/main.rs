use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use visionpoint_billing::{BillingConfig, OverpaymentPolicy};
use visionpoint_observability::LogFormat;

mod commands;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "visionpoint",
    about = "Billing tools for the Vision Point optical shop",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    debug: bool,

    /// How overpaid bills are shown (show-negative, clamp-to-zero, credit-balance)
    #[arg(long, global = true, env = "VISIONPOINT_OVERPAYMENT_POLICY")]
    overpayment_policy: Option<OverpaymentPolicy>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Log format on stderr (json or pretty)
    #[arg(long, global = true, env = "VISIONPOINT_LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute totals for a bill draft
    Bill {
        /// Draft JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Normalize a stored sale (either schema) into a request body
    Normalize {
        /// Sale JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    visionpoint_observability::init_with(cli.log_format, level);

    let mut config = BillingConfig::from_env();
    if let Some(policy) = cli.overpayment_policy {
        config = config.with_overpayment_policy(policy);
    }

    match run(&cli.command, &config, cli.format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            output::print_error(cli.format, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, config: &BillingConfig, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Bill { input } => {
            let raw = commands::read_input(input)?;
            let report = commands::bill(&raw, config)?;
            match format {
                OutputFormat::Json => output::print_success(&report)?,
                OutputFormat::Text => print!("{}", report.render_text(config)),
            }
        }
        Commands::Normalize { input } => {
            let raw = commands::read_input(input)?;
            let request = commands::normalize(&raw)?;
            match format {
                OutputFormat::Json => output::print_success(&request)?,
                OutputFormat::Text => print!("{}", commands::render_request(&request, config)),
            }
        }
    }
    Ok(())
}
