use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod client;
mod config;
mod fields;
mod form;
mod models;
mod output;
mod presentation;
mod runner;

use crate::config::Config;
use crate::output::OutputFormat;
use crate::runner::Runner;

/// Income prediction client - fill in a person's profile and ask the model whether they earn >50K
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output - log each request and response
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the profile once and print the prediction
    Predict {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Override a field, e.g. --set age=39 (repeatable)
        #[arg(short = 's', long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,

        /// Output format: plain or json
        #[arg(short, long, default_value = "plain")]
        output: OutputFormat,
    },
    /// Fill in the form line by line and submit as often as you like
    Interactive {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// List every field with its allowed values
    Fields,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prediction endpoint, overrides the configuration file
    #[arg(short, long)]
    endpoint: Option<String>,
}

impl ConnectionArgs {
    fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Predict {
            connection,
            overrides,
            output: format,
        } => {
            let config = connection.load()?;
            let mut runner = Runner::new(&config)?;
            runner.apply_overrides(&overrides)?;

            let view = runner.submit().await;
            output::print_view(&view, format);
        }
        Command::Interactive { connection } => {
            let config = connection.load()?;
            let mut runner = Runner::new(&config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            runner.run_session(stdin, &mut std::io::stdout()).await?;
        }
        Command::Fields => print!("{}", output::format_fields()),
    }

    Ok(())
}
