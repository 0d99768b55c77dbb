use clap::Parser;

use betslip::adapter::inbound::cli::command::{CheckCommand, Cli, Commands};
use betslip::adapter::inbound::cli::output::{self, OutputConfig};
use betslip::adapter::inbound::cli::{check, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
        Commands::Check(CheckCommand::Events(arg)) => check::execute_events(&arg.events),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
