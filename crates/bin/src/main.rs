use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;
mod transport;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays parseable in JSON mode
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("user_discovery=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let transport = transport::create_transport(&cli.connection).await?;

    let code = match &cli.command {
        Commands::Emails(args) => {
            commands::emails::run(args, transport, cli.count, cli.format).await?
        }
        Commands::Relation(args) => {
            commands::relation::run(args, transport, cli.count, cli.format).await?
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
