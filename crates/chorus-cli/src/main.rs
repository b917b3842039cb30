//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chorus_cli::{Cli, CliError, Commands, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();
    match cli.command() {
        Commands::Serve { port } => handlers::serve::execute(config, port).await,
        Commands::Voices { languages, engine } => {
            handlers::voices::execute(engine.map(Into::into), &languages).await
        }
    }
}

#[tokio::main]
async fn main() {
    // Usage errors exit with status 2 from inside clap.
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
