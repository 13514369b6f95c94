//! cluster-registry entry point.

use clap::Parser;

use cluster_registry::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Cert(args) => commands::cert::execute(args),
    };

    if let Err(err) = result {
        handle_error(err);
    }
}
