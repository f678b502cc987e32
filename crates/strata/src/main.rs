mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::Options::from(&cli);

    match cli.command {
        Commands::Init => commands::init::run(&opts),
        Commands::Save { content, json } => commands::save::run(&opts, content, json).await,
        Commands::Recent { limit, json } => commands::recent::run(&opts, limit, json).await,
        Commands::Show { level, id } => commands::show::run(&opts, level, &id),
        Commands::Reconcile => commands::reconcile::run(&opts).await,
        Commands::Status => commands::status::run(&opts).await,
        Commands::Version => commands::version::run(),
    }
}
