//! Gigmate CLI — the main entry point.
//!
//! Commands:
//! - `init`         — Write a starter config file
//! - `chat`         — Interactive chat or single-message mode
//! - `capabilities` — List the capabilities the assistant can invoke
//! - `status`       — Show configuration status

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gigmate",
    about = "Gigmate — conversational assistant for the freelance marketplace",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file to ~/.gigmate/config.toml
    Init,

    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Marketplace user id to act on behalf of
        #[arg(short, long, env = "GIGMATE_USER_ID", default_value = "me")]
        user: String,
    },

    /// List the capabilities the assistant can invoke
    Capabilities,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat { message, user } => commands::chat::run(message, user).await?,
        Commands::Capabilities => commands::capabilities::run().await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
