use clap::Parser;
use keepsafe::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling diagnostic log output.
const LOG_ENV: &str = "KEEPSAFE_LOG";

fn main() {
    // Diagnostics go to stderr so stdout stays clean for `get`/`access`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => keepsafe::cli::commands::init::execute(&cli),
        Commands::Set { ref key, ref value } => {
            keepsafe::cli::commands::set::execute(&cli, key, value.as_deref())
        }
        Commands::Get { ref key } => keepsafe::cli::commands::get::execute(&cli, key),
        Commands::List => keepsafe::cli::commands::list::execute(&cli),
        Commands::Remove { ref key, force } => {
            keepsafe::cli::commands::remove::execute(&cli, key, force)
        }
        Commands::Export {
            format,
            ref output,
            stdout,
        } => keepsafe::cli::commands::export::execute(&cli, format, output.as_deref(), stdout),
        Commands::Access { format } => keepsafe::cli::commands::access::execute(&cli, format),
        Commands::Completions { shell } => keepsafe::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        keepsafe::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
