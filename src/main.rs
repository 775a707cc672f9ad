use clap::Parser;
use mnemovault::cli::{init_tracing, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Set { ref value, check } => {
            mnemovault::cli::commands::set::execute(&cli, value.as_deref(), check)
        }
        Commands::Get => mnemovault::cli::commands::get::execute(&cli),
        Commands::Status => mnemovault::cli::commands::status::execute(&cli),
        Commands::Clear { forget_key, force } => {
            mnemovault::cli::commands::clear::execute(&cli, forget_key, force)
        }
        Commands::Audit { last, ref since } => {
            mnemovault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => {
            mnemovault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        // Full detail only in the debug log; users get the safe message.
        tracing::debug!(error = %e, "command failed");
        mnemovault::cli::output::error(&e.user_message());
        std::process::exit(1);
    }
}
