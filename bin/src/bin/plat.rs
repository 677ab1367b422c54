use anyhow::Result;
use clap::Parser;
use plat_bin::{
    cli::{Cli, Command},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = match plat_log::init(plat_log::LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(error) => {
            eprintln!("warning: failed to initialize logging: {error}");
            None
        },
    };

    match cli.command {
        Command::Address(command) => commands::address::handle(command),
        Command::Access(args) => commands::access::handle(args),
        Command::Fetch(args) => commands::fetch::handle(args).await,
    }
}
