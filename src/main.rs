//! drmscope - report the DRM of every game in a Steam library

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod pipeline;

use cli::{CacheCommands, Cli, CommandContext, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `warn` by default, `debug` for this crate with `--debug`; `RUST_LOG` wins
fn init_logging(debug: bool) {
    let default = if debug { "warn,drmscope=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Check { account, backend } => {
            // Reject blank input before touching config or the network
            cli::check::validate_account(&account)?;
            let ctx = CommandContext::new(&opts)?;
            cli::check::run(&ctx, &account, backend).await
        }
        Commands::Ask { prompt, backend } => {
            let ctx = CommandContext::new(&opts)?;
            cli::ask::run(&ctx, &prompt, backend).await
        }
        Commands::Init => cli::init::run(&opts),
        Commands::Status => {
            let ctx = CommandContext::new(&opts)?;
            cli::status::run(&opts, &ctx)
        }
        Commands::Version => {
            println!("drmscope version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Cache(cache_cmd) => {
            let ctx = CommandContext::new(&opts)?;
            match cache_cmd {
                CacheCommands::Status => cli::cache::status(&ctx),
                CacheCommands::Clear => cli::cache::clear(&ctx),
                CacheCommands::Path => cli::cache::path(&ctx),
            }
        }
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "drmscope",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
