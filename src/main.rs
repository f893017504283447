use clap::{Parser, Subcommand};
use eightstash::commands::*;
use eightstash::core::{
    config::Settings,
    error::{Result, StashError},
    print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "8stash")]
#[command(about = "Stash local changes on a remote branch and bring them back later")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Move local changes to a new stash branch on the remote (default)
    Push {
        /// Commit message for the stash branch
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Reapply a stash branch and delete it
    Pop {
        /// Stash number or full branch name; may be omitted when only one stash exists
        identifier: Option<String>,
    },
    /// List stash branches with their age, author and message
    List,
    /// Delete a stash branch locally and on the remote
    Drop {
        /// Stash number or full branch name
        identifier: String,
    },
    /// Delete stash branches older than the retention period
    Cleanup {
        /// Minimum age in days (overrides retention_days)
        #[arg(short, long)]
        days: Option<u32>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

impl Commands {
    fn operation(&self) -> &'static str {
        match self {
            Commands::Push { .. } => "push",
            Commands::Pop { .. } => "pop",
            Commands::List => "list",
            Commands::Drop { .. } => "drop",
            Commands::Cleanup { .. } => "cleanup",
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(settings: &Settings, command: Commands) -> Result<()> {
    match command {
        Commands::Push { message } => execute_push(settings, message).map(|_| ()),
        Commands::Pop { identifier } => execute_pop(settings, identifier).map(|_| ()),
        Commands::List => execute_list(settings).map(|_| ()),
        Commands::Drop { identifier } => execute_drop(settings, &identifier).map(|_| ()),
        Commands::Cleanup { days, yes } => {
            let mut settings = settings.clone();
            if let Some(days) = days {
                settings = settings.with_retention_days(days);
            }
            if yes {
                settings = settings.with_skip_confirmation(true);
            }
            execute_cleanup(&settings).map(|_| ())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let command = cli.command.unwrap_or(Commands::Push { message: None });
    let operation = command.operation();

    let settings = match env::current_dir()
        .map_err(StashError::from)
        .and_then(|dir| Settings::load(&dir))
    {
        Ok(settings) => settings,
        Err(e) => {
            print_error(operation, &e.to_string());
            std::process::exit(1);
        }
    };
    log::debug!("Loaded settings: {settings:?}");

    if let Err(e) = run(&settings, command) {
        print_error(operation, &e.to_string());
        std::process::exit(1);
    }
}
