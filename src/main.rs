use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use saver::cli::{
    error_message, handle_add, handle_del, handle_game_command, handle_list, handle_migrate,
    GameCommands,
};
use saver::config::{paths::DEFAULT_CONFIG_FILE, SaverPaths};
use saver::storage::Storage;
use saver::{logging, server, SaverError};

#[derive(Parser)]
#[command(
    name = "saver",
    version,
    about = "Versioned backups for game save files and directories",
    long_about = "saver keeps an ordered history of snapshots of each game's save \
                  location, so any earlier state can be restored or pruned. \
                  Commands may be abbreviated to any unique prefix.",
    infer_subcommands = true
)]
struct Cli {
    /// Path to config file
    #[arg(
        short,
        long,
        global = true,
        env = "SAVER_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    /// Be very verbose
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new game
    Add {
        /// Unique game name
        name: String,
        /// Save file or directory to protect
        path: PathBuf,
    },

    /// Delete a game and all of its saves
    Del {
        /// Game name
        name: String,
    },

    /// List games
    List,

    /// Per-game commands
    #[command(infer_subcommands = true)]
    Game {
        /// Game name
        name: String,
        #[command(subcommand)]
        command: GameCommands,
    },

    /// Upgrade the config file to the current format
    Migrate,

    /// Serve the HTTP control surface on 127.0.0.1
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "SAVER_PORT", default_value_t = 7070)]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<SaverError>() {
                Some(e) => eprintln!("{}", error_message(e)),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = SaverPaths::new(&cli.config)?;
    let mut storage = Storage::open(paths)?;
    if storage.is_fresh() {
        println!(
            "Will save fresh config to {}",
            storage.paths().config_file().display()
        );
    }

    match cli.command {
        Commands::Add { name, path } => handle_add(&mut storage, &name, &path)?,
        Commands::Del { name } => handle_del(&mut storage, &name)?,
        Commands::List => handle_list(&storage, cli.verbose),
        Commands::Game { name, command } => {
            handle_game_command(&mut storage, &name, command, cli.verbose)?
        }
        Commands::Migrate => handle_migrate(&mut storage)?,
        Commands::Serve { port } => {
            storage.save_if_dirty().context("Can't save config")?;
            server::serve(storage, port)?;
            return Ok(());
        }
    }

    storage.save_if_dirty().context("Can't save config")?;
    Ok(())
}
