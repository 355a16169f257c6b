//! warren - a derived metadata index for a markdown vault

pub mod bridge;
pub mod cli;
pub mod domain;
pub mod extract;
pub mod index;
pub mod infra;
pub mod vault;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_bridge, handle_code, handle_completions, handle_folders, handle_index,
        handle_links, handle_notes, handle_query, handle_stats, handle_tags, handle_tasks,
    },
    logging,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;
    let vault_dir = config.vault_dir(cli.dir.as_ref());
    let verbose = cli.verbose > 0;

    match &cli.command {
        Command::Index(args) => handle_index(args, &vault_dir, verbose),
        Command::Notes(args) => handle_notes(&args.command, &vault_dir),
        Command::Stats(args) => handle_stats(args, &vault_dir),
        Command::Tags(args) => handle_tags(args, &vault_dir),
        Command::Folders(args) => handle_folders(args, &vault_dir),
        Command::Tasks(args) => handle_tasks(args, &vault_dir),
        Command::Links(args) => handle_links(args, &vault_dir),
        Command::Code(args) => handle_code(&args.command, &vault_dir),
        Command::Query(args) => handle_query(args, &vault_dir),
        Command::Bridge(args) => handle_bridge(&args.command, &vault_dir, &config),
        Command::Completions(args) => handle_completions(args),
    }
}
