//! CLI command definitions and handlers.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// warren - a derived metadata index for a markdown vault
#[derive(Parser, Debug)]
#[command(name = "warren", version, about, long_about = None)]
pub struct Cli {
    /// Vault directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the index from the vault
    Index(IndexArgs),

    /// Show vault statistics
    Stats(StatsArgs),

    /// List and inspect indexed notes
    Notes(NotesArgs),

    /// List all tags with counts
    Tags(TagsArgs),

    /// List all folders with note counts
    Folders(FoldersArgs),

    /// List tasks across the vault
    Tasks(TasksArgs),

    /// Show outlinks and backlinks for a note
    Links(LinksArgs),

    /// Code block analytics across the vault
    Code(CodeArgs),

    /// Submit a query to the bridge and wait for the result
    Query(QueryArgs),

    /// Operate the query bridge
    Bridge(BridgeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct IndexArgs {}

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct NotesArgs {
    #[command(subcommand)]
    pub command: NotesCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// List indexed notes
    List(NotesListArgs),

    /// Show the indexed record for one note
    Info(NotesInfoArgs),
}

#[derive(clap::Args, Debug)]
pub struct NotesListArgs {
    /// Sort order
    #[arg(short, long, value_enum, default_value_t)]
    pub sort: NoteSort,

    /// Show at most this many notes
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Sort orders for the notes listing.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum NoteSort {
    /// Vault-relative path, ascending
    #[default]
    Name,
    /// Last-modified time, newest first
    Modified,
    /// File size, largest first
    Size,
}

#[derive(clap::Args, Debug)]
pub struct NotesInfoArgs {
    /// Vault-relative note path
    pub path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct TagsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct FoldersArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct TasksArgs {
    /// Show only completed tasks
    #[arg(long, conflicts_with = "incomplete")]
    pub completed: bool,

    /// Show only incomplete tasks
    #[arg(long)]
    pub incomplete: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct LinksArgs {
    /// Vault-relative note path
    pub path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct CodeArgs {
    #[command(subcommand)]
    pub command: CodeCommand,
}

#[derive(Subcommand, Debug)]
pub enum CodeCommand {
    /// Per-language code block totals
    Stats(CodeStatsArgs),

    /// List notes containing code blocks
    Notes(CodeNotesArgs),

    /// List notes containing code blocks of one language
    Search(CodeSearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct CodeStatsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct CodeNotesArgs {
    /// Only notes with blocks of this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct CodeSearchArgs {
    /// Fence language token, e.g. `rust`
    pub language: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Query text, e.g. "LIST tags"
    pub query: String,

    /// Seconds to wait for a result before giving up
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Submit without waiting; prints the request id
    #[arg(long)]
    pub no_wait: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct BridgeArgs {
    #[command(subcommand)]
    pub command: BridgeCommand,
}

#[derive(Subcommand, Debug)]
pub enum BridgeCommand {
    /// Run the poll loop against the built-in engine
    Run(BridgeRunArgs),

    /// Show bridge status
    Status(BridgeStatusArgs),

    /// Remove all completed and pending user queries
    Clear,
}

#[derive(clap::Args, Debug)]
pub struct BridgeRunArgs {
    /// Poll interval in seconds (default 2, or `poll_interval_secs` in config)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(clap::Args, Debug)]
pub struct BridgeStatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
