use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rcrt",
    about = "rcrt: a small personal timeline served from a directory",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new store and fill it with example entries
    Init(InitArgs),
    /// Serve a store over HTTP
    Serve(ServeArgs),
    /// List every entry id with its type
    List(StoreArgs),
    /// Check content files and article references
    Check(StoreArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub db_path: PathBuf,
}

#[derive(Args)]
pub struct StoreArgs {
    pub db_path: PathBuf,
}

#[derive(Args)]
pub struct ServeArgs {
    pub db_path: PathBuf,
    /// TOML file with server settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub app_dir: Option<PathBuf>,
    /// Mount point, e.g. /rcrt
    #[arg(long)]
    pub prefix: Option<String>,
    /// Serve the client in read-only mode and refuse edits
    #[arg(long)]
    pub readonly: bool,
    /// Create and seed the store if it does not exist
    #[arg(long)]
    pub init: bool,
}
