use crate::models::ConnectionMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mosh launcher - connect a local terminal to a mosh protocol engine
#[derive(Parser, Debug)]
#[command(name = "mosh-launcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server address
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Server port (defaults to 22 for ssh mode, 60001 for manual mode)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Username (ssh mode)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Session key printed by mosh-server (manual mode)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Connection mode: ssh or manual
    #[arg(short, long)]
    pub mode: Option<ConnectionMode>,

    /// Private key handed to the engine for this session only
    #[arg(long)]
    pub ssh_key_file: Option<PathBuf>,

    /// Engine executable, overrides the configured one
    #[arg(long)]
    pub engine: Option<String>,

    /// Configuration directory
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(long)]
    pub log_level: Option<String>,

    /// Connect with the given arguments without asking
    #[arg(long)]
    pub no_prompt: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Fill in the connection form and start a session (default)
    Connect,

    /// Store a private key for the engine to request during sessions
    StoreKey {
        /// OpenSSH private key file
        path: PathBuf,
    },

    /// Remove the stored private key
    ForgetKey,

    /// Print the effective settings
    ShowSettings,

    /// Write the effective settings, including command line overrides, to the config file
    SaveSettings,
}
