use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name="bedrun",version=env!("CARGO_PKG_VERSION"),about,long_about=None,propagate_version=true)]
pub struct App {
    /// Path to the launcher config (defaults to ./launcher.toml when present).
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "r", about = "Install if needed, then run the server")]
    Run,
    #[command(alias = "m", about = "Interactive menu")]
    Menu,
    #[command(alias = "i", about = "Install the server without starting it")]
    Install(InstallArg),
    #[command(alias = "b", about = "Back up the world directory")]
    Backup,
    #[command(alias = "t", about = "Prepare the cloudflared tunnel")]
    Tunnel,
    #[command(alias = "p", about = "Write server.properties from the config")]
    Properties,
}

#[derive(Clone, Debug, Args)]
pub struct InstallArg {
    /// Remove the current installation first.
    #[arg(long)]
    pub force: bool,
}
