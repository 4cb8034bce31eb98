use clap::Parser;

mod cli;
mod config;
mod menu;
mod ops;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    cli::dispatch(cli::App::parse())
}
