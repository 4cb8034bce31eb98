use anyhow::Context;
use console::style;
use tracing::{info, warn};

use bedrun_platform::{ConnectionInfo, codespaces};
use bedrun_proc::{StopPlan, shutdown_signal, spawn_server};

use crate::config::LauncherConfig;
use crate::ops;

/// The full launch sequence: install if missing, configure, expose,
/// supervise, tear down, back up.
pub async fn run(cfg: &LauncherConfig) -> anyhow::Result<()> {
    ops::install::ensure_server(cfg, false).await?;
    ops::install::write_properties(cfg)?;

    let (connection, mut tunnel) = ops::tunnel::setup(cfg).await?;
    print_summary(cfg, &connection);

    let binary = cfg.server_binary_path();
    let mut server =
        spawn_server(&binary, &cfg.data_path()).context("starting the server process")?;

    tokio::select! {
        status = server.wait() => {
            match status {
                Ok(status) => info!("server exited with {status}"),
                Err(err) => warn!("server wait failed: {err}"),
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received, stopping services");
            if let Err(err) = server.stop(StopPlan::server()).await {
                warn!("server stop failed: {err}");
            }
        }
    }

    if let Some(tunnel) = tunnel.as_mut()
        && let Err(err) = tunnel.stop(StopPlan::tunnel()).await
    {
        warn!("tunnel stop failed: {err}");
    }

    ops::backup::backup_world(cfg)?;
    Ok(())
}

fn print_summary(cfg: &LauncherConfig, connection: &ConnectionInfo) {
    println!();
    println!("{}", style("connection info").bold().cyan());
    println!("  type:    {}", connection.kind());
    println!("  address: {connection}");
    println!("  port:    {} (udp)", connection.port());
    println!("  note:    {}", connection.note());

    if codespaces::detect() {
        println!();
        println!("{}", style("codespaces").bold().cyan());
        println!("  1. open the PORTS tab in VS Code");
        println!("  2. find port {}", cfg.port);
        println!("  3. right click -> Port Visibility -> Public");
        println!("  4. share the listed URL with your players");
    }

    println!();
    println!(
        "{}",
        style("press ctrl-c to stop the server; the world is backed up on exit").dim()
    );
    println!();
}
