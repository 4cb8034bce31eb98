use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use bedrun_fetch::Fetcher;
use bedrun_platform::{ConnectionInfo, codespaces};
use bedrun_proc::{TunnelHandle, TunnelSpec, spawn_tunnel};

use crate::config::LauncherConfig;
use crate::ui::DownloadTracker;

const TOKEN_VAR: &str = "CLOUDFLARED_TOKEN";
const CLOUDFLARED_BINARY: &str = "cloudflared";

fn token() -> Option<String> {
    std::env::var(TOKEN_VAR).ok().filter(|t| !t.is_empty())
}

/// Pick how the server is exposed and start a tunnel if one is wanted.
///
/// Inside Codespaces native port forwarding wins unless a cloudflared
/// token is set; outside, a missing token just means a local-only server,
/// never a failed launch.
pub async fn setup(cfg: &LauncherConfig) -> anyhow::Result<(ConnectionInfo, Option<TunnelHandle>)> {
    let port = cfg.port;
    let token = token();

    if codespaces::detect() && token.is_none() {
        info!("codespaces detected, using native port forwarding");
        let address = codespaces::forwarded_address(port)
            .unwrap_or_else(|| format!("localhost:{port}"));
        return Ok((ConnectionInfo::Codespaces { address, port }, None));
    }

    let Some(token) = token else {
        warn!("{TOKEN_VAR} not set; continuing without a tunnel");
        info!("to expose the server: create a Cloudflare Zero Trust UDP tunnel and export {TOKEN_VAR}");
        return Ok((ConnectionInfo::Local { port }, None));
    };

    let binary = ensure_cloudflared(cfg).await?;
    let spec = TunnelSpec::new(binary, token);
    match spawn_tunnel(&spec).await {
        Ok(handle) => Ok((ConnectionInfo::Cloudflare { port }, Some(handle))),
        Err(err) => {
            warn!("tunnel failed to start: {err}; continuing without it");
            Ok((ConnectionInfo::Local { port }, None))
        }
    }
}

/// Download the cloudflared binary into the data directory on first use.
pub async fn ensure_cloudflared(cfg: &LauncherConfig) -> anyhow::Result<PathBuf> {
    let path = cfg.data_path().join(CLOUDFLARED_BINARY);
    if path.is_file() {
        return Ok(path);
    }

    info!("downloading cloudflared");
    let tracker = DownloadTracker::new(CLOUDFLARED_BINARY);
    let fetcher = Fetcher::new(cfg.client_setting().build()?);
    let options = cfg
        .binary_fetch_options()
        .on_progress(tracker.progress_fn());

    let fetched = fetcher.fetch(&cfg.cloudflared_url, &path, &options).await;
    match &fetched {
        Ok(_) => tracker.finish("cloudflared ready"),
        Err(_) => tracker.abandon(),
    }
    fetched.context("downloading cloudflared")?;

    bedrun_archive::ensure_executable(&path)?;
    Ok(path)
}

/// The `tunnel` subcommand / menu entry: make the binary available and
/// report what is still missing.
pub async fn prepare(cfg: &LauncherConfig) -> anyhow::Result<()> {
    if codespaces::detect() {
        info!("codespaces native port forwarding is available; no tunnel needed");
        if token().is_none() {
            return Ok(());
        }
    }

    let path = ensure_cloudflared(cfg).await?;
    info!(binary = %path.display(), "cloudflared ready");

    match token() {
        Some(_) => info!("{TOKEN_VAR} is set; the tunnel will start with the server"),
        None => warn!("{TOKEN_VAR} is not set; the tunnel will not start"),
    }
    Ok(())
}
