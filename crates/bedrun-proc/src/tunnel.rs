use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::info;

use crate::child::{StopOutcome, StopPlan, stop_child, stream_lines};
use crate::error::{Error, Result};

/// How long cloudflared gets to establish the tunnel before the liveness
/// check.
const STARTUP_GRACE: Duration = Duration::from_secs(8);

/// What to launch for the tunnel.
#[derive(Clone, Debug)]
pub struct TunnelSpec {
    pub binary: PathBuf,
    pub token: String,
    /// The Bedrock port is UDP, so the tunnel must carry UDP.
    pub udp: bool,
    pub startup_grace: Duration,
}

impl TunnelSpec {
    pub fn new(binary: PathBuf, token: String) -> Self {
        Self {
            binary,
            token,
            udp: true,
            startup_grace: STARTUP_GRACE,
        }
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["tunnel".to_string()];
        if self.udp {
            args.push("--protocol".to_string());
            args.push("udp".to_string());
        }
        args.push("run".to_string());
        args.push("--token".to_string());
        args.push(self.token.clone());
        args
    }
}

/// A running cloudflared child.
#[derive(Debug)]
pub struct TunnelHandle {
    child: Child,
    streams: Vec<JoinHandle<()>>,
}

/// Spawn cloudflared and confirm it survives its startup grace period.
///
/// A tunnel that dies immediately (bad token, unreachable edge) is
/// reported as `StartupFailed` instead of lingering as a zombie handle.
pub async fn spawn_tunnel(spec: &TunnelSpec) -> Result<TunnelHandle> {
    let mut child = Command::new(&spec.binary)
        .args(spec.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Spawn {
            program: spec.binary.clone(),
            source: e,
        })?;

    let mut streams = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        streams.push(stream_lines(stdout, "cloudflared", false));
    }
    if let Some(stderr) = child.stderr.take() {
        // cloudflared logs to stderr by default; that's not an error.
        streams.push(stream_lines(stderr, "cloudflared", false));
    }

    tokio::time::sleep(spec.startup_grace).await;
    if let Some(status) = child.try_wait()? {
        for handle in streams {
            let _ = handle.await;
        }
        return Err(Error::StartupFailed {
            program: spec.binary.clone(),
            status,
        });
    }

    info!(binary = %spec.binary.display(), pid = child.id(), "tunnel established");
    Ok(TunnelHandle { child, streams })
}

impl TunnelHandle {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn stop(&mut self, plan: StopPlan) -> Result<StopOutcome> {
        let outcome = stop_child(&mut self.child, plan).await?;
        for handle in self.streams.drain(..) {
            let _ = handle.await;
        }
        info!(?outcome, "tunnel stopped");
        Ok(outcome)
    }
}
