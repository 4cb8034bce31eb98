use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::info;

pub use crate::child::{StopOutcome, StopPlan};
use crate::child::{stop_child, stream_lines};
use crate::error::{Error, Result};

/// A supervised dedicated-server process.
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    streams: Vec<JoinHandle<()>>,
}

/// Launch the server binary with `dir` as its working directory.
///
/// stdin stays attached to the terminal so the operator can type server
/// console commands; stdout/stderr are piped and streamed into `tracing`.
pub fn spawn_server(binary: &Path, dir: &Path) -> Result<ServerHandle> {
    let mut child = Command::new(binary)
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Spawn {
            program: binary.to_path_buf(),
            source: e,
        })?;

    let mut streams = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        streams.push(stream_lines(stdout, "bedrock_server", false));
    }
    if let Some(stderr) = child.stderr.take() {
        streams.push(stream_lines(stderr, "bedrock_server", true));
    }

    info!(binary = %binary.display(), dir = %dir.display(), pid = child.id(), "server started");
    Ok(ServerHandle { child, streams })
}

impl ServerHandle {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the server to exit on its own, draining the log streams.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.drain_streams().await;
        Ok(status)
    }

    /// Graceful-then-forced stop.
    pub async fn stop(&mut self, plan: StopPlan) -> Result<StopOutcome> {
        let outcome = stop_child(&mut self.child, plan).await?;
        self.drain_streams().await;
        info!(?outcome, "server stopped");
        Ok(outcome)
    }

    async fn drain_streams(&mut self) {
        for handle in self.streams.drain(..) {
            let _ = handle.await;
        }
    }
}
