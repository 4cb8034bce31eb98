//! Shared plumbing for supervised children.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::{Error, Result};

/// Graceful-then-forced termination parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StopPlan {
    pub grace: Duration,
}

impl StopPlan {
    /// The dedicated server flushes its world on SIGTERM, so it gets a
    /// generous grace period.
    pub fn server() -> Self {
        Self {
            grace: Duration::from_secs(15),
        }
    }

    pub fn tunnel() -> Self {
        Self {
            grace: Duration::from_secs(5),
        }
    }
}

/// How a stop resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopOutcome {
    /// Child was already gone when stop was requested.
    AlreadyExited(ExitStatus),
    /// Exited within the grace period after SIGTERM.
    Graceful(ExitStatus),
    /// Had to be SIGKILLed after the grace period ran out.
    Forced(ExitStatus),
}

impl StopOutcome {
    pub fn status(&self) -> ExitStatus {
        match self {
            Self::AlreadyExited(s) | Self::Graceful(s) | Self::Forced(s) => *s,
        }
    }
}

/// Forward each line of a child stream into `tracing`, tagged with the
/// child's name.
pub(crate) fn stream_lines<R>(reader: R, source: &'static str, stderr: bool) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if stderr {
                        tracing::warn!(target: "child", source, "{line}");
                    } else {
                        tracing::info!(target: "child", source, "{line}");
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(source, "log stream ended: {e}");
                    break;
                }
            }
        }
    })
}

/// SIGTERM, wait up to `plan.grace`, then SIGKILL.
///
/// Idempotent: a child that already exited is reported, not signalled.
pub(crate) async fn stop_child(child: &mut Child, plan: StopPlan) -> Result<StopOutcome> {
    if let Some(status) = child.try_wait()? {
        return Ok(StopOutcome::AlreadyExited(status));
    }

    terminate(child)?;

    match tokio::time::timeout(plan.grace, child.wait()).await {
        Ok(status) => Ok(StopOutcome::Graceful(status?)),
        Err(_) => {
            warn!(grace = ?plan.grace, "grace period expired, killing child");
            child.start_kill().map_err(Error::Signal)?;
            Ok(StopOutcome::Forced(child.wait().await?))
        }
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
            .map_err(|e| Error::Signal(std::io::Error::from_raw_os_error(e as i32))),
        // No pid means the child has been reaped already.
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> Result<()> {
    // No SIGTERM equivalent; go straight to kill.
    child.start_kill().map_err(Error::Signal)
}
