//! Tool execution with deadline, cancellation, and graceful termination.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long a terminated subprocess gets between the gentle signal and a
/// forced kill.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Error type for tool execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to spawn {command}: {error}")]
    Spawn { command: String, error: String },
    #[error("{command} exceeded its {seconds}s deadline")]
    Timeout { command: String, seconds: u64 },
    #[error("{command} was cancelled")]
    Cancelled { command: String },
    #[error("Failed waiting for {command}: {error}")]
    Wait { command: String, error: String },
}

/// Captured output of a finished tool run.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; -1 when the process was ended by a signal.
    pub exit_code: i32,
}

/// Run an analyzer tool to completion, bounded by a deadline and a cancel
/// signal.
///
/// Non-zero exit is not an error here: most analyzers exit non-zero
/// precisely when they find issues. Callers that care inspect
/// [`ToolOutput::exit_code`]. On deadline or cancellation the child gets
/// the gentle termination signal, the grace window to exit, then a forced
/// kill; partial output is drained before returning.
pub async fn run_tool(
    mut cmd: Command,
    name: &str,
    deadline: Duration,
    grace: Duration,
    cancel: &mut watch::Receiver<bool>,
) -> Result<ToolOutput, CommandError> {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| CommandError::Spawn {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    // Drain both pipes concurrently with waiting so a large report cannot
    // fill the pipe and wedge the child.
    let stdout = drain_pipe(child.stdout.take());
    let stderr = drain_pipe(child.stderr.take());

    let waited = tokio::select! {
        res = child.wait() => match res {
            Ok(status) => Ok(status),
            Err(e) => Err(CommandError::Wait {
                command: name.to_string(),
                error: e.to_string(),
            }),
        },
        _ = tokio::time::sleep(deadline) => Err(CommandError::Timeout {
            command: name.to_string(),
            seconds: deadline.as_secs(),
        }),
        _ = cancelled(cancel) => Err(CommandError::Cancelled {
            command: name.to_string(),
        }),
    };

    match waited {
        Ok(status) => {
            let stdout = stdout.await.unwrap_or_default();
            let stderr = stderr.await.unwrap_or_default();
            Ok(ToolOutput {
                stdout,
                stderr,
                exit_code: status.code().unwrap_or(-1),
            })
        }
        Err(err) => {
            tracing::debug!("terminating {name}: {err}");
            terminate(&mut child, grace).await;
            // Pipes are closed now; let the readers run to EOF.
            let _ = stdout.await;
            let _ = stderr.await;
            Err(err)
        }
    }
}

/// Resolve once the cancel flag flips to true. A flag that is already set
/// resolves immediately; a dropped sender means cancel can never arrive.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn drain_pipe<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut reader) = pipe {
            let _ = reader.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Gentle signal, grace window, forced kill.
async fn terminate(child: &mut Child, grace: Duration) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        if tokio::time::timeout(grace, child.wait()).await.is_ok() {
            return;
        }
    }
    #[cfg(not(unix))]
    let _ = grace;
    let _ = child.kill().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn never_cancel() -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        // Leak the sender so the channel stays open for the test duration.
        std::mem::forget(tx);
        rx
    }

    #[tokio::test]
    async fn test_run_tool_captures_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let out = run_tool(
            cmd,
            "echo",
            Duration::from_secs(5),
            DEFAULT_GRACE,
            &mut never_cancel(),
        )
        .await
        .unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_run_tool_tolerates_nonzero_exit() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo findings; exit 3"]);
        let out = run_tool(
            cmd,
            "sh",
            Duration::from_secs(5),
            DEFAULT_GRACE,
            &mut never_cancel(),
        )
        .await
        .unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout.trim(), "findings");
    }

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let cmd = Command::new("definitely-not-a-real-binary-7421");
        let err = run_tool(
            cmd,
            "ghost",
            Duration::from_secs(5),
            DEFAULT_GRACE,
            &mut never_cancel(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_run_tool_deadline() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = Instant::now();
        let err = run_tool(
            cmd,
            "sleep",
            Duration::from_millis(100),
            Duration::from_millis(200),
            &mut never_cancel(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_run_tool_cancel() {
        let (tx, mut rx) = watch::channel(false);
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(true);
        });
        let start = Instant::now();
        let err = run_tool(
            cmd,
            "sleep",
            Duration::from_secs(30),
            Duration::from_millis(200),
            &mut rx,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::Cancelled { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
