use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::base::{CollectorResult, CommandRunner};
use crate::config::CollectorConfig;

/// Runs `<shell> <script>` as a child process with stdin closed and both
/// output streams captured.
pub struct ShellRunner {
    shell: String,
    script: String,
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(config: &CollectorConfig) -> Self {
        ShellRunner {
            shell: config.shell.clone(),
            script: config.script.clone(),
            timeout: config.timeout(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.shell);
        command
            .arg(&self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Covers every path where the child handle is dropped early,
            // including the request future being cancelled.
            .kill_on_drop(true);
        // Own process group, so anything the script starts can be killed with it.
        #[cfg(unix)]
        command.process_group(0);
        command
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => warn!("Failed to kill collector process group {}: {}", pgid, e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

/// Kills the collector's process group when dropped, unless the run finished.
struct GroupGuard {
    pgid: Option<u32>,
}

impl GroupGuard {
    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_process_group(pgid);
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Waits for exit and drains both pipes concurrently so a chatty collector
/// cannot stall on a full pipe buffer.
async fn wait_for_output(child: &mut Child) -> io::Result<CollectorResult> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (status, stdout, stderr) = tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))?;
    Ok(CollectorResult {
        exit_code: status.code(),
        stdout,
        stderr,
        timed_out: false,
    })
}

#[async_trait]
impl CommandRunner for ShellRunner {
    fn describe(&self) -> String {
        format!("{} {}", self.shell, self.script)
    }

    async fn run(&self) -> io::Result<CollectorResult> {
        let started = Instant::now();
        let mut child = self.command().spawn()?;
        // Declared after `child`, so on an early drop the group goes first.
        let mut group = GroupGuard { pgid: child.id() };

        match timeout(self.timeout, wait_for_output(&mut child)).await {
            Ok(result) => {
                let result = result?;
                group.disarm();
                debug!(
                    exit_code = ?result.exit_code,
                    stdout_bytes = result.stdout.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Collector finished"
                );
                Ok(result)
            }
            Err(_) => {
                warn!(
                    command = %self.describe(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Collector exceeded its time limit, killing it"
                );
                drop(group);
                // kill() also reaps the child.
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill collector process: {}", e);
                }
                Ok(CollectorResult::timed_out())
            }
        }
    }
}
