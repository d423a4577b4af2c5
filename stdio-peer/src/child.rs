use std::time::Duration;

use tokio::process::Child;
use tokio::process::ChildStdin;
use tokio::process::ChildStdout;
use tokio::process::Command;

/// How long `terminate` waits for a graceful exit after SIGTERM before
/// escalating to SIGKILL (or, on non-POSIX hosts, the only kill we have).
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Owns the spawned child and its piped stdio. Exactly one reader task ever
/// reads `stdout`; `stdin` is written only by the peer's writer task.
pub struct ChildProcess {
    child: Child,
}

impl ChildProcess {
    /// `args[0]` is the executable, the rest are its arguments, matching the
    /// reference client's convention.
    pub fn spawn(args: &[String]) -> std::io::Result<(Self, ChildStdin, ChildStdout)> {
        let Some(program) = args.first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "expected at least one element in `args` - the program to spawn",
            ));
        };

        let mut command = Command::new(program);
        if args.len() > 1 {
            command.args(&args[1..]);
        }
        command.stdin(std::process::Stdio::piped());
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::null());
        command.kill_on_drop(true);

        let mut child = command.spawn()?;
        let stdin = child.stdin.take().ok_or_else(|| {
            std::io::Error::other("failed to capture child stdin")
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::other("failed to capture child stdout")
        })?;

        Ok((ChildProcess { child }, stdin, stdout))
    }

    /// SIGTERM, wait up to `GRACEFUL_SHUTDOWN_TIMEOUT`, then SIGKILL if the
    /// child is still alive. Platforms without a SIGTERM/SIGKILL distinction
    /// (i.e. anything not `cfg(unix)`) go straight to tree-termination.
    pub async fn terminate(&mut self) {
        #[cfg(unix)]
        {
            if let Some(pid) = self.child.id() {
                // SAFETY: `pid` is a process id we obtained from the child
                // handle we own; sending SIGTERM to it cannot affect memory
                // safety.
                unsafe {
                    libc::kill(pid as libc::pid_t, libc::SIGTERM);
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = self.child.start_kill();
        }

        let graceful = tokio::time::timeout(GRACEFUL_SHUTDOWN_TIMEOUT, self.child.wait()).await;
        if graceful.is_err() {
            let _ = self.child.start_kill();
            let _ = self.child.wait().await;
        }
    }
}

impl Drop for ChildProcess {
    fn drop(&mut self) {
        let _ = self.child.try_wait();
    }
}
