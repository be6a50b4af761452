use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Clone the default branch of a repository using a shallow clone
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
///
/// Credential prompts are disabled, and the clone is killed once `timeout`
/// has elapsed.
pub fn clone_shallow(url: &str, target_dir: &Path, timeout: Duration) -> Result<(), Error> {
    // git refuses to clone into an existing non-empty directory
    if target_dir.exists() && fs::read_dir(target_dir)?.next().is_some() {
        return Err(Error::GitClone {
            url: url.to_string(),
            message: format!("target directory {} is not empty", target_dir.display()),
            hint: None,
        });
    }

    debug!("Cloning {} into {}", url, target_dir.display());
    let child = Command::new("git")
        .args(["clone", "--quiet", "--depth=1", "--single-branch", url])
        .arg(target_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitCommand {
            command: "clone".to_string(),
            url: url.to_string(),
            stderr: e.to_string(),
        })?;

    let (success, stderr) = wait_with_deadline(child, url, timeout)?;
    if !success {
        // Provide helpful error message for common auth failures
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("could not read Username")
            || stderr.contains("Repository not found")
        {
            Some(
                "The repository may be private or renamed. Make sure the configured \
                 credentials have access to it."
                    .to_string(),
            )
        } else {
            None
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            message: stderr.trim().to_string(),
            hint,
        });
    }

    Ok(())
}

/// Wait for `child` to exit, killing it once `timeout` has elapsed.
///
/// Stderr is drained on a helper thread so a chatty child cannot block on a
/// full pipe. Returns whether the process succeeded together with its stderr.
fn wait_with_deadline(
    mut child: Child,
    url: &str,
    timeout: Duration,
) -> Result<(bool, String), Error> {
    let deadline = Instant::now() + timeout;
    let reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            // The process may have exited between the two calls.
            let _ = child.kill();
            let _ = child.wait();
            // Grandchildren may still hold the pipe open, so the reader is
            // left detached.
            return Err(Error::GitClone {
                url: url.to_string(),
                message: format!("clone did not finish within {}s", timeout.as_secs()),
                hint: Some("Increase --clone-timeout for large repositories".to_string()),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stderr = reader
        .map(|handle| handle.join().unwrap_or_default())
        .unwrap_or_default();

    Ok((status.success(), stderr))
}
