//! Bounded shellouts to local summarizer programs.
//!
//! Goals:
//! - **Bounded**: timeouts + output caps to avoid hangs/huge output.
//! - **Pipe-safe**: stdin is fed and stdout drained concurrently, so large texts can't deadlock.
//! - **No secrets**: no env dumps; caller decides what to surface as errors.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env(key)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

pub fn timeout_from_env_ms(key: &str, default_ms: u64) -> Duration {
    let ms = env(key)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default_ms)
        .clamp(50, 300_000);
    Duration::from_millis(ms)
}

pub fn max_bytes_from_env(key: &str, default_bytes: usize) -> usize {
    env_usize(key, default_bytes).clamp(200, 16_000_000)
}

/// Run a command with `input` on stdin and capture stdout (bounded) with a coarse timeout.
///
/// Output past `max_stdout_bytes` is read and discarded so the child never blocks on a full pipe.
pub fn run_with_stdin_bounded(
    mut cmd: Command,
    input: &[u8],
    timeout: Duration,
    max_stdout_bytes: usize,
) -> Result<Vec<u8>, &'static str> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            "shellout_tool_not_found"
        } else {
            "shellout_spawn_failed"
        }
    })?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_vec();
        // A child that exits without reading stdin makes this fail with a broken pipe; that is
        // reported through the exit status instead.
        std::thread::spawn(move || {
            let _ = stdin.write_all(&input);
        })
    });
    let reader = child.stdout.take().map(|mut stdout| {
        std::thread::spawn(move || {
            let mut out = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        let room = max_stdout_bytes.saturating_sub(out.len());
                        out.extend_from_slice(&buf[..n.min(room)]);
                    }
                }
            }
            out
        })
    });

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().map_err(|_| "shellout_wait_failed")? {
            break status;
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err("shellout_timeout");
        }
        std::thread::sleep(Duration::from_millis(25));
    };

    if let Some(w) = writer {
        let _ = w.join();
    }
    let out = match reader {
        Some(r) => r.join().map_err(|_| "shellout_read_failed")?,
        None => Vec::new(),
    };
    if !status.success() {
        return Err("shellout_nonzero_exit");
    }
    Ok(out)
}
