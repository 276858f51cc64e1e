//! Archive download with retry and an insecure fallback.
//!
//! # Strategy
//!
//! Each fetch round tries two strategies in order:
//!
//! 1. **Primary** — a normal GET with certificate validation, failing on
//!    non-success status codes, streaming the body to disk behind a byte
//!    progress bar.
//! 2. **Fallback** — on *any* primary error: delete whatever is at the
//!    destination, GET with certificate validation disabled, and stream
//!    the body in fixed 1 KiB chunks.  The response status is not
//!    inspected; whatever the server returns is written as-is.  The build
//!    step that consumes the archive verifies its hash, so bad content is
//!    caught there.
//!
//! After the fallback the loop pauses, then reconsiders: a successful
//! strategy ends the loop, otherwise another round starts, up to
//! [`FetchPolicy::max_attempts`] rounds.  There is no backoff and no
//! distinction between transient and permanent failures — a 404 retries
//! exactly like a connection reset.
//!
//! The pause is plain data on [`FetchPolicy`] so tests can set it to zero
//! instead of sleeping for real.
//!
//! # Certificate validation
//!
//! Disabling validation on the fallback client is intentional: some
//! internal mirrors sit behind TLS-intercepting middleboxes whose chains
//! the build agents do not trust.  It applies to the fallback only; the
//! primary client always validates.

use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::Path,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::ui;

/// Fallback streaming chunk size.
const FALLBACK_CHUNK: usize = 1024;

/// Connection-setup timeout for both clients.  The transfer itself is
/// unbounded; dependency archives can be large and links slow.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Policy ───────────────────────────────────────────────────────────────────

/// Retry knobs, injectable for tests.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Maximum failed rounds before giving up on a URL.
    pub max_attempts: u32,
    /// Pause after each failed primary + fallback round.
    pub pause: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            pause: Duration::from_secs(10),
        }
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// What a fetch produced.
///
/// Exhaustion is an expected outcome, not an `Err`: one unreachable
/// dependency must not abort the whole run.  The caller records the
/// intended path and continues.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The archive was materialized at the destination path.
    Downloaded,
    /// Every round failed; nothing is left at the destination.
    Exhausted { attempts: u32 },
}

impl FetchOutcome {
    pub const fn failed(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

// ─── Fetcher ──────────────────────────────────────────────────────────────────

/// Holds the two prebuilt HTTP clients plus the retry policy.
pub struct Fetcher {
    primary: Client,
    fallback: Client,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(policy: FetchPolicy) -> Result<Self> {
        let primary = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()
            .context("building HTTP client")?;
        let fallback = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .danger_accept_invalid_certs(true)
            .build()
            .context("building fallback HTTP client")?;
        Ok(Self {
            primary,
            fallback,
            policy,
        })
    }

    /// Fetch `url` into `dest`, retrying per the policy.
    pub fn fetch(&self, url: &str, dest: &Path) -> FetchOutcome {
        let mut attempts = 0;
        while attempts < self.policy.max_attempts {
            match self.primary_fetch(url, dest) {
                Ok(()) => return FetchOutcome::Downloaded,
                Err(e) => {
                    ui::warn(&format!("retrying {url}: {e:#}"));
                    let fallback = self.fallback_fetch(url, dest);
                    attempts += 1;
                    thread::sleep(self.policy.pause);
                    if fallback.is_ok() {
                        return FetchOutcome::Downloaded;
                    }
                },
            }
        }

        // A half-written file must not look like a cache hit to a later run.
        if dest.exists() {
            let _ = fs::remove_file(dest);
        }
        FetchOutcome::Exhausted { attempts }
    }

    /// Validated, progress-reporting streaming GET.
    fn primary_fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let resp = self.primary.get(url).send()?.error_for_status()?;

        let bar = ui::download_bar(resp.content_length());
        let mut reader = bar.wrap_read(resp);
        let mut file =
            File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        io::copy(&mut reader, &mut file)
            .with_context(|| format!("writing {}", dest.display()))?;
        bar.finish_and_clear();
        Ok(())
    }

    /// Unvalidated chunked GET; overwrites `dest` unconditionally.
    fn fallback_fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if dest.exists() {
            fs::remove_file(dest).with_context(|| format!("removing {}", dest.display()))?;
        }

        let mut resp = self.fallback.get(url).send()?;
        let mut file =
            File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        let mut chunk = [0u8; FALLBACK_CHUNK];
        loop {
            let n = resp.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            file.write_all(&chunk[..n])
                .with_context(|| format!("writing {}", dest.display()))?;
        }
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        io::{Read as _, Write as _},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Serve `requests` canned HTTP responses on a loopback port, one
    /// connection each, then stop.  Returns the bound port.
    fn stub_server(status_line: &'static str, body: &'static [u8], requests: usize) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        thread::spawn(move || {
            for _ in 0..requests {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(body);
            }
        });
        port
    }

    fn quick_fetcher(max_attempts: u32) -> Fetcher {
        Fetcher::new(FetchPolicy {
            max_attempts,
            pause: Duration::ZERO,
        })
        .unwrap()
    }

    #[test]
    fn primary_success_writes_destination() {
        let port = stub_server("HTTP/1.1 200 OK", b"archive-bytes", 1);
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("a.zip");

        let outcome = quick_fetcher(2).fetch(&format!("http://127.0.0.1:{port}/a.zip"), &dest);

        assert!(!outcome.failed());
        assert_eq!(fs::read(&dest).unwrap(), b"archive-bytes");
    }

    #[test]
    fn error_status_falls_back_and_writes_body() {
        // The primary rejects the 404; the fallback writes whatever the
        // server sent.  Two requests hit the stub.
        let port = stub_server("HTTP/1.1 404 Not Found", b"not-here", 2);
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("a.zip");

        let outcome = quick_fetcher(3).fetch(&format!("http://127.0.0.1:{port}/a.zip"), &dest);

        assert!(!outcome.failed());
        assert_eq!(fs::read(&dest).unwrap(), b"not-here");
    }

    #[test]
    fn unreachable_server_exhausts_attempts() {
        // Bind then immediately drop the listener so the port refuses
        // connections for both strategies.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("a.zip");

        let outcome = quick_fetcher(2).fetch(&format!("http://127.0.0.1:{port}/a.zip"), &dest);

        match outcome {
            FetchOutcome::Exhausted { attempts } => assert_eq!(attempts, 2),
            FetchOutcome::Downloaded => panic!("fetch against a dead port cannot succeed"),
        }
        assert!(!dest.exists(), "no file should remain after exhaustion");
    }

    #[test]
    fn default_policy_matches_the_build_contract() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.pause, Duration::from_secs(10));
    }
}
