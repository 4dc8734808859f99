//! HTTP access to release metadata and assets.
//!
//! The [`ReleaseClient`] trait is the only place the installer touches the
//! network, so tests can serve fixtures from memory instead.
//!
//! [`HttpClient`] performs each request on a worker thread that streams the
//! body back over a bounded channel. The calling thread only ever blocks on
//! that channel for a short poll interval, so a termination signal or a
//! stalled peer ends the request promptly even while the worker is stuck in
//! a socket read. Only the calling thread touches the destination file.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use crate::signal::is_interrupted;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
/// Longest time without any progress before a request is abandoned.
pub const STALL_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_REDIRECTS: usize = 10;
const CHUNK_SIZE: usize = 64 * 1024;
const CHANNEL_DEPTH: usize = 8;

/// Fetches release metadata and assets.
pub trait ReleaseClient {
    /// GETs `url` and returns the body as text.
    ///
    /// # Errors
    /// Any transport failure or non-success status.
    fn fetch_text(&self, url: &str) -> Result<String, DownloadError>;

    /// GETs `url` and streams the body into `dest`, returning the byte count.
    ///
    /// # Errors
    /// Any transport failure, non-success status or write failure.
    fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}

/// Errors arising from HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered 404.
    #[error("not found: {url}")]
    NotFound {
        url: String,
    },

    /// Transport failure, redirect failure or any other non-success status.
    #[error("download failed for {url}: {reason}")]
    Http {
        url: String,
        reason: String,
    },

    #[error("I/O error writing download: {0}")]
    Io(#[from] io::Error),

    #[error("download interrupted")]
    Interrupted,
}

/// [`ReleaseClient`] backed by a blocking `reqwest` client.
pub struct HttpClient {
    client: Client,
    stall_timeout: Duration,
}

/// What the worker thread reports back for one request.
#[derive(Debug)]
pub(crate) enum Event {
    Chunk(Vec<u8>),
    Done,
    Failed(DownloadError),
}

impl HttpClient {
    pub fn new() -> Result<Self, DownloadError> {
        // No total timeout: large archives on slow links are fine as long as
        // bytes keep arriving within `stall_timeout`.
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| DownloadError::Http {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            stall_timeout: STALL_TIMEOUT,
        })
    }

    /// Replaces the default [`STALL_TIMEOUT`].
    pub fn with_stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }

    /// GETs `url` and feeds the body to `sink` chunk by chunk.
    fn stream<F>(&self, url: &str, mut sink: F) -> Result<u64, DownloadError>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        log::debug!("GET {url}");
        let (tx, rx) = bounded(CHANNEL_DEPTH);
        let client = self.client.clone();
        let worker_url = url.to_string();
        thread::Builder::new()
            .name("http-worker".to_string())
            .spawn(move || stream_body(&client, &worker_url, &tx))?;

        let mut total = 0u64;
        loop {
            match wait_for_event(&rx, url, self.stall_timeout)? {
                Event::Chunk(bytes) => {
                    sink(&bytes)?;
                    total += bytes.len() as u64;
                }
                Event::Done => return Ok(total),
                Event::Failed(e) => return Err(e),
            }
        }
    }
}

impl ReleaseClient for HttpClient {
    fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let mut body = Vec::new();
        self.stream(url, |bytes| {
            body.extend_from_slice(bytes);
            Ok(())
        })?;
        String::from_utf8(body).map_err(|e| DownloadError::Http {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }

    fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let mut file = File::create(dest)?;
        let written = self.stream(url, |bytes| file.write_all(bytes))?;
        file.flush()?;
        log::debug!("wrote {written} bytes to {}", dest.display());
        Ok(written)
    }
}

/// Worker side: performs the request and forwards the body. Stops quietly
/// once the receiving side has gone away.
fn stream_body(client: &Client, url: &str, tx: &Sender<Event>) {
    let mut response = match client.get(url).send().and_then(|resp| resp.error_for_status()) {
        Ok(response) => response,
        Err(e) => {
            let _ = tx.send(Event::Failed(map_reqwest_error(url, &e)));
            return;
        }
    };
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        match response.read(&mut buf) {
            Ok(0) => {
                let _ = tx.send(Event::Done);
                return;
            }
            Ok(n) => {
                if tx.send(Event::Chunk(buf[..n].to_vec())).is_err() {
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(Event::Failed(DownloadError::Http {
                    url: url.to_owned(),
                    reason: e.to_string(),
                }));
                return;
            }
        }
    }
}

/// Caller side: waits for the next event, giving up on a termination signal
/// or when nothing has arrived for `stall_timeout`.
pub(crate) fn wait_for_event(
    rx: &Receiver<Event>,
    url: &str,
    stall_timeout: Duration,
) -> Result<Event, DownloadError> {
    let started = Instant::now();
    loop {
        if is_interrupted() {
            return Err(DownloadError::Interrupted);
        }
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => return Ok(event),
            Err(RecvTimeoutError::Timeout) => {
                if started.elapsed() >= stall_timeout {
                    return Err(DownloadError::Http {
                        url: url.to_owned(),
                        reason: format!("stalled: no data for {}s", stall_timeout.as_secs_f32()),
                    });
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(DownloadError::Http {
                    url: url.to_owned(),
                    reason: "connection closed unexpectedly".to_string(),
                });
            }
        }
    }
}

fn map_reqwest_error(url: &str, err: &reqwest::Error) -> DownloadError {
    match err.status() {
        Some(StatusCode::NOT_FOUND) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        _ => DownloadError::Http {
            url: url.to_owned(),
            reason: err.to_string(),
        },
    }
}
