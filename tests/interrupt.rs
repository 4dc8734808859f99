// Raises a real SIGINT in the test process, so it lives in its own test
// binary and holds a single test.

use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};
use nix::sys::signal::{raise, Signal};
use polymarket_installer::signal::install_signal_handlers;
use polymarket_installer::*;
use tempfile::TempDir;

/// Accepts connections and never answers.
fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

#[test]
fn test_sigint_during_stalled_download_cleans_up() {
    // Talk to the local server directly.
    for var in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        // SAFETY: this binary runs a single test, nothing else reads the environment concurrently.
        unsafe { std::env::remove_var(var) };
    }
    install_signal_handlers().unwrap();

    let install_dir = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    let config = InstallConfig {
        install_dir: install_dir.path().to_path_buf(),
        temp_root: Some(temp_root.path().to_path_buf()),
        tag: Some("v1.2.3".to_string()),
        target: Some("x86_64-unknown-linux-gnu".to_string()),
        download_url: silent_server(),
        ..InstallConfig::default()
    };
    let client = HttpClient::new().unwrap();

    thread::spawn(|| {
        thread::sleep(Duration::from_millis(500));
        raise(Signal::SIGINT).unwrap();
    });
    let started = Instant::now();
    let err = run(&config, &Host::new("Linux", "x86_64"), &client).unwrap_err();

    assert_eq!(err.exit_code(), 130, "unexpected error: {err:?}");
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(std::fs::read_dir(temp_root.path()).unwrap().count(), 0);
    assert!(!install_dir.path().join("polymarket").exists());
}
