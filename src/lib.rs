//! # Polymarket Installer Library
//!
//! This crate contains the logic behind `polymarket-install`: it finds the
//! latest tagged release of the `polymarket` CLI on GitHub, downloads the
//! archive built for the current platform, verifies it against the release's
//! `checksums.txt` and installs the binary into `/usr/local/bin`.
//!
//! Every step is fatal on failure. Nothing is retried, and the temporary
//! work directory is removed whichever way the run ends.
//!
//! ## Modules Overview
//! - [`platform`] – Mapping the host OS and architecture to a target triple
//! - [`release`] – Resolving the release tag and deriving asset names and URLs
//! - [`download`] – HTTP access behind the [`ReleaseClient`] trait
//! - [`checksum`] – Checksum manifest lookup and SHA-256 verification
//! - [`extract`] – Safe `.tar.gz` extraction
//! - [`installer`] – Placing the binary, elevating with `sudo` when needed
//! - [`pipeline`] – The ordered install run tying everything together
//! - [`config`] – Install parameters and their defaults
//! - [`error`] – The [`InstallError`] taxonomy
//! - [`signal`] – SIGINT/SIGTERM handling


pub mod platform;
pub mod release;
pub mod download;
pub mod checksum;
pub mod extract;
pub mod installer;
pub mod pipeline;
pub mod config;
pub mod error;
pub mod signal;

pub use platform::*;
pub use release::*;
pub use download::*;
pub use checksum::*;
pub use extract::*;
pub use installer::*;
pub use pipeline::*;
pub use config::*;
pub use error::*;
