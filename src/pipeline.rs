//! The installation pipeline.
//!
//! Detect → Resolve → Download → Verify → Install, strictly in that order.
//! Each stage runs only if the previous one succeeded; the first error ends
//! the run. The work directory lives for the duration of [`run`] and is
//! removed on every return path.

use std::fmt;
use std::path::PathBuf;
use tempfile::{Builder, TempDir};
use crate::checksum::verify_archive;
use crate::config::InstallConfig;
use crate::download::ReleaseClient;
use crate::error::InstallError;
use crate::extract::{extract_archive, locate_binary};
use crate::installer::install_binary;
use crate::platform::{validate_target, Host};
use crate::release::{resolve_tag, Release, CHECKSUMS_FILE};
use crate::signal::is_interrupted;

const WORK_DIR_PREFIX: &str = "polymarket-install.";

/// Stages of an installation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detect,
    Resolve,
    Download,
    Verify,
    Install,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Detect => "detect",
            Stage::Resolve => "resolve",
            Stage::Download => "download",
            Stage::Verify => "verify",
            Stage::Install => "install",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    pub tag: String,
    pub target: String,
    pub path: PathBuf,
    pub sha256: String,
}

/// Runs a complete installation for `host` using `client` for all network
/// access.
///
/// # Errors
///
/// The first failing stage's [`InstallError`].
pub fn run<C: ReleaseClient>(
    config: &InstallConfig,
    host: &Host,
    client: &C,
) -> Result<Installed, InstallError> {
    enter(Stage::Detect)?;
    let target = match &config.target {
        Some(target) => validate_target(target)?,
        None => host.target_triple()?,
    };
    log::info!("host {}/{} -> target {target}", host.os, host.arch);

    enter(Stage::Resolve)?;
    let tag = resolve_tag(config, client)?;
    let release = Release {
        repo: config.repo.clone(),
        binary: config.binary.clone(),
        tag,
        target: target.to_string(),
    };
    println!("Installing {} {} ({})", release.binary, release.tag, release.target);

    let work_dir = create_work_dir(config)?;
    log::debug!("work directory {}", work_dir.path().display());

    enter(Stage::Download)?;
    let tarball_name = release.tarball_name();
    let tarball = work_dir.path().join(&tarball_name);
    let manifest_path = work_dir.path().join(CHECKSUMS_FILE);
    println!("Downloading {tarball_name}...");
    client.download_to_file(&release.tarball_url(&config.download_url), &tarball)?;
    client.download_to_file(&release.checksums_url(&config.download_url), &manifest_path)?;

    enter(Stage::Verify)?;
    println!("Verifying checksum...");
    let manifest = std::fs::read_to_string(&manifest_path)?;
    let sha256 = verify_archive(&tarball, &manifest, &tarball_name)?;

    enter(Stage::Install)?;
    let unpack_dir = work_dir.path().join("unpacked");
    std::fs::create_dir_all(&unpack_dir)?;
    extract_archive(&tarball, &unpack_dir)?;
    let binary = locate_binary(&unpack_dir, &config.binary).ok_or_else(|| InstallError::BinaryNotFound {
        name: config.binary.clone(),
    })?;
    let path = install_binary(&binary, &config.install_dir, &config.binary)?;

    work_dir.close()?;
    Ok(Installed {
        tag: release.tag,
        target: release.target,
        path,
        sha256,
    })
}

fn enter(stage: Stage) -> Result<(), InstallError> {
    if is_interrupted() {
        return Err(InstallError::Interrupted);
    }
    log::debug!("stage: {stage}");
    Ok(())
}

fn create_work_dir(config: &InstallConfig) -> Result<TempDir, InstallError> {
    let mut builder = Builder::new();
    builder.prefix(WORK_DIR_PREFIX);
    let dir = match &config.temp_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };
    Ok(dir)
}
