use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};
use nix::sys::signal::Signal;
use nix::unistd::{access, AccessFlags};
use tempfile::NamedTempFile;
use crate::error::InstallError;
use crate::signal::is_interrupted;

/// Mode of the installed binary.
const EXEC_MODE: u32 = 0o755;
/// Privilege elevation program used when the install directory is not writable.
const SUDO: &str = "sudo";

/// Whether the current user may create files in `dir`.
pub fn is_writable(dir: &Path) -> bool {
    access(dir, AccessFlags::W_OK).is_ok()
}

/// Places the extracted binary at `<install_dir>/<name>` with mode `0755`.
///
/// When `install_dir` is writable (or can be created) the binary is staged
/// next to its destination and renamed over it, so an existing binary is
/// replaced atomically. Otherwise the move is delegated to `sudo`, which may
/// prompt for a password.
///
/// Returns the installed path.
pub fn install_binary(staged: &Path, install_dir: &Path, name: &str) -> Result<PathBuf, InstallError> {
    let dest = install_dir.join(name);
    if !install_dir.exists() {
        // Try unprivileged first; fall through to sudo on failure.
        if let Err(e) = fs::create_dir_all(install_dir) {
            log::debug!("could not create {}: {e}", install_dir.display());
        }
    }

    if install_dir.is_dir() && is_writable(install_dir) {
        place_binary(staged, install_dir, &dest).map_err(|e| InstallError::Install {
            path: dest.clone(),
            reason: e.to_string(),
        })?;
    } else {
        log::warn!("{} is not writable, elevating with {SUDO}", install_dir.display());
        println!("Installing to {} requires elevated privileges", install_dir.display());
        for args in elevated_install_commands(staged, install_dir, &dest) {
            run_elevated(&args, &dest)?;
        }
    }
    Ok(dest)
}

fn place_binary(staged: &Path, install_dir: &Path, dest: &Path) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(install_dir)?;
    io::copy(&mut File::open(staged)?, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    set_executable(tmp.path())?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(EXEC_MODE))
}

/// The `sudo` argument lists that move `staged` to `dest` and mark it
/// executable.
pub fn elevated_install_commands(staged: &Path, install_dir: &Path, dest: &Path) -> Vec<Vec<OsString>> {
    let mut commands = Vec::new();
    if !install_dir.is_dir() {
        commands.push(vec!["mkdir".into(), "-p".into(), install_dir.as_os_str().to_owned()]);
    }
    commands.push(vec![
        "mv".into(),
        "-f".into(),
        staged.as_os_str().to_owned(),
        dest.as_os_str().to_owned(),
    ]);
    commands.push(vec![
        "chmod".into(),
        format!("{EXEC_MODE:o}").into(),
        dest.as_os_str().to_owned(),
    ]);
    commands
}

fn run_elevated(args: &[OsString], dest: &Path) -> Result<(), InstallError> {
    log::debug!("running {SUDO} {args:?}");
    let status = Command::new(SUDO)
        .args(args)
        .status()
        .map_err(|e| InstallError::Install {
            path: dest.to_path_buf(),
            reason: format!("failed to run {SUDO}: {e}"),
        })?;
    if !status.success() {
        return Err(elevation_failure(status, args, dest, is_interrupted()));
    }
    Ok(())
}

/// A failed `sudo` run caused by Ctrl-C (at the password prompt or during
/// the command) is an interruption, not an install failure.
fn elevation_failure(status: ExitStatus, args: &[OsString], dest: &Path, interrupted: bool) -> InstallError {
    let killed_by_signal = matches!(
        status.signal().and_then(|sig| Signal::try_from(sig).ok()),
        Some(Signal::SIGINT | Signal::SIGTERM)
    );
    if interrupted || killed_by_signal {
        return InstallError::Interrupted;
    }
    InstallError::Install {
        path: dest.to_path_buf(),
        reason: format!("`{SUDO} {}` exited with {status}", display_args(args)),
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
