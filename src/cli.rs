use std::path::PathBuf;
use clap::{ArgAction, Parser};
use polymarket_installer::config::{
    InstallConfig, DEFAULT_API_URL, DEFAULT_BINARY, DEFAULT_DOWNLOAD_URL, DEFAULT_INSTALL_DIR,
    DEFAULT_REPO,
};

/// Install the latest polymarket CLI release.
///
/// Without options this downloads the newest release for this machine,
/// checks it against the published SHA-256 checksums and installs it to
/// /usr/local/bin/polymarket (using sudo if that directory is not writable).
#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Directory to install the binary into
    #[clap(long, env = "POLYMARKET_INSTALL_DIR", default_value = DEFAULT_INSTALL_DIR)]
    pub(crate) install_dir: PathBuf,

    /// Install this release tag (e.g. v1.2.3) instead of the latest one
    #[clap(long, env = "POLYMARKET_VERSION")]
    pub(crate) tag: Option<String>,

    /// Install the build for this target triple instead of the detected one
    #[clap(long)]
    pub(crate) target: Option<String>,

    /// GitHub repository to install from
    #[clap(long, default_value = DEFAULT_REPO)]
    pub(crate) repo: String,

    /// Name of the binary inside the release archive
    #[clap(long, default_value = DEFAULT_BINARY)]
    pub(crate) binary: String,

    /// Base URL of the GitHub API
    #[clap(long, default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,

    /// Base URL release assets are downloaded from
    #[clap(long, default_value = DEFAULT_DOWNLOAD_URL)]
    pub(crate) download_url: String,

    /// Create the temporary work directory inside this directory
    #[clap(long)]
    pub(crate) temp_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

impl CLI {
    pub fn to_config(&self) -> InstallConfig {
        InstallConfig {
            repo: self.repo.clone(),
            binary: self.binary.clone(),
            install_dir: self.install_dir.clone(),
            api_url: self.api_url.clone(),
            download_url: self.download_url.clone(),
            tag: self.tag.clone(),
            target: self.target.clone(),
            temp_root: self.temp_dir.clone(),
        }
    }
}
