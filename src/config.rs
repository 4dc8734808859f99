use std::path::PathBuf;

/// Repository whose releases are installed.
pub const DEFAULT_REPO: &str = "polymarket/polymarket-cli";
/// Name of the binary shipped in each release archive.
pub const DEFAULT_BINARY: &str = "polymarket";
/// Where the binary ends up.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com";

/// Everything that parameterises an installation run.
///
/// [`InstallConfig::default`] reproduces the fixed behaviour: latest
/// `polymarket` release from GitHub into `/usr/local/bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// GitHub repository, `owner/name`.
    pub repo: String,
    /// Binary name, used both for the archive name and the installed file.
    pub binary: String,
    pub install_dir: PathBuf,
    /// Base URL of the releases API.
    pub api_url: String,
    /// Base URL release assets are downloaded from.
    pub download_url: String,
    /// Install this tag instead of the latest release.
    pub tag: Option<String>,
    /// Install the build for this target instead of the detected one.
    pub target: Option<String>,
    /// Parent directory for the work directory; the system temp dir if unset.
    pub temp_root: Option<PathBuf>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            binary: DEFAULT_BINARY.to_string(),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            api_url: DEFAULT_API_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            tag: None,
            target: None,
            temp_root: None,
        }
    }
}

impl InstallConfig {
    /// Final location of the installed binary.
    pub fn install_path(&self) -> PathBuf {
        self.install_dir.join(&self.binary)
    }
}
