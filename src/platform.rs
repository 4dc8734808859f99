use crate::error::InstallError;

/// Target triples that have published release artifacts.
pub const SUPPORTED_TARGETS: [&str; 4] = [
    "x86_64-unknown-linux-gnu",
    "aarch64-unknown-linux-gnu",
    "x86_64-apple-darwin",
    "aarch64-apple-darwin",
];

/// Raw operating system and machine architecture of a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub os: String,
    pub arch: String,
}

impl Host {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// The host this process is running on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps this host to its release target triple.
    pub fn target_triple(&self) -> Result<&'static str, InstallError> {
        target_triple(&self.os, &self.arch)
    }
}

/// Returns the release target triple (e.g. `x86_64-unknown-linux-gnu`) for an
/// OS and architecture pair.
///
/// Both `uname` spellings (`Linux`, `Darwin`, `arm64`) and Rust's
/// `std::env::consts` spellings (`linux`, `macos`, `aarch64`) are accepted.
/// Any other pair is an [`InstallError::UnsupportedPlatform`].
pub fn target_triple(os: &str, arch: &str) -> Result<&'static str, InstallError> {
    let os_key = os.to_ascii_lowercase();
    let arch_key = arch.to_ascii_lowercase();

    match (os_key.as_str(), arch_key.as_str()) {
        ("linux", "x86_64" | "amd64") => Ok("x86_64-unknown-linux-gnu"),
        ("linux", "aarch64" | "arm64") => Ok("aarch64-unknown-linux-gnu"),
        ("darwin" | "macos", "x86_64" | "amd64") => Ok("x86_64-apple-darwin"),
        ("darwin" | "macos", "aarch64" | "arm64") => Ok("aarch64-apple-darwin"),
        _ => Err(InstallError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

/// Checks an explicitly requested target against [`SUPPORTED_TARGETS`].
pub fn validate_target(target: &str) -> Result<&'static str, InstallError> {
    SUPPORTED_TARGETS
        .iter()
        .copied()
        .find(|supported| *supported == target)
        .ok_or_else(|| InstallError::UnsupportedTarget(target.to_string()))
}
