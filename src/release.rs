use serde::Deserialize;
use crate::config::InstallConfig;
use crate::download::{DownloadError, ReleaseClient};
use crate::error::InstallError;

/// Name of the checksum manifest published with every release.
pub const CHECKSUMS_FILE: &str = "checksums.txt";

/// The subset of the GitHub "latest release" document the installer reads.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    #[serde(default)]
    tag_name: Option<String>,
}

/// A resolved release for one target.
///
/// All asset names and URLs are derived from the binary name, the tag and
/// the target triple, so the same inputs always produce the same URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// The GitHub repository, e.g. `polymarket/polymarket-cli`.
    pub repo: String,
    /// Name of the binary inside the release archive.
    pub binary: String,
    /// The release tag, e.g. `v1.2.3`.
    pub tag: String,
    /// The target triple the archive was built for.
    pub target: String,
}

impl Release {
    /// File name of the platform tarball:
    /// `<binary>-<tag>-<target>.tar.gz`.
    pub fn tarball_name(&self) -> String {
        format!("{}-{}-{}.tar.gz", self.binary, self.tag, self.target)
    }

    /// URL of a named asset of this release under `download_base`.
    pub fn asset_url(&self, download_base: &str, file: &str) -> String {
        format!(
            "{}/{}/releases/download/{}/{}",
            download_base.trim_end_matches('/'),
            self.repo,
            self.tag,
            file
        )
    }

    pub fn tarball_url(&self, download_base: &str) -> String {
        self.asset_url(download_base, &self.tarball_name())
    }

    pub fn checksums_url(&self, download_base: &str) -> String {
        self.asset_url(download_base, CHECKSUMS_FILE)
    }
}

/// URL of the "latest release" endpoint for `repo` under `api_base`.
pub fn latest_release_url(api_base: &str, repo: &str) -> String {
    format!("{}/repos/{}/releases/latest", api_base.trim_end_matches('/'), repo)
}

/// Determines the tag to install.
///
/// A tag pinned in the configuration is used as-is; otherwise the releases
/// API is asked for the latest release and its `tag_name` is returned.
///
/// # Errors
///
/// Returns [`InstallError::ReleaseUnavailable`] if the request fails, the
/// response is not the expected document, or the tag is empty.
pub fn resolve_tag<C: ReleaseClient>(
    config: &InstallConfig,
    client: &C,
) -> Result<String, InstallError> {
    let unavailable = |reason: String| InstallError::ReleaseUnavailable {
        repo: config.repo.clone(),
        reason,
    };

    if let Some(tag) = &config.tag {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(unavailable("the requested tag is empty".to_string()));
        }
        log::info!("using pinned release tag {tag}");
        return Ok(tag.to_string());
    }

    let url = latest_release_url(&config.api_url, &config.repo);
    let body = client
        .fetch_text(&url)
        .map_err(|e| match e {
            DownloadError::Interrupted => InstallError::Interrupted,
            other => unavailable(other.to_string()),
        })?;
    parse_tag(&body).ok_or_else(|| unavailable("no tag_name in release metadata".to_string()))
}

/// Extracts a non-empty `tag_name` from a release metadata document.
pub fn parse_tag(body: &str) -> Option<String> {
    let release: LatestRelease = serde_json::from_str(body).ok()?;
    release
        .tag_name
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use super::*;

    struct FixedClient {
        body: Result<String, ()>,
        requested: RefCell<Vec<String>>,
    }

    impl ReleaseClient for FixedClient {
        fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
            self.requested.borrow_mut().push(url.to_string());
            self.body.clone().map_err(|_| DownloadError::NotFound { url: url.to_string() })
        }

        fn download_to_file(&self, url: &str, _dest: &Path) -> Result<u64, DownloadError> {
            panic!("unexpected download of {url}");
        }
    }

    fn client(body: Result<&str, ()>) -> FixedClient {
        FixedClient {
            body: body.map(str::to_string),
            requested: RefCell::new(Vec::new()),
        }
    }

    fn release() -> Release {
        Release {
            repo: "polymarket/polymarket-cli".to_string(),
            binary: "polymarket".to_string(),
            tag: "v1.2.3".to_string(),
            target: "x86_64-unknown-linux-gnu".to_string(),
        }
    }

    #[test]
    fn test_tarball_name() {
        assert_eq!(
            release().tarball_name(),
            "polymarket-v1.2.3-x86_64-unknown-linux-gnu.tar.gz"
        );
    }

    #[test]
    fn test_asset_urls() {
        let release = release();
        assert_eq!(
            release.tarball_url("https://github.com"),
            "https://github.com/polymarket/polymarket-cli/releases/download/v1.2.3/polymarket-v1.2.3-x86_64-unknown-linux-gnu.tar.gz"
        );
        assert_eq!(
            release.checksums_url("https://github.com/"),
            "https://github.com/polymarket/polymarket-cli/releases/download/v1.2.3/checksums.txt"
        );
    }

    #[test]
    fn test_parse_tag_ignores_other_fields() {
        let body = r#"{"url": "x", "tag_name": "v1.2.3", "assets": [{"name": "a"}]}"#;
        assert_eq!(parse_tag(body).as_deref(), Some("v1.2.3"));
    }

    #[test]
    fn test_parse_tag_rejects_missing_or_empty() {
        assert_eq!(parse_tag(r#"{"message": "Not Found"}"#), None);
        assert_eq!(parse_tag(r#"{"tag_name": ""}"#), None);
        assert_eq!(parse_tag("<html>rate limited</html>"), None);
    }

    #[test]
    fn test_resolve_tag_queries_latest_release() {
        let config = InstallConfig::default();
        let client = client(Ok(r#"{"tag_name": "v1.2.3"}"#));
        assert_eq!(resolve_tag(&config, &client).unwrap(), "v1.2.3");
        assert_eq!(
            client.requested.borrow().as_slice(),
            ["https://api.github.com/repos/polymarket/polymarket-cli/releases/latest"]
        );
    }

    #[test]
    fn test_resolve_tag_fails_on_empty_tag() {
        let config = InstallConfig::default();
        let err = resolve_tag(&config, &client(Ok(r#"{"tag_name": ""}"#))).unwrap_err();
        assert!(matches!(err, InstallError::ReleaseUnavailable { .. }));
    }

    struct InterruptedClient;

    impl ReleaseClient for InterruptedClient {
        fn fetch_text(&self, _url: &str) -> Result<String, DownloadError> {
            Err(DownloadError::Interrupted)
        }

        fn download_to_file(&self, url: &str, _dest: &Path) -> Result<u64, DownloadError> {
            panic!("unexpected download of {url}");
        }
    }

    #[test]
    fn test_interrupted_metadata_request_stays_interrupted() {
        let config = InstallConfig::default();
        let err = resolve_tag(&config, &InterruptedClient).unwrap_err();
        assert!(matches!(err, InstallError::Interrupted));
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_resolve_tag_fails_when_request_fails() {
        let config = InstallConfig::default();
        let err = resolve_tag(&config, &client(Err(()))).unwrap_err();
        assert!(matches!(err, InstallError::ReleaseUnavailable { .. }));
    }

    #[test]
    fn test_pinned_tag_skips_the_api() {
        let config = InstallConfig {
            tag: Some("v0.9.0".to_string()),
            ..InstallConfig::default()
        };
        let client = client(Err(()));
        assert_eq!(resolve_tag(&config, &client).unwrap(), "v0.9.0");
        assert!(client.requested.borrow().is_empty());
    }
}
