//! Configuration module
//!
//! Settings that must be present before anything is sent to the build
//! service, and loading of the runner's tuning configuration.

use anyhow::{Context, Result, bail};
use cbuild_runner::Config;

/// Where and for which project sources are built
#[derive(Debug, Clone)]
pub struct Settings {
    /// Build project on the remote service
    pub project: String,
    /// Bucket receiving the source archive
    pub source_bucket: String,
    /// Key prefix for source archives, may be empty
    pub source_prefix: String,
}

impl Settings {
    /// Builds settings from flags, rejecting missing required values
    pub fn new(
        project: Option<String>,
        source_bucket: Option<String>,
        source_prefix: Option<String>,
    ) -> Result<Self> {
        let project = required(project, "project", "--project", "CBUILD_PROJECT")?;
        let source_bucket = required(
            source_bucket,
            "source bucket",
            "--source-bucket",
            "CBUILD_SOURCE_BUCKET",
        )?;

        Ok(Self {
            project,
            source_bucket,
            source_prefix: source_prefix
                .unwrap_or_default()
                .trim_matches('/')
                .to_string(),
        })
    }

    /// Object key for a source archive
    pub fn source_key(&self, source_id: &str) -> String {
        if self.source_prefix.is_empty() {
            format!("{}.zip", source_id)
        } else {
            format!("{}/{}.zip", self.source_prefix, source_id)
        }
    }

    /// `<bucket>/<key>` as the build service expects it
    pub fn source_location(&self, key: &str) -> String {
        format!("{}/{}", self.source_bucket, key)
    }
}

fn required(value: Option<String>, what: &str, flag: &str, env: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("missing {}: pass {} or set {}", what, flag, env),
    }
}

/// Loads the runner configuration for the given service URL
///
/// Optional tuning variables (`CBUILD_POLL_MS`, ...) are applied on top of
/// the defaults.
pub fn load_runner_config(service_url: String) -> Result<Config> {
    let mut config = Config::new(service_url);
    config.apply_env_overrides();
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_project_is_rejected() {
        let err = Settings::new(None, Some("sources".to_string()), None).unwrap_err();
        assert!(err.to_string().contains("--project"));

        let err = Settings::new(Some("  ".to_string()), Some("sources".to_string()), None)
            .unwrap_err();
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn test_missing_bucket_is_rejected() {
        let err = Settings::new(Some("proj".to_string()), None, None).unwrap_err();
        assert!(err.to_string().contains("CBUILD_SOURCE_BUCKET"));
    }

    #[test]
    fn test_source_key_and_location() {
        let settings = Settings::new(
            Some("proj".to_string()),
            Some("sources".to_string()),
            Some("/ci/builds/".to_string()),
        )
        .unwrap();

        let key = settings.source_key("4b1e");
        assert_eq!(key, "ci/builds/4b1e.zip");
        assert_eq!(settings.source_location(&key), "sources/ci/builds/4b1e.zip");

        let settings =
            Settings::new(Some("proj".to_string()), Some("sources".to_string()), None).unwrap();
        assert_eq!(settings.source_key("4b1e"), "4b1e.zip");
    }

    #[test]
    fn test_invalid_service_url() {
        assert!(load_runner_config("ftp://builds".to_string()).is_err());
    }
}
