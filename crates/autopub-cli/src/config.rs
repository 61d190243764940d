//! Configuration surface of the publisher: a TOML file describing one
//! publishable application, mapped into a [`ReleaseRequest`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use autopub_core::error::ConfigError;
use autopub_core::notes;
use autopub_core::types::{
    ArtifactKind, Credentials, ReleaseArtifact, ReleaseRequest, ReleaseStatus, ReleaseTrack,
};

/// Default directory (relative to the config file) holding per-track
/// release-notes subdirectories.
pub const DEFAULT_RELEASE_NOTES_PATH: &str = "release-notes";

fn default_status() -> String {
    "completed".to_string()
}

fn default_release_notes_path() -> String {
    DEFAULT_RELEASE_NOTES_PATH.to_string()
}

fn default_artifact_type() -> String {
    "apk".to_string()
}

/// The recognized configuration keys. Unknown keys are rejected so typos
/// surface instead of silently using defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    pub application_id: String,
    pub track: Option<String>,
    pub user_fraction: Option<f64>,
    #[serde(default = "default_status")]
    pub status: String,
    pub secret_json_base64: Option<String>,
    pub secret_json_path: Option<String>,
    #[serde(default = "default_release_notes_path")]
    pub release_notes_path: String,
    #[serde(default = "default_artifact_type")]
    pub artifact_type: String,
    /// Connect/read timeout in milliseconds, applied at client creation.
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub artifacts: Vec<PathBuf>,
    pub mapping_file: Option<PathBuf>,
}

impl PublisherConfig {
    /// Load and parse the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Build the release request, resolving paths relative to `root` and
    /// discovering release notes for the configured track.
    pub fn into_request(self, root: &Path) -> Result<ReleaseRequest> {
        let track_name = self.track.ok_or(ConfigError::MissingTrack)?;
        let release_track = ReleaseTrack::from_config(&track_name, self.user_fraction)?;
        let release_status: ReleaseStatus = self.status.parse()?;
        let kind: ArtifactKind = self.artifact_type.parse()?;

        let secret_json = if let Some(encoded) = &self.secret_json_base64 {
            let decoded = STANDARD
                .decode(encoded)
                .context("`secret_json_base64` is not valid base64")?;
            Some(
                String::from_utf8(decoded)
                    .context("`secret_json_base64` does not decode to UTF-8 text")?,
            )
        } else {
            None
        };

        let release_notes = notes::load(root, &self.release_notes_path, &track_name)?;

        let artifacts = self
            .artifacts
            .iter()
            .map(|file| ReleaseArtifact::new(kind, resolve(root, file)))
            .collect();

        // An absent or empty mapping file means there is nothing to
        // deobfuscate; bundles never carry one.
        let mut obfuscation_mapping_file = None;
        if kind == ArtifactKind::Apk
            && let Some(file) = self.mapping_file
        {
            let file = resolve(root, &file);
            if fs::metadata(&file).is_ok_and(|m| m.len() > 0) {
                obfuscation_mapping_file = Some(file);
            }
        }

        Ok(ReleaseRequest {
            application_id: self.application_id,
            artifacts,
            obfuscation_mapping_file,
            release_notes,
            release_status,
            release_track,
            credentials: Credentials {
                secret_json,
                secret_json_path: self.secret_json_path,
            },
            timeout: self.timeout_ms.map(std::time::Duration::from_millis),
        })
    }
}

fn resolve(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn parse(text: &str) -> PublisherConfig {
        toml::from_str(text).unwrap()
    }

    const MINIMAL: &str = r#"
        application_id = "com.example.app"
        track = "internal"
        secret_json_path = "secret.json"
        artifacts = ["app-release.apk"]
    "#;

    #[test]
    fn defaults_are_applied() {
        let config = parse(MINIMAL);
        assert_eq!(config.status, "completed");
        assert_eq!(config.artifact_type, "apk");
        assert_eq!(config.release_notes_path, DEFAULT_RELEASE_NOTES_PATH);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<PublisherConfig, _> = toml::from_str(
            r#"
            application_id = "com.example.app"
            track = "internal"
            relese_notes_path = "notes"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_track_is_a_config_error() {
        let config = parse(
            r#"
            application_id = "com.example.app"
            secret_json_path = "secret.json"
            "#,
        );
        let dir = tempfile::tempdir().unwrap();
        let err = config.into_request(dir.path()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn builds_request_with_decoded_secret() {
        let dir = tempfile::tempdir().unwrap();
        let secret = STANDARD.encode("{\"token\":\"t\"}");
        let config = parse(&format!(
            r#"
            application_id = "com.example.app"
            track = "rollout"
            user_fraction = 0.3
            status = "inProgress"
            secret_json_base64 = "{secret}"
            artifacts = ["app-release.apk"]
            "#
        ));
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(request.application_id, "com.example.app");
        assert_eq!(
            request.release_track,
            ReleaseTrack::Rollout { user_fraction: 0.3 }
        );
        assert_eq!(request.release_status, ReleaseStatus::InProgress);
        assert_eq!(
            request.credentials.secret_json.as_deref(),
            Some("{\"token\":\"t\"}")
        );
        assert_eq!(request.artifacts.len(), 1);
        assert!(request.artifacts[0].file.is_absolute());
    }

    #[test]
    fn invalid_base64_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "internal"
            secret_json_base64 = "%%%not-base64%%%"
            "#,
        );
        assert!(config.into_request(dir.path()).is_err());
    }

    #[test]
    fn release_notes_are_discovered_for_the_track() {
        let dir = tempfile::tempdir().unwrap();
        let track_dir = dir.path().join("release-notes/beta");
        fs::create_dir_all(&track_dir).unwrap();
        fs::write(track_dir.join("en-US.txt"), "Fixed bugs").unwrap();

        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "beta"
            secret_json_path = "secret.json"
            artifacts = ["app-release.apk"]
            "#,
        );
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(request.release_notes.len(), 1);
        assert_eq!(request.release_notes[0].locale, "en-US");
    }

    #[test]
    fn empty_mapping_file_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mapping.txt"), "").unwrap();
        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "internal"
            secret_json_path = "secret.json"
            artifacts = ["app-release.apk"]
            mapping_file = "mapping.txt"
            "#,
        );
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(request.obfuscation_mapping_file, None);
    }

    #[test]
    fn mapping_file_is_ignored_for_bundles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mapping.txt"), "a -> b").unwrap();
        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "internal"
            artifact_type = "bundle"
            secret_json_path = "secret.json"
            artifacts = ["app-release.aab"]
            mapping_file = "mapping.txt"
            "#,
        );
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(request.obfuscation_mapping_file, None);
    }

    #[test]
    fn non_empty_mapping_file_is_attached_for_apks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mapping.txt"), "a -> b").unwrap();
        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "internal"
            secret_json_path = "secret.json"
            artifacts = ["app-release.apk"]
            mapping_file = "mapping.txt"
            "#,
        );
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(
            request.obfuscation_mapping_file,
            Some(dir.path().join("mapping.txt"))
        );
    }

    #[test]
    fn timeout_is_converted_to_duration() {
        let dir = tempfile::tempdir().unwrap();
        let config = parse(
            r#"
            application_id = "com.example.app"
            track = "internal"
            secret_json_path = "secret.json"
            artifacts = ["app-release.apk"]
            timeout_ms = 120000
            "#,
        );
        let request = config.into_request(dir.path()).unwrap();
        assert_eq!(
            request.timeout,
            Some(std::time::Duration::from_millis(120_000))
        );
    }
}
