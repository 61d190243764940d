//! The remote publishing service capability: one edit session batching
//! artifact uploads and track changes until committed.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::types::ArtifactKind;

/// Payload of a track update: one release carrying the uploaded version
/// codes, the configured status, and the localized notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackUpdate {
    pub releases: Vec<TrackRelease>,
}

/// A single release within a track update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    pub version_codes: Vec<i64>,
    pub status: String,
    /// Emitted only for the rollout track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,
    pub release_notes: Vec<LocalizedText>,
}

/// Release-note text for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

/// A remote service that can run the edit transaction. Implementations
/// are authenticated at construction time and reused for the process
/// lifetime.
#[async_trait]
pub trait PublishService: Send + Sync {
    /// Open a new edit session, returning its identifier.
    async fn open_edit(&self, application_id: &str) -> Result<String, RemoteError>;

    /// Upload one artifact file into the edit, returning its version code.
    async fn upload_artifact(
        &self,
        application_id: &str,
        edit_id: &str,
        kind: ArtifactKind,
        file: &Path,
    ) -> Result<i64, RemoteError>;

    /// Attach a deobfuscation mapping file to an uploaded APK.
    async fn upload_mapping_file(
        &self,
        application_id: &str,
        edit_id: &str,
        version_code: i64,
        file: &Path,
    ) -> Result<(), RemoteError>;

    /// Replace the release list of the named track within the edit.
    async fn update_track(
        &self,
        application_id: &str,
        edit_id: &str,
        track_name: &str,
        update: &TrackUpdate,
    ) -> Result<(), RemoteError>;

    /// Finalize the edit, making the batched changes live.
    async fn commit_edit(&self, application_id: &str, edit_id: &str) -> Result<(), RemoteError>;
}
