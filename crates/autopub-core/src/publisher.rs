//! The release transaction: open edit, upload artifacts (and mapping
//! file), update the track, commit.
//!
//! There is no rollback: a failed step leaves an uncommitted edit behind
//! on the remote side, and re-invoking opens a fresh edit rather than
//! resuming the old one. Retries, if wanted, belong to the caller around
//! the whole operation.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::credentials;
use crate::error::{PublishError, Step, ValidationError};
use crate::http::HttpPublishService;
use crate::notes;
use crate::remote::{LocalizedText, PublishService, TrackRelease, TrackUpdate};
use crate::types::{ArtifactKind, Credentials, ReleaseRequest, ReleaseTrack};
use crate::validate;

/// Drives the publish transaction against a [`PublishService`].
pub struct PlayPublisher {
    service: Arc<dyn PublishService>,
}

impl std::fmt::Debug for PlayPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayPublisher").finish_non_exhaustive()
    }
}

impl PlayPublisher {
    pub fn new(service: Arc<dyn PublishService>) -> Self {
        Self { service }
    }

    /// Execute the full transaction for one release request.
    ///
    /// Preconditions (credential shape, artifact presence) are checked
    /// before the first remote call. The remote steps run strictly in
    /// order; the first failure aborts the invocation and is tagged with
    /// the step it occurred in.
    pub async fn publish(&self, request: &ReleaseRequest) -> Result<(), PublishError> {
        credentials::check_source(&request.credentials)?;
        validate::validate_artifacts(&request.artifacts)?;

        let application_id = &request.application_id;
        let edit_id = self
            .service
            .open_edit(application_id)
            .await
            .map_err(|e| PublishError::remote(Step::OpenEdit, e))?;
        tracing::debug!("opened edit {edit_id} for {application_id}");

        let mut version_codes = Vec::with_capacity(request.artifacts.len());
        for artifact in &request.artifacts {
            let version_code = self
                .service
                .upload_artifact(application_id, &edit_id, artifact.kind, &artifact.file)
                .await
                .map_err(|e| PublishError::remote(Step::UploadArtifact, e))?;
            tracing::debug!(
                "uploaded {} as version code {version_code}",
                artifact.file.display()
            );

            if artifact.kind == ArtifactKind::Apk
                && let Some(mapping_file) = &request.obfuscation_mapping_file
            {
                self.service
                    .upload_mapping_file(application_id, &edit_id, version_code, mapping_file)
                    .await
                    .map_err(|e| PublishError::remote(Step::UploadMapping, e))?;
                tracing::debug!(
                    "uploaded mapping file {} for version code {version_code}",
                    mapping_file.display()
                );
            }
            version_codes.push(version_code);
        }

        let update = build_track_update(request, version_codes)?;
        let track_name = request.release_track.name();
        self.service
            .update_track(application_id, &edit_id, track_name, &update)
            .await
            .map_err(|e| PublishError::remote(Step::UpdateTrack, e))?;
        tracing::debug!("updated track {track_name}");

        self.service
            .commit_edit(application_id, &edit_id)
            .await
            .map_err(|e| PublishError::remote(Step::CommitEdit, e))?;
        tracing::info!(
            "committed edit {edit_id}: {} artifact(s) on track {track_name}",
            request.artifacts.len()
        );
        Ok(())
    }
}

/// Build the track-update payload: aggregated version codes, configured
/// status, rollout fraction when applicable, and note text read lazily
/// and truncated for transmission.
fn build_track_update(
    request: &ReleaseRequest,
    version_codes: Vec<i64>,
) -> Result<TrackUpdate, ValidationError> {
    let user_fraction = match request.release_track {
        ReleaseTrack::Rollout { user_fraction } => Some(user_fraction),
        _ => None,
    };

    let mut release_notes = Vec::with_capacity(request.release_notes.len());
    for note in &request.release_notes {
        release_notes.push(LocalizedText {
            language: note.locale.clone(),
            text: notes::read_text_lines(&note.file, notes::MAX_TEXT_LENGTH)?,
        });
    }

    Ok(TrackUpdate {
        releases: vec![TrackRelease {
            version_codes,
            status: request.release_status.name().to_string(),
            user_fraction,
            release_notes,
        }],
    })
}

static PUBLISHER: OnceLock<PlayPublisher> = OnceLock::new();

/// Process-wide publisher handle, created lazily from the first caller's
/// credentials and timeout and reused afterwards. One process publishes
/// one application; concurrent distinct applications would need a cache
/// keyed by (application id, credential fingerprint) instead.
pub fn get_publisher(
    credentials: &Credentials,
    timeout: Option<Duration>,
) -> Result<&'static PlayPublisher, PublishError> {
    if let Some(publisher) = PUBLISHER.get() {
        return Ok(publisher);
    }
    let secret = credentials::resolve_secret(credentials)?;
    let service = HttpPublishService::from_secret_json(&secret, timeout)?;
    Ok(PUBLISHER.get_or_init(|| PlayPublisher::new(Arc::new(service))))
}
