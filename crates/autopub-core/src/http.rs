//! HTTP implementation of [`PublishService`] against the v3 publishing
//! REST surface.
//!
//! The client is authenticated once at construction from the resolved
//! secret JSON, which carries the publisher-scoped access token and,
//! optionally, endpoint overrides. Token refresh and the OAuth exchange
//! happen outside this process.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{ConfigError, RemoteError};
use crate::remote::{PublishService, TrackUpdate};
use crate::types::ArtifactKind;

/// MIME type for APK uploads.
pub const MIME_TYPE_APK: &str = "application/vnd.android.package-archive";
/// MIME type for bundle and mapping-file uploads.
pub const MIME_TYPE_STREAM: &str = "application/octet-stream";

const TYPE_PROGUARD: &str = "proguard";

const DEFAULT_API_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
const DEFAULT_UPLOAD_URL: &str =
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3";

/// Contents of the secret JSON credential.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretJson {
    token: String,
    api_url: Option<String>,
    upload_url: Option<String>,
}

/// Authenticated remote handle. Created once per process and reused for
/// every publish call; the timeout is applied at creation time only.
pub struct HttpPublishService {
    client: Client,
    token: String,
    api_url: String,
    upload_url: String,
}

// Manual impl so the token never ends up in logs.
impl std::fmt::Debug for HttpPublishService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPublishService")
            .field("api_url", &self.api_url)
            .field("upload_url", &self.upload_url)
            .finish_non_exhaustive()
    }
}

impl HttpPublishService {
    /// Build the service from resolved secret JSON text.
    pub fn from_secret_json(
        secret_json: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let secret: SecretJson = serde_json::from_str(secret_json)
            .map_err(|e| ConfigError::InvalidSecretJson(e.to_string()))?;
        if secret.token.is_empty() {
            return Err(ConfigError::InvalidSecretJson(
                "`token` must not be empty".to_string(),
            ));
        }

        let mut builder = Client::builder().user_agent(crate::USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            token: secret.token,
            api_url: secret
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            upload_url: secret
                .upload_url
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn upload_endpoint(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Apk => "apks",
            ArtifactKind::Bundle => "bundles",
        }
    }

    fn mime_type(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Apk => MIME_TYPE_APK,
            ArtifactKind::Bundle => MIME_TYPE_STREAM,
        }
    }
}

/// Map a non-success response into [`RemoteError::Api`] carrying the body.
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Deserialize)]
struct AppEdit {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedArtifact {
    version_code: i64,
}

#[async_trait]
impl PublishService for HttpPublishService {
    async fn open_edit(&self, application_id: &str) -> Result<String, RemoteError> {
        let url = format!("{}/applications/{application_id}/edits", self.api_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let edit: AppEdit = check_status(response).await?.json().await?;
        if edit.id.is_empty() {
            return Err(RemoteError::MalformedResponse(
                "edit id must not be empty".to_string(),
            ));
        }
        Ok(edit.id)
    }

    async fn upload_artifact(
        &self,
        application_id: &str,
        edit_id: &str,
        kind: ArtifactKind,
        file: &Path,
    ) -> Result<i64, RemoteError> {
        let url = format!(
            "{}/applications/{application_id}/edits/{edit_id}/{}",
            self.upload_url,
            Self::upload_endpoint(kind)
        );
        let body = tokio::fs::read(file).await?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, Self::mime_type(kind))
            .body(body)
            .send()
            .await?;
        let uploaded: UploadedArtifact = check_status(response).await?.json().await?;
        Ok(uploaded.version_code)
    }

    async fn upload_mapping_file(
        &self,
        application_id: &str,
        edit_id: &str,
        version_code: i64,
        file: &Path,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/applications/{application_id}/edits/{edit_id}/apks/{version_code}/deobfuscationFiles/{TYPE_PROGUARD}",
            self.upload_url
        );
        let body = tokio::fs::read(file).await?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, MIME_TYPE_STREAM)
            .body(body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_track(
        &self,
        application_id: &str,
        edit_id: &str,
        track_name: &str,
        update: &TrackUpdate,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/applications/{application_id}/edits/{edit_id}/tracks/{track_name}",
            self.api_url
        );
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(update)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn commit_edit(&self, application_id: &str, edit_id: &str) -> Result<(), RemoteError> {
        let url = format!(
            "{}/applications/{application_id}/edits/{edit_id}:commit",
            self.api_url
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}
