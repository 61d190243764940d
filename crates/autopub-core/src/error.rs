//! Domain-specific errors for the publishing pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or missing configuration. Always fatal, surfaced before any
/// remote call. Messages name the offending key or file so the failure is
/// actionable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`track` property is required")]
    MissingTrack,

    #[error("unsupported track: {0}")]
    UnsupportedTrack(String),

    #[error("unsupported status: {0}")]
    UnsupportedStatus(String),

    #[error("unsupported artifact type: {0}")]
    UnsupportedArtifactType(String),

    #[error("`user_fraction` must be within (0, 1], got {0}")]
    InvalidUserFraction(f64),

    #[error(
        "release notes must be named using the following format: \
         <language>-<COUNTRY>.txt, e.g. en-US.txt, found: {0}"
    )]
    InvalidLocaleFileName(PathBuf),

    #[error("either `secret_json_base64` or `secret_json_path` must be specified, never both")]
    ConflictingCredentials,

    #[error("either `secret_json_base64` or `secret_json_path` must be specified")]
    MissingCredentials,

    #[error("`secret_json_base64` must not be empty")]
    EmptySecret,

    #[error("secret json file cannot be found: {0}")]
    SecretFileNotFound(PathBuf),

    #[error("secret json file must not be empty: {0}")]
    SecretFileEmpty(PathBuf),

    #[error("secret json is not valid: {0}")]
    InvalidSecretJson(String),

    #[error("failed to construct HTTP client: {0}")]
    HttpClient(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Structurally valid configuration but invalid runtime state. Fatal,
/// surfaced before remote calls.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("no artifacts found for publishing")]
    NoArtifacts,

    #[error("artifact does not exist: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("artifact must not be empty: {0}")]
    ArtifactEmpty(PathBuf),

    #[error("release notes file cannot be found: {0}")]
    NoteFileNotFound(PathBuf),

    #[error("release notes file must not be empty: {0}")]
    NoteFileEmpty(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure of a single remote call, wrapping the underlying transport or
/// API error.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The transaction step a [`RemoteError`] occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenEdit,
    UploadArtifact,
    UploadMapping,
    UpdateTrack,
    CommitEdit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::OpenEdit => "open-edit",
            Step::UploadArtifact => "upload-artifact",
            Step::UploadMapping => "upload-mapping-file",
            Step::UpdateTrack => "update-track",
            Step::CommitEdit => "commit-edit",
        };
        f.write_str(name)
    }
}

/// Outcome of a publish invocation. Either the full transaction completes,
/// or the first error encountered is returned and the remaining steps are
/// skipped.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{step} failed: {source}")]
    Remote { step: Step, source: RemoteError },
}

impl PublishError {
    /// Tag a remote failure with the transaction step it occurred in.
    pub fn remote(step: Step, source: RemoteError) -> Self {
        Self::Remote { step, source }
    }
}
