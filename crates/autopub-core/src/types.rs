//! Value objects describing one release: track, status, artifacts, notes,
//! and credentials. All of them are created fresh per publish invocation
//! and discarded afterwards.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Canonical name of the staged-rollout track.
pub const TRACK_ROLLOUT: &str = "rollout";

/// A named release channel on the remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseTrack {
    Internal,
    Alpha,
    Beta,
    /// Staged rollout to a fraction of eligible users, within (0, 1].
    Rollout { user_fraction: f64 },
    Production,
}

impl ReleaseTrack {
    /// Parse a configured track name. Only `rollout` consumes the user
    /// fraction; it defaults to 1.0 when unspecified.
    pub fn from_config(name: &str, user_fraction: Option<f64>) -> Result<Self, ConfigError> {
        match name {
            "internal" => Ok(Self::Internal),
            "alpha" => Ok(Self::Alpha),
            "beta" => Ok(Self::Beta),
            "production" => Ok(Self::Production),
            TRACK_ROLLOUT => {
                let fraction = user_fraction.unwrap_or(1.0);
                if fraction > 0.0 && fraction <= 1.0 {
                    Ok(Self::Rollout {
                        user_fraction: fraction,
                    })
                } else {
                    Err(ConfigError::InvalidUserFraction(fraction))
                }
            }
            other => Err(ConfigError::UnsupportedTrack(other.to_string())),
        }
    }

    /// Canonical lowercase name, used both in configuration and as the
    /// remote track identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Rollout { .. } => TRACK_ROLLOUT,
            Self::Production => "production",
        }
    }
}

/// Release status understood by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    Completed,
    Draft,
    Halted,
    InProgress,
}

impl ReleaseStatus {
    /// Canonical status string sent to the remote API.
    pub fn name(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Draft => "draft",
            Self::Halted => "halted",
            Self::InProgress => "inProgress",
        }
    }
}

impl FromStr for ReleaseStatus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "draft" => Ok(Self::Draft),
            "halted" => Ok(Self::Halted),
            "inProgress" => Ok(Self::InProgress),
            other => Err(ConfigError::UnsupportedStatus(other.to_string())),
        }
    }
}

/// Kind of artifact being uploaded. Determines the MIME type and the
/// upload endpoint; only APKs can carry a deobfuscation mapping file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Apk,
    Bundle,
}

impl ArtifactKind {
    /// Canonical configuration string.
    pub fn name(self) -> &'static str {
        match self {
            Self::Apk => "apk",
            Self::Bundle => "bundle",
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apk" => Ok(Self::Apk),
            "bundle" => Ok(Self::Bundle),
            other => Err(ConfigError::UnsupportedArtifactType(other.to_string())),
        }
    }
}

/// An artifact file scheduled for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArtifact {
    pub kind: ArtifactKind,
    pub file: PathBuf,
}

impl ReleaseArtifact {
    pub fn new(kind: ArtifactKind, file: PathBuf) -> Self {
        Self { kind, file }
    }
}

/// Localized release notes: a locale code derived from the file name
/// (`en-US.txt` -> `en-US`) paired with the note file. Content is read
/// lazily at publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub locale: String,
    pub file: PathBuf,
}

/// Credential source for the remote service: either the already-decoded
/// secret JSON, or a path to a file containing it. Exactly one may be set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub secret_json: Option<String>,
    pub secret_json_path: Option<String>,
}

/// Aggregate root handed to the publisher: everything needed for one
/// publish invocation. Immutable once constructed, consumed exactly once.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub application_id: String,
    pub artifacts: Vec<ReleaseArtifact>,
    pub obfuscation_mapping_file: Option<PathBuf>,
    pub release_notes: Vec<ReleaseNotes>,
    pub release_status: ReleaseStatus,
    pub release_track: ReleaseTrack,
    pub credentials: Credentials,
    /// Connect/read timeout applied at client creation time only.
    pub timeout: Option<Duration>,
}
