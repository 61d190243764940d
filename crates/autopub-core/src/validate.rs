//! Pre-flight checks applied before any remote state is mutated.

use std::fs;

use crate::error::ValidationError;
use crate::types::ReleaseArtifact;

/// Verify the artifact list is non-empty and every artifact file exists
/// and has non-zero length.
pub fn validate_artifacts(artifacts: &[ReleaseArtifact]) -> Result<(), ValidationError> {
    if artifacts.is_empty() {
        return Err(ValidationError::NoArtifacts);
    }
    for artifact in artifacts {
        let Ok(metadata) = fs::metadata(&artifact.file) else {
            return Err(ValidationError::ArtifactNotFound(artifact.file.clone()));
        };
        if metadata.len() == 0 {
            return Err(ValidationError::ArtifactEmpty(artifact.file.clone()));
        }
    }
    Ok(())
}
