//! Credential resolution: turn a [`Credentials`] value into the secret
//! JSON text used to authenticate the remote client.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Credentials;

/// Check that exactly one credential source is configured. Runs as an
/// input-shape validation before any remote call; [`resolve_secret`]
/// independently enforces non-emptiness again when the secret is used.
pub fn check_source(credentials: &Credentials) -> Result<(), ConfigError> {
    let has_inline = credentials
        .secret_json
        .as_deref()
        .is_some_and(|s| !s.is_empty());
    let has_path = credentials
        .secret_json_path
        .as_deref()
        .is_some_and(|s| !s.is_empty());

    match (has_inline, has_path) {
        (true, true) => Err(ConfigError::ConflictingCredentials),
        (false, false) => Err(ConfigError::MissingCredentials),
        _ => Ok(()),
    }
}

/// Resolve the secret JSON text, either inline or from the configured file.
pub fn resolve_secret(credentials: &Credentials) -> Result<String, ConfigError> {
    if let Some(secret) = &credentials.secret_json {
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        return Ok(secret.clone());
    }

    let Some(path) = &credentials.secret_json_path else {
        return Err(ConfigError::MissingCredentials);
    };
    let path = Path::new(path);

    let Ok(metadata) = fs::metadata(path) else {
        return Err(ConfigError::SecretFileNotFound(path.to_path_buf()));
    };
    if metadata.len() == 0 {
        return Err(ConfigError::SecretFileEmpty(path.to_path_buf()));
    }

    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn inline(secret: &str) -> Credentials {
        Credentials {
            secret_json: Some(secret.to_string()),
            secret_json_path: None,
        }
    }

    #[test]
    fn both_sources_conflict() {
        let credentials = Credentials {
            secret_json: Some("{}".to_string()),
            secret_json_path: Some("/tmp/secret.json".to_string()),
        };
        assert!(matches!(
            check_source(&credentials),
            Err(ConfigError::ConflictingCredentials)
        ));
    }

    #[test]
    fn neither_source_is_missing() {
        assert!(matches!(
            check_source(&Credentials::default()),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn single_source_passes_shape_check() {
        assert!(check_source(&inline("{\"token\":\"t\"}")).is_ok());
        let by_path = Credentials {
            secret_json: None,
            secret_json_path: Some("/tmp/secret.json".to_string()),
        };
        assert!(check_source(&by_path).is_ok());
    }

    #[test]
    fn inline_secret_resolves_to_itself() {
        let secret = resolve_secret(&inline("{\"token\":\"t\"}")).unwrap();
        assert_eq!(secret, "{\"token\":\"t\"}");
    }

    #[test]
    fn empty_inline_secret_is_rejected() {
        assert!(matches!(
            resolve_secret(&inline("")),
            Err(ConfigError::EmptySecret)
        ));
    }

    #[test]
    fn secret_file_is_read_in_full() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"token\":\"from-file\"}}").unwrap();
        let credentials = Credentials {
            secret_json: None,
            secret_json_path: Some(file.path().to_string_lossy().into_owned()),
        };
        assert_eq!(
            resolve_secret(&credentials).unwrap(),
            "{\"token\":\"from-file\"}"
        );
    }

    #[test]
    fn missing_secret_file_is_rejected() {
        let credentials = Credentials {
            secret_json: None,
            secret_json_path: Some("/nonexistent/secret.json".to_string()),
        };
        assert!(matches!(
            resolve_secret(&credentials),
            Err(ConfigError::SecretFileNotFound(_))
        ));
    }

    #[test]
    fn empty_secret_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let credentials = Credentials {
            secret_json: None,
            secret_json_path: Some(file.path().to_string_lossy().into_owned()),
        };
        assert!(matches!(
            resolve_secret(&credentials),
            Err(ConfigError::SecretFileEmpty(_))
        ));
    }
}
