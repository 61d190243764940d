//! Release-notes discovery and lazy reading.
//!
//! Notes live under `<root>/<release_notes_path>/<track>/` as one text file
//! per locale, named `<language>-<COUNTRY>.txt` (e.g. `en-US.txt`). The
//! directory is optional; file content is only read at publish time.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ValidationError};
use crate::types::ReleaseNotes;

/// Maximum accumulated note text length transmitted to the remote service.
pub const MAX_TEXT_LENGTH: usize = 500;

/// Discover the release-notes files for a track. A missing directory
/// yields an empty list, not an error. Does not recurse and does not read
/// file content.
pub fn load(
    root: &Path,
    release_notes_path: &str,
    track_name: &str,
) -> Result<Vec<ReleaseNotes>, ConfigError> {
    let directory = root.join(release_notes_path).join(track_name);
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&directory).map_err(|source| ConfigError::Io {
        path: directory.clone(),
        source,
    })?;

    let mut notes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            path: directory.clone(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        notes.push(ReleaseNotes {
            locale: locale_from_file_name(&path)?,
            file: path,
        });
    }

    // read_dir order is platform-dependent
    notes.sort_by(|a, b| a.locale.cmp(&b.locale));
    Ok(notes)
}

/// Derive the locale code from a note file name: at least five characters,
/// a literal `-` at index 2, locale taken as the first five characters.
pub fn locale_from_file_name(path: &Path) -> Result<String, ConfigError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if name.len() < 5 || !name.is_char_boundary(5) || name.as_bytes()[2] != b'-' {
        return Err(ConfigError::InvalidLocaleFileName(path.to_path_buf()));
    }
    Ok(name[..5].to_string())
}

/// Read note text for transmission, accumulating trimmed lines until the
/// next line would exceed `max_length`. Truncation happens at a line
/// boundary, never mid-line.
pub fn read_text_lines(path: &Path, max_length: usize) -> Result<String, ValidationError> {
    let Ok(metadata) = fs::metadata(path) else {
        return Err(ValidationError::NoteFileNotFound(path.to_path_buf()));
    };
    if metadata.len() == 0 {
        return Err(ValidationError::NoteFileEmpty(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut text = String::new();
    for line in content.lines() {
        if text.len() + line.len() >= max_length {
            break;
        }
        text.push_str(line.trim());
        text.push('\n');
    }
    Ok(text)
}
