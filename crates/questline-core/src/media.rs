use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Opaque handle to a picked image. Produced only by the media picker
/// gateway; the flow never inspects the bytes behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub path: PathBuf,
    pub name: String,
}

impl ImageHandle {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read media directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn list_image_candidates(
    dir: &Path,
    extensions: &[String],
) -> Result<Vec<ImageHandle>, MediaError> {
    let entries = fs::read_dir(dir).map_err(|source| MediaError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MediaError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path, extensions) {
            candidates.push(ImageHandle::from_path(path));
        }
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(extension) = path.extension() else {
        return false;
    };
    let extension = extension.to_string_lossy().to_ascii_lowercase();
    extensions
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(&extension))
}
