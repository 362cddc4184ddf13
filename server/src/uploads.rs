use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::ALLOWED_EXTENSIONS;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File type not allowed. Allowed: {}", ALLOWED_EXTENSIONS.join(", "))]
    DisallowedExtension,

    #[error("File too large. Maximum size is {0} bytes")]
    TooLarge(usize),

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the lowercased extension if it is on the allow-list.
fn allowed_extension(filename: &str) -> Option<String> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Strips anything that is not alphanumeric, dash, or underscore from the
/// filename stem so a client-supplied name cannot escape the upload folder.
fn sanitize_stem(filename: &str) -> String {
    let stem = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .rsplit_once('.')
        .map(|(s, _)| s)
        .unwrap_or(filename);

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Builds the on-disk name: `{stem}_{unix_ts}.{ext}`. The timestamp suffix
/// keeps two uploads of the same filename from colliding.
pub fn stamped_filename(original: &str, unix_ts: i64) -> Result<String, UploadError> {
    let ext = allowed_extension(original).ok_or(UploadError::DisallowedExtension)?;
    Ok(format!("{}_{}.{}", sanitize_stem(original), unix_ts, ext))
}

/// Writes the upload under `dir` and returns the stored filename (what goes
/// into recipes.image_path). The file lands on disk before the recipe row
/// commits; a crash in between leaves an orphaned file.
pub fn store_image(
    dir: &Path,
    original: &str,
    data: &[u8],
    max_bytes: usize,
) -> Result<String, UploadError> {
    if data.len() > max_bytes {
        return Err(UploadError::TooLarge(max_bytes));
    }

    let filename = stamped_filename(original, chrono::Utc::now().timestamp())?;
    fs::create_dir_all(dir)?;
    fs::write(dir.join(&filename), data)?;
    Ok(filename)
}

/// Best-effort removal of a stored image. Filesystem errors are swallowed;
/// the database rows are already gone and a stray file is harmless.
pub fn remove_image(dir: &Path, filename: &str) {
    let path = dir.join(filename);
    if let Err(e) = fs::remove_file(&path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove image {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamped_filename() {
        let name = stamped_filename("pancakes.JPG", 1700000000).unwrap();
        assert_eq!(name, "pancakes_1700000000.jpg");
    }

    #[test]
    fn test_rejects_disallowed_extension() {
        assert!(matches!(
            stamped_filename("shell.sh", 1),
            Err(UploadError::DisallowedExtension)
        ));
        assert!(matches!(
            stamped_filename("noext", 1),
            Err(UploadError::DisallowedExtension)
        ));
    }

    #[test]
    fn test_sanitizes_path_traversal() {
        let name = stamped_filename("../../etc/passwd.png", 42).unwrap();
        assert_eq!(name, "passwd_42.png");
    }

    #[test]
    fn test_sanitizes_odd_characters() {
        let name = stamped_filename("мой торт (1).webp", 7).unwrap();
        assert_eq!(name, "мой_торт__1__7.webp");
    }

    #[test]
    fn test_empty_stem_falls_back() {
        let name = stamped_filename(".png", 9).unwrap();
        assert_eq!(name, "upload_9.png");
    }
}
