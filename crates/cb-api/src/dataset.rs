//! Training dataset uploads.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Reduce an uploaded filename to a safe basename.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// directory components and leading dots are dropped. Returns `None` when
/// nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Where an uploaded dataset for `bot_id` is stored.
pub fn dataset_path(upload_dir: &Path, bot_id: Uuid, filename: &str) -> PathBuf {
    upload_dir.join(format!("{bot_id}_{filename}"))
}

/// Persist an uploaded dataset, creating the upload directory if needed.
pub async fn save_dataset(
    upload_dir: &Path,
    bot_id: Uuid,
    filename: &str,
    contents: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = dataset_path(upload_dir, bot_id, filename);
    tokio::fs::write(&path, contents).await?;
    Ok(path)
}
