use std::path::{Path, PathBuf};

use tracing::info;

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed.
pub async fn save_payload(
    dir: impl AsRef<Path>,
    file_name: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "saved result");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("output_images").join("nested");

        let path = save_payload(&dir, "inpaint_result.png", b"\x89PNG").await.unwrap();

        assert_eq!(path, dir.join("inpaint_result.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        save_payload(root.path(), "a.jpg", b"first").await.unwrap();
        let path = save_payload(root.path(), "a.jpg", b"second").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"second");
    }
}
