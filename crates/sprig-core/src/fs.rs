//! Filesystem helpers shared by the orchestrator.

use std::path::Path;

use tokio::fs;

use crate::{Error, Result};

/// Empty `dir`, creating it if missing.
///
/// The directory itself is kept so that a server watching it does not lose
/// its handle.
pub async fn reset_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir).await {
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::filesystem(
                "output path is not a directory",
                dir,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }
        Ok(_) => {
            let mut entries = fs::read_dir(dir)
                .await
                .map_err(|e| Error::filesystem("failed to read directory", dir, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::filesystem("failed to read directory", dir, e))?
            {
                let path = entry.path();
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                let removed = if is_dir {
                    fs::remove_dir_all(&path).await
                } else {
                    fs::remove_file(&path).await
                };
                removed.map_err(|e| Error::filesystem("failed to remove", &path, e))?;
            }
        }
        Err(_) => {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::filesystem("failed to create directory", dir, e))?;
        }
    }
    Ok(())
}

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::filesystem("failed to create directory", parent, e))?;
    }
    Ok(())
}

/// Copy a file, preserving its permission bits.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    ensure_parent(to).await?;
    fs::copy(from, to)
        .await
        .map_err(|e| Error::filesystem("failed to copy", from, e))?;
    Ok(())
}

pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent(path).await?;
    fs::write(path, contents)
        .await
        .map_err(|e| Error::filesystem("failed to write", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reset_dir_clears_contents() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("dist");
        std::fs::create_dir_all(dist.join("nested")).unwrap();
        std::fs::write(dist.join("old.txt"), "old").unwrap();
        std::fs::write(dist.join("nested/old.js"), "old").unwrap();

        reset_dir(&dist).await.unwrap();

        assert!(dist.is_dir());
        assert_eq!(std::fs::read_dir(&dist).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_reset_dir_creates_missing() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("a/b/dist");
        reset_dir(&dist).await.unwrap();
        assert!(dist.is_dir());
    }

    #[tokio::test]
    async fn test_reset_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("dist");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            reset_dir(&file).await,
            Err(Error::Filesystem { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("x/y/z.txt");
        write_file(&path, b"hello").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
