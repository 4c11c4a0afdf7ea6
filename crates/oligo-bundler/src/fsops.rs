//! Filesystem helpers for the promotion sequence.
//!
//! No atomic cross-device rename is assumed anywhere: moves are expressed as
//! copy-then-delete-source by the callers.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

/// Remove a file or directory tree if it exists; absence is not an error.
pub async fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copy a directory tree, creating `dest` as needed.
pub async fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    copy_tree_inner(src.to_path_buf(), dest.to_path_buf()).await
}

fn copy_tree_inner(
    src: PathBuf,
    dest: PathBuf,
) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send>> {
    Box::pin(async move {
        fs::create_dir_all(&dest).await?;
        let mut entries = fs::read_dir(&src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = dest.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                copy_tree_inner(entry.path(), target).await?;
            } else {
                fs::copy(entry.path(), &target).await?;
            }
        }
        Ok(())
    })
}

/// Copy a file or directory tree to `dest`, creating parent directories.
pub async fn copy_path(src: &Path, dest: &Path) -> io::Result<()> {
    if fs::metadata(src).await?.is_dir() {
        copy_tree(src, dest).await
    } else {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(src, dest).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_existing_tolerates_absence() {
        let temp = TempDir::new().unwrap();
        assert!(remove_existing(&temp.path().join("missing")).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_existing_removes_files_and_trees() {
        let temp = TempDir::new().unwrap();

        let file = temp.path().join("stale.txt");
        fs::write(&file, "x").await.unwrap();
        remove_existing(&file).await.unwrap();
        assert!(!file.exists());

        let dir = temp.path().join("stale");
        fs::create_dir_all(dir.join("nested")).await.unwrap();
        fs::write(dir.join("nested/a.txt"), "x").await.unwrap();
        remove_existing(&dir).await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_copy_tree_is_recursive() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("js")).await.unwrap();
        fs::write(src.join("index.html"), "<html></html>")
            .await
            .unwrap();
        fs::write(src.join("js/app.js"), "void 0;").await.unwrap();

        let dest = temp.path().join("dest");
        copy_tree(&src, &dest).await.unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("index.html")).await.unwrap(),
            "<html></html>"
        );
        assert_eq!(
            fs::read_to_string(dest.join("js/app.js")).await.unwrap(),
            "void 0;"
        );
    }

    #[tokio::test]
    async fn test_copy_path_creates_parents_for_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("README.md");
        fs::write(&src, "# readme").await.unwrap();

        let dest = temp.path().join("dist/docs/README.md");
        copy_path(&src, &dest).await.unwrap();

        assert_eq!(fs::read_to_string(&dest).await.unwrap(), "# readme");
    }
}
