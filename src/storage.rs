//! Stored contestant media

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

/// Media files kept under one root directory
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored relative path, refusing anything that escapes the root
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        if relative.is_empty()
            || path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(path))
    }

    /// Delete one media file; a file that is already gone is not an error
    pub async fn remove(&self, relative: &str) -> io::Result<bool> {
        let Some(path) = self.resolve(relative) else {
            warn!(path = %relative, "Refusing to delete media outside the storage root");
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Media file deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete several media files, logging failures; returns how many were removed
    pub async fn remove_all<I, S>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for path in paths {
            match self.remove(path.as_ref()).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(path = %path.as_ref(), error = %e, "Failed to delete media file"),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_escapes() {
        let storage = MediaStorage::new("/srv/media");

        assert_eq!(
            storage.resolve("contestants/clip.mp4"),
            Some(PathBuf::from("/srv/media/contestants/clip.mp4"))
        );
        assert!(storage.resolve("../etc/passwd").is_none());
        assert!(storage.resolve("/etc/passwd").is_none());
        assert!(storage.resolve("a/../../b").is_none());
        assert!(storage.resolve("").is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let root = std::env::temp_dir().join(format!("talentsroyale-media-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(root.join("contestants")).await.unwrap();
        tokio::fs::write(root.join("contestants/pic.png"), b"png").await.unwrap();

        let storage = MediaStorage::new(&root);
        assert!(storage.remove("contestants/pic.png").await.unwrap());
        assert!(!storage.remove("contestants/pic.png").await.unwrap());
        assert_eq!(storage.remove_all(["contestants/missing.png", "../x"]).await, 0);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
