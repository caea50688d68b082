//! The HTML page served at `GET /user`.

use std::{io, path::PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("page asset {} not found", .0.display())]
    Missing(PathBuf),
    #[error("page asset {} unreadable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct PageAsset {
    path: PathBuf,
}

impl PageAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Startup check: the asset must exist and be a regular file.
    pub fn verify(&self) -> Result<(), PageError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(PageError::Missing(self.path.clone())),
            Err(e) => Err(self.classify(e)),
        }
    }

    /// Read the page fresh from disk.
    pub async fn load(&self) -> Result<String, PageError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.classify(e))
    }

    fn classify(&self, e: io::Error) -> PageError {
        if e.kind() == io::ErrorKind::NotFound {
            PageError::Missing(self.path.clone())
        } else {
            PageError::Unreadable {
                path: self.path.clone(),
                source: e,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_existing_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.html");
        std::fs::write(&path, "<h1>records</h1>").unwrap();

        let page = PageAsset::new(&path);
        assert!(page.verify().is_ok());
        assert_eq!(page.load().await.unwrap(), "<h1>records</h1>");
    }

    #[tokio::test]
    async fn missing_page_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let page = PageAsset::new(dir.path().join("absent.html"));

        assert!(matches!(page.verify(), Err(PageError::Missing(_))));
        assert!(matches!(page.load().await, Err(PageError::Missing(_))));
    }

    #[test]
    fn directory_is_not_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = PageAsset::new(dir.path());

        assert!(matches!(page.verify(), Err(PageError::Missing(_))));
    }
}
