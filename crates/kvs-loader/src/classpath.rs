//! Classpath-style loader searching an ordered list of root directories

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::file::read_file;
use crate::loader::ResourceLoader;
use crate::uri::ResourceUri;

/// Loads `classpath:` resources by searching root directories in order.
///
/// `classpath:/app.properties` and `classpath:app.properties` are the
/// same resource; the first root that contains the file wins.
#[derive(Debug, Default, Clone)]
pub struct ClasspathLoader {
    roots: Vec<PathBuf>,
}

impl ClasspathLoader {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a root directory to the search order.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ResourceLoader for ClasspathLoader {
    fn schemes(&self) -> &[&str] {
        &["classpath"]
    }

    fn fetch(&self, uri: &ResourceUri) -> Result<Vec<u8>> {
        let relative = uri.path().trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|seg| seg == "..") {
            return Err(Error::InvalidUri {
                uri: uri.as_str().to_string(),
                message: "classpath resources must name a file inside a root".to_string(),
            });
        }

        for root in &self.roots {
            let candidate = root.join(relative);
            match read_file(uri.as_str(), &candidate) {
                Err(e) if e.is_not_found() => {
                    tracing::trace!(path = %candidate.display(), "Not on classpath root");
                }
                other => return other,
            }
        }
        Err(Error::not_found(uri.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("app.properties"), "from=first").unwrap();
        fs::write(second.path().join("app.properties"), "from=second").unwrap();
        fs::write(second.path().join("only.properties"), "from=second").unwrap();

        let loader = ClasspathLoader::new([first.path(), second.path()]);
        let uri = ResourceUri::parse("classpath:/app.properties");
        assert_eq!(loader.fetch(&uri).unwrap(), b"from=first");

        let uri = ResourceUri::parse("classpath:only.properties");
        assert_eq!(loader.fetch(&uri).unwrap(), b"from=second");
    }

    #[test]
    fn test_missing_everywhere_is_not_found() {
        let root = TempDir::new().unwrap();
        let loader = ClasspathLoader::default().with_root(root.path());
        let err = loader.fetch(&ResourceUri::parse("classpath:/nope.properties")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_parent_traversal() {
        let loader = ClasspathLoader::default();
        let err = loader.fetch(&ResourceUri::parse("classpath:../secret")).unwrap_err();
        assert!(matches!(err, Error::InvalidUri { .. }));
    }
}
