//! Host services - File system access consumed by the dispatcher
//!
//! The dispatcher only sees success or failure from these calls. Choosing a
//! path is done by the controller's prompt row, not here.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// File types the open prompt suggests. Advisory only.
pub const KNOWN_EXTENSIONS: &[&str] = &["txt", "md", "js", "css", "html", "json"];

static KNOWN_EXTENSION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\.({})$", KNOWN_EXTENSIONS.join("|"))).ok()
});

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no se pudo leer {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no se pudo escribir {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HostError {
    pub fn is_not_found(&self) -> bool {
        match self {
            HostError::Read { source, .. } | HostError::Write { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
        }
    }
}

pub trait HostBridge {
    fn read_file(&mut self, path: &Path) -> Result<String, HostError>;
    fn write_file(&mut self, path: &Path, content: &str) -> Result<(), HostError>;
}

/// `HostBridge` over the local file system.
#[derive(Debug, Default)]
pub struct FsHostBridge;

impl FsHostBridge {
    pub fn new() -> Self {
        Self
    }
}

impl HostBridge for FsHostBridge {
    fn read_file(&mut self, path: &Path) -> Result<String, HostError> {
        let content = fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
        Ok(content)
    }

    fn write_file(&mut self, path: &Path, content: &str) -> Result<(), HostError> {
        fs::write(path, content).map_err(|source| HostError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_write_ok");
        Ok(())
    }
}

pub fn has_known_extension(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match KNOWN_EXTENSION_RE.as_ref() {
        Some(re) => re.is_match(name),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_bridge_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nota.txt");
        let mut host = FsHostBridge::new();

        host.write_file(&path, "hola mundo").unwrap();
        assert_eq!(host.read_file(&path).unwrap(), "hola mundo");
    }

    #[test]
    fn test_fs_bridge_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let mut host = FsHostBridge::new();

        let err = host.read_file(&path).unwrap_err();
        assert!(matches!(err, HostError::Read { .. }));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_fs_bridge_write_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/out.txt");
        let mut host = FsHostBridge::new();

        let err = host.write_file(&path, "x").unwrap_err();
        assert!(matches!(err, HostError::Write { .. }));
    }

    #[test]
    fn test_known_extensions() {
        assert!(has_known_extension(Path::new("a.txt")));
        assert!(has_known_extension(Path::new("dir/README.MD")));
        assert!(has_known_extension(Path::new("site/index.html")));
        assert!(!has_known_extension(Path::new("image.png")));
        assert!(!has_known_extension(Path::new("Makefile")));
        assert!(!has_known_extension(Path::new("notes.txt.bak")));
    }
}
