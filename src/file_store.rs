use crate::error::FileStoreError;
use crate::header::CONTENT_LENGTH;
use crate::request::Request;
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

type Result<T> = std::result::Result<T, FileStoreError>;

/// Files served from and uploaded into the configured root directory.
///
/// Concurrent reads and writes of the same name are not coordinated: the last
/// writer wins and a reader may observe a partial write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: Option<PathBuf>,
}

impl FileStore {
    pub fn new(root: Option<PathBuf>) -> Self {
        FileStore { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Only a single plain file name directly under the root is accepted.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let Some(root) = &self.root else {
            return Err(FileStoreError::NoRoot);
        };

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(root.join(name)),
            _ => Err(FileStoreError::InvalidName(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        debug!("Reading file {}", path.display());

        Ok(fs::read(path)?)
    }

    /// Writes exactly `content-length` bytes of the request body to `name`,
    /// replacing any existing file. Nothing is created unless the body holds
    /// at least that many bytes.
    pub fn put(&self, name: &str, request: &Request) -> Result<()> {
        let path = self.resolve(name)?;

        let declared = match request.content_length() {
            None => return Err(FileStoreError::MissingContentLength),
            Some(Err(_)) => {
                let value = request.header(CONTENT_LENGTH).unwrap_or_default();
                return Err(FileStoreError::InvalidContentLength(value.to_string()));
            }
            Some(Ok(declared)) => declared,
        };

        let available = request.body.len();
        let body = request
            .body
            .get(..declared)
            .ok_or(FileStoreError::TruncatedBody {
                declared,
                available,
            })?;

        debug!("Writing {} bytes to {}", body.len(), path.display());
        let mut file = fs::File::create(path)?;
        file.write_all(body)?;

        Ok(())
    }
}
