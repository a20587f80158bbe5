//! Loading and saving buffers.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editor::Buffer;

/// Failures reported by a [`Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("buffer has no file name")]
    NoPath,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },
}

/// Where buffer content lives between sessions.
pub trait Store {
    /// Load the buffer stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content exists but cannot be read or decoded.
    fn load(&self, path: &Path) -> Result<Buffer, StoreError>;

    /// Persist `buffer`'s content at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be written.
    fn save(&self, buffer: &Buffer, path: &Path) -> Result<(), StoreError>;
}

/// A [`Store`] backed by UTF-8 files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl Store for FileStore {
    fn load(&self, path: &Path) -> Result<Buffer, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Buffer::empty().with_path(path));
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let text = String::from_utf8(bytes).map_err(|_| StoreError::Encoding {
            path: path.to_path_buf(),
        })?;
        Ok(Buffer::from_text(&text).with_path(path))
    }

    fn save(&self, buffer: &Buffer, path: &Path) -> Result<(), StoreError> {
        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            buffer.content().write_to(&mut writer)?;
            writer.flush()
        };
        write().map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
