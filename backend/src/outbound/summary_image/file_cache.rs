//! On-disk PNG cache rooted in a `cap-std` directory capability.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SummaryImageCache, SummaryImageCacheError};

const FILE_PREFIX: &str = "summary-";
const FILE_SUFFIX: &str = ".png";

/// [`SummaryImageCache`] storing `summary-<version>.png` files.
///
/// Writes land in a hidden staging file and are renamed into place, so a
/// concurrent reader sees either the old file, the new file, or nothing.
#[derive(Clone)]
pub struct FileSummaryImageCache {
    dir: Arc<Dir>,
}

impl FileSummaryImageCache {
    /// Open (creating if needed) the cache directory at `path`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn with_dir<T, F>(&self, operation: F) -> Result<T, SummaryImageCacheError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || operation(&dir))
            .await
            .map_err(|error| SummaryImageCacheError::io(error.to_string()))?
            .map_err(|error| SummaryImageCacheError::io(error.to_string()))
    }
}

fn file_name(version: &str) -> Result<String, SummaryImageCacheError> {
    let valid = !version.is_empty()
        && version
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if valid {
        Ok(format!("{FILE_PREFIX}{version}{FILE_SUFFIX}"))
    } else {
        Err(SummaryImageCacheError::io(format!(
            "invalid cache version {version:?}"
        )))
    }
}

fn is_cached_summary(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

fn ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl SummaryImageCache for FileSummaryImageCache {
    async fn load(&self, version: &str) -> Result<Option<Vec<u8>>, SummaryImageCacheError> {
        let name = file_name(version)?;
        self.with_dir(move |dir| match dir.read(&name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        })
        .await
    }

    async fn store(&self, version: &str, png: &[u8]) -> Result<(), SummaryImageCacheError> {
        let name = file_name(version)?;
        let staging = format!(".{name}.{}.tmp", Uuid::new_v4().simple());
        let png = png.to_vec();
        self.with_dir(move |dir| {
            dir.write(&staging, &png)?;
            if let Err(error) = dir.rename(&staging, dir, &name) {
                drop(dir.remove_file(&staging));
                return Err(error);
            }
            Ok(())
        })
        .await?;
        debug!(version, "summary image cached");
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), SummaryImageCacheError> {
        let removed = self
            .with_dir(|dir| {
                let mut removed = 0_usize;
                for entry in dir.entries()? {
                    let name = entry?.file_name();
                    let Some(name) = name.to_str() else { continue };
                    if is_cached_summary(name) {
                        ignore_missing(dir.remove_file(name))?;
                        removed += 1;
                    }
                }
                Ok(removed)
            })
            .await?;
        debug!(removed, "summary image cache invalidated");
        Ok(())
    }
}
