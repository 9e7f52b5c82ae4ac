//! Filesystem capability
//!
//! The resolver only sees the filesystem through [`FileSystem`], so tests can
//! swap in an in-memory tree.

use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncRead;

/// Facts the resolver needs about a path, plus a way to open it
#[allow(async_fn_in_trait)]
pub trait FileSystem {
    /// Byte stream returned by [`FileSystem::open`]
    type Body: AsyncRead + Unpin;

    async fn exists(&self, path: &Path) -> bool;

    async fn is_file(&self, path: &Path) -> bool;

    async fn size(&self, path: &Path) -> io::Result<u64>;

    async fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>>;

    async fn open(&self, path: &Path) -> io::Result<Self::Body>;
}

/// The real filesystem, via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    type Body = fs::File;

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    async fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    async fn modified(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let modified = fs::metadata(path).await?.modified()?;
        Ok(DateTime::<Utc>::from(modified))
    }

    async fn open(&self, path: &Path) -> io::Result<Self::Body> {
        fs::File::open(path).await
    }
}
