//! Filesystem primitives used by HEAD resolution
//!
//! Branch resolution only ever needs a handful of read-only operations on the
//! git directory. They sit behind the [`FileStat`] trait so that the resolver can
//! be driven by the real filesystem ([`LocalFileStat`]) or by an instrumented
//! wrapper ([`CountingFileStat`]) that records how often HEAD was actually read.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

/// Read-only view of the filesystem needed to resolve HEAD
pub trait FileStat: Send + Sync {
    /// Modification time of `path`, following symlinks
    fn stat(&self, path: &Path) -> io::Result<SystemTime>;

    /// Whether `path` itself is a symbolic link (not followed)
    fn is_symlink(&self, path: &Path) -> bool;

    /// Whether `path` resolves to a regular file
    fn is_regular_file(&self, path: &Path) -> bool;

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Canonical absolute path with every symlink and `..` resolved
    fn real_path(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`FileStat`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStat;

impl FileStat for LocalFileStat {
    fn stat(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|metadata| metadata.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }
}

/// Decorator counting calls to [`FileStat::read_all`]
///
/// Lets callers observe whether a resolution was served from the cache.
#[derive(Debug, Default)]
pub struct CountingFileStat<F: FileStat> {
    inner: F,
    reads: AtomicUsize,
}

impl<F: FileStat> CountingFileStat<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl<F: FileStat> FileStat for CountingFileStat<F> {
    fn stat(&self, path: &Path) -> io::Result<SystemTime> {
        self.inner.stat(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.inner.is_symlink(path)
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        self.inner.is_regular_file(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_all(path)
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        self.inner.real_path(path)
    }
}

// `Arc<CountingFileStat<_>>` is shared between a resolver and the test observing it
impl<T: FileStat + ?Sized> FileStat for std::sync::Arc<T> {
    fn stat(&self, path: &Path) -> io::Result<SystemTime> {
        (**self).stat(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        (**self).is_symlink(path)
    }

    fn is_regular_file(&self, path: &Path) -> bool {
        (**self).is_regular_file(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read_all(path)
    }

    fn real_path(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).real_path(path)
    }
}
