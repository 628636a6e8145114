//! Virtual filesystem abstraction over template backing stores.
//!
//! Templates can live on the local disk or inside a remote git repository.
//! [`Vfs`] gives the resolver and the renderer one read-only view over both:
//! the OS filesystem is used directly (no copying), while remote sources are
//! materialized into an in-memory [`MemoryTree`] by a shallow clone.
//!
//! A `Vfs` handle is scoped to a single resolution and owned by the component
//! that created it; it is never shared between invocations.

pub mod git;
pub mod memory;

pub use memory::MemoryTree;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Metadata for a single filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Unix permission bits (defaults on platforms without modes)
    pub mode: u32,
}

/// A single entry produced by [`Vfs::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path, addressable through the same `Vfs` handle
    pub path: PathBuf,
    /// Path relative to the walk root (empty for the root itself)
    pub rel: PathBuf,
}

/// Read-only view over a template's backing store.
#[derive(Debug, Clone)]
pub enum Vfs {
    /// The real local filesystem
    Os,
    /// An in-memory tree, typically populated from a remote clone
    Memory(MemoryTree),
}

impl Vfs {
    /// Look up metadata for a single entry.
    pub fn metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        match self {
            Vfs::Os => {
                let meta = fs::metadata(path)?;
                Ok(EntryMeta {
                    is_dir: meta.is_dir(),
                    mode: os_mode(&meta),
                })
            }
            Vfs::Memory(tree) => tree.metadata(path),
        }
    }

    /// Check whether an entry exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }

    /// Read the full contents of a file.
    pub fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self {
            Vfs::Os => fs::read(path),
            Vfs::Memory(tree) => tree.read(path),
        }
    }

    /// List the immediate children of a directory, sorted by name.
    pub fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self {
            Vfs::Os => {
                let mut children = Vec::new();
                for entry in fs::read_dir(path)? {
                    children.push(entry?.path());
                }
                children.sort();
                Ok(children)
            }
            Vfs::Memory(tree) => tree.read_dir(path),
        }
    }

    /// Enumerate every entry under `root`, including `root` itself.
    ///
    /// Entries are ordered so that a directory always precedes its
    /// descendants, which lets callers create output directories before
    /// writing the files inside them.
    pub fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
        match self {
            Vfs::Os => {
                let mut entries = vec![WalkEntry {
                    path: root.to_path_buf(),
                    rel: PathBuf::new(),
                }];
                walk_os(root, Path::new(""), &mut entries)?;
                Ok(entries)
            }
            Vfs::Memory(tree) => tree.walk(root),
        }
    }
}

fn walk_os(dir: &Path, rel: &Path, out: &mut Vec<WalkEntry>) -> io::Result<()> {
    let mut children: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let child_rel = rel.join(child.file_name());
        let child_path = child.path();
        let is_dir = child.file_type()?.is_dir();
        out.push(WalkEntry {
            path: child_path.clone(),
            rel: child_rel.clone(),
        });
        if is_dir {
            walk_os(&child_path, &child_rel, out)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn os_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn os_mode(meta: &fs::Metadata) -> u32 {
    if meta.is_dir() {
        0o755
    } else {
        0o644
    }
}
