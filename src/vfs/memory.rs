//! In-memory filesystem tree.
//!
//! Backs the [`Vfs::Memory`](super::Vfs::Memory) variant. Remote template
//! sources are cloned into a scratch directory and loaded into one of these
//! trees so the rest of the engine never touches the transport again.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{EntryMeta, WalkEntry};

const DEFAULT_DIR_MODE: u32 = 0o755;
#[cfg(not(unix))]
const DEFAULT_FILE_MODE: u32 = 0o644;

/// A single node in the tree.
#[derive(Debug, Clone)]
enum MemoryNode {
    Dir { mode: u32 },
    File { mode: u32, data: Vec<u8> },
}

/// An immutable-after-load, in-memory directory tree.
///
/// Paths are stored relative to the tree root. The root itself is addressed
/// as `"."` or the empty path and always exists as a directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    nodes: BTreeMap<PathBuf, MemoryNode>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tree from a directory on disk, skipping `.git` directories.
    pub fn from_disk(root: &Path) -> io::Result<Self> {
        let mut tree = Self::new();
        tree.load_dir(root, Path::new(""))?;
        Ok(tree)
    }

    /// Add a directory entry, creating missing parents with default modes.
    pub fn add_dir(&mut self, path: impl AsRef<Path>, mode: u32) {
        let path = normalize(path.as_ref());
        self.ensure_parents(&path);
        self.nodes.insert(path, MemoryNode::Dir { mode });
    }

    /// Add a file entry, creating missing parents with default modes.
    pub fn add_file(&mut self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>, mode: u32) {
        let path = normalize(path.as_ref());
        self.ensure_parents(&path);
        self.nodes.insert(
            path,
            MemoryNode::File {
                mode,
                data: data.into(),
            },
        );
    }

    pub(super) fn metadata(&self, path: &Path) -> io::Result<EntryMeta> {
        let path = normalize(path);
        if path.as_os_str().is_empty() {
            return Ok(EntryMeta {
                is_dir: true,
                mode: DEFAULT_DIR_MODE,
            });
        }
        match self.nodes.get(&path) {
            Some(MemoryNode::Dir { mode }) => Ok(EntryMeta {
                is_dir: true,
                mode: *mode,
            }),
            Some(MemoryNode::File { mode, .. }) => Ok(EntryMeta {
                is_dir: false,
                mode: *mode,
            }),
            None => Err(not_found(&path)),
        }
    }

    pub(super) fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(MemoryNode::File { data, .. }) => Ok(data.clone()),
            Some(MemoryNode::Dir { .. }) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            None => Err(not_found(&path)),
        }
    }

    pub(super) fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let path = normalize(path);
        if !path.as_os_str().is_empty() && !matches!(self.nodes.get(&path), Some(MemoryNode::Dir { .. })) {
            return Err(not_found(&path));
        }
        Ok(self
            .nodes
            .keys()
            .filter(|k| k.parent() == Some(path.as_path()))
            .cloned()
            .collect())
    }

    pub(super) fn walk(&self, root: &Path) -> io::Result<Vec<WalkEntry>> {
        let nroot = normalize(root);
        // Fail early so callers see the same error an OS walk would produce
        self.metadata(&nroot)?;

        let mut entries = vec![WalkEntry {
            path: root.to_path_buf(),
            rel: PathBuf::new(),
        }];
        for key in self.nodes.keys() {
            let rel = if nroot.as_os_str().is_empty() {
                key.clone()
            } else if let Ok(stripped) = key.strip_prefix(&nroot) {
                if stripped.as_os_str().is_empty() {
                    continue;
                }
                stripped.to_path_buf()
            } else {
                continue;
            };
            entries.push(WalkEntry {
                path: key.clone(),
                rel,
            });
        }
        Ok(entries)
    }

    fn ensure_parents(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            if parent.as_os_str().is_empty() || self.nodes.contains_key(parent) {
                return;
            }
            let parent = parent.to_path_buf();
            self.ensure_parents(&parent);
            self.nodes.insert(
                parent,
                MemoryNode::Dir {
                    mode: DEFAULT_DIR_MODE,
                },
            );
        }
    }

    fn load_dir(&mut self, disk_dir: &Path, rel: &Path) -> io::Result<()> {
        let mut children: Vec<_> = fs::read_dir(disk_dir)?.collect::<io::Result<Vec<_>>>()?;
        children.sort_by_key(|entry| entry.file_name());

        for child in children {
            let name = child.file_name();
            if name == ".git" {
                continue;
            }
            let meta = child.metadata()?;
            let child_rel = rel.join(&name);
            if meta.is_dir() {
                self.add_dir(&child_rel, disk_mode(&meta, true));
                self.load_dir(&child.path(), &child_rel)?;
            } else {
                let data = fs::read(child.path())?;
                self.add_file(&child_rel, data, disk_mode(&meta, false));
            }
        }
        Ok(())
    }
}

/// Strip `.` components so `./foo`, `foo` and `foo/.` address the same node.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such entry: {}", path.display()),
    )
}

#[cfg(unix)]
fn disk_mode(meta: &fs::Metadata, _is_dir: bool) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn disk_mode(_meta: &fs::Metadata, is_dir: bool) -> u32 {
    if is_dir {
        DEFAULT_DIR_MODE
    } else {
        DEFAULT_FILE_MODE
    }
}
