//! Workspace enumeration and safe path resolution.
//!
//! The workspace is the agent's working directory: notes at the root,
//! grouped subtrees below it. Enumeration discovers subdirectories
//! dynamically, skipping `sessions/` and `skills/` (they have dedicated
//! tooling) and anything hidden, and follows symlinks so linked trees such
//! as `memory/knowledge/` are traversed.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions the enumerator considers viewable.
pub const ALLOWED_EXTENSIONS: &[&str] = &["md", "json", "jsonl", "txt"];

/// Directory names never descended into.
pub const SKIP_DIRS: &[&str] = &["sessions", "skills"];

/// Errors from path resolution and file reads.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File type {0} not allowed")]
    ExtensionNotAllowed(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// A viewable workspace file, as yielded by enumeration.
///
/// `path` is relative to the workspace root (logical, not resolved).
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    /// Path relative to the workspace root.
    pub path: String,
    /// File name only.
    pub name: String,
    /// Size on disk.
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    /// Grouping label: `workspace`, `memory`, `knowledge`, or the name of
    /// the top-level directory the file lives under.
    pub group: String,
}

/// An agent workspace rooted at one directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate viewable files, grouped.
    ///
    /// Root-level `*.md` files form the `workspace` group (non-recursive).
    /// The `memory/` tree is its own group except `memory/knowledge/`, which
    /// is walked separately as `knowledge`. Every other top-level directory
    /// becomes a group named after it. A missing root yields an empty list;
    /// unreadable directory entries are skipped.
    #[must_use]
    pub fn scan(&self) -> Vec<FileEntry> {
        let mut files = Vec::new();
        if !self.root.exists() {
            return files;
        }

        let mut top_level: Vec<PathBuf> = fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .collect()
            })
            .unwrap_or_default();
        top_level.sort();

        // Root-level markdown notes.
        for path in &top_level {
            if path.is_file()
                && !is_hidden(path)
                && extension_of(path).as_deref() == Some("md")
                && let Some(entry) = self.entry_for(path, "workspace")
            {
                files.push(entry);
            }
        }

        // Grouped subtrees.
        for path in &top_level {
            if !path.is_dir() || is_hidden(path) {
                continue;
            }
            let Some(dir_name) = file_name_of(path) else {
                continue;
            };
            if SKIP_DIRS.contains(&dir_name.as_str()) {
                continue;
            }

            if dir_name == "memory" {
                files.extend(self.walk_group(path, "memory", true));
                files.extend(self.walk_group(&path.join("knowledge"), "knowledge", false));
            } else {
                files.extend(self.walk_group(path, &dir_name, false));
            }
        }

        files
    }

    /// Resolve a user-supplied relative path inside the workspace.
    ///
    /// The check is logical (no symlink resolution): `..` components and
    /// absolute paths are rejected, while symlinks inside the workspace keep
    /// working.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::PathTraversal`] if the path would escape
    /// the root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, WorkspaceError> {
        let rel = Path::new(relative);
        if rel.as_os_str().is_empty() || rel.is_absolute() {
            return Err(WorkspaceError::PathTraversal(relative.to_string()));
        }
        for component in rel.components() {
            if matches!(component, Component::ParentDir) {
                return Err(WorkspaceError::PathTraversal(relative.to_string()));
            }
        }
        Ok(self.root.join(rel))
    }

    /// Read one viewable file by its workspace-relative path.
    ///
    /// # Errors
    ///
    /// Rejects traversal, missing files, and non-viewable extensions;
    /// surfaces I/O failures.
    pub fn read_file(&self, relative: &str) -> Result<String, WorkspaceError> {
        let full = self.resolve(relative)?;

        if !full.is_file() {
            return Err(WorkspaceError::NotFound(relative.to_string()));
        }

        let allowed = extension_of(&full)
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        if !allowed {
            let ext = extension_of(&full).unwrap_or_default();
            return Err(WorkspaceError::ExtensionNotAllowed(format!(".{ext}")));
        }

        fs::read_to_string(&full).map_err(|source| WorkspaceError::Read {
            path: relative.to_string(),
            source,
        })
    }

    /// Walk one subtree, collecting viewable files under a group label.
    fn walk_group(&self, base: &Path, group: &str, skip_knowledge: bool) -> Vec<FileEntry> {
        let mut out = Vec::new();
        if !base.exists() {
            return out;
        }

        let walker = WalkDir::new(base)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if name.starts_with('.') {
                    return false;
                }
                if entry.file_type().is_dir() {
                    if SKIP_DIRS.contains(&name.as_ref()) {
                        return false;
                    }
                    if skip_knowledge && name == "knowledge" {
                        return false;
                    }
                }
                true
            });

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let viewable = extension_of(entry.path())
                .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
            if !viewable {
                continue;
            }
            if let Some(file) = self.entry_for(entry.path(), group) {
                out.push(file);
            }
        }

        out
    }

    /// Build a [`FileEntry`] for an on-disk path, relative to the root.
    fn entry_for(&self, path: &Path, group: &str) -> Option<FileEntry> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let name = file_name_of(path)?;
        let size_bytes = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);

        Some(FileEntry {
            path: rel.to_string_lossy().into_owned(),
            name,
            size_bytes,
            group: group.to_string(),
        })
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

fn is_hidden(path: &Path) -> bool {
    file_name_of(path).is_some_and(|name| name.starts_with('.'))
}
