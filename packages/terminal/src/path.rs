//! Workspace confinement.
//!
//! Every path that reaches the filesystem is built here from user input.
//! Resolution is purely lexical and never fails: anything that would land
//! outside the workspace root is pulled back inside it.

use std::path::{Component, Path, PathBuf};

/// Root of the path shown to clients in place of the real workspace location.
pub const VIRTUAL_ROOT: &str = "/workspace";

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` must be absolute and already normalized.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True if `path` is the root or lies beneath it.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve `user_path` against `cwd`, confined to the root.
    ///
    /// An absolute path outside the root is reinterpreted as a child of the
    /// root named after its last component. A relative path that climbs out
    /// of the root is clamped to the root itself.
    pub fn resolve(&self, cwd: &Path, user_path: &str) -> PathBuf {
        if user_path.is_empty() {
            return cwd.to_path_buf();
        }

        if Path::new(user_path).is_absolute() {
            let normalized = normalize_path(Path::new(user_path));
            if self.contains(&normalized) {
                return normalized;
            }
            return match basename(user_path) {
                "" | "." | ".." => self.root.clone(),
                name => self.root.join(name),
            };
        }

        let normalized = normalize_path(&cwd.join(user_path));
        if self.contains(&normalized) {
            normalized
        } else {
            self.root.clone()
        }
    }

    /// Client-facing rendering of a confined path: `/workspace` for the root,
    /// `/workspace/<rel>` below it.
    pub fn virtual_path(&self, path: &Path) -> String {
        let rel = match path.strip_prefix(&self.root) {
            Ok(rel) => rel,
            Err(_) => return VIRTUAL_ROOT.to_string(),
        };
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            VIRTUAL_ROOT.to_string()
        } else {
            format!("{VIRTUAL_ROOT}/{}", parts.join("/"))
        }
    }
}

/// Normalize a path by resolving `.` and `..` segments without touching the
/// filesystem. `..` above the filesystem root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Text after the final `/`.
fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
