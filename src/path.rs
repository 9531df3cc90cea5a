// resolution walks a copy of the segments, callers decide whether to commit

use log::debug;

use crate::context::{home_segments, TerminalContext};
use crate::vfs::{NodeId, VirtualFileSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    NotFound,
    /// Resolved to a file where only a directory will do.
    NotADirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub node: NodeId,
    /// Absolute segments of `node`, starting with `/`.
    pub segments: Vec<String>,
}

/// Resolve `path` from `cwd`. `~` and `~/...` start at `/home/<user>`, a leading `/` at
/// the root. `.` is skipped and `..` drops one segment (never above the root). Every
/// component must name a directory except the last, which may be a file.
pub fn resolve(
    vfs: &VirtualFileSystem,
    cwd: &[String],
    user: &str,
    path: &str,
) -> Result<Resolution, ResolveError> {
    let (mut segments, rest) = if path.starts_with('/') {
        (vec!["/".to_string()], path)
    } else if path == "~" || path.starts_with("~/") {
        (home_segments(user), &path[1..])
    } else {
        (cwd.to_vec(), path)
    };

    let mut dir = vfs.lookup_dir(&segments).ok_or(ResolveError::NotFound)?;
    let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
    for (i, part) in parts.iter().enumerate() {
        match *part {
            "." => {}
            ".." => {
                if segments.len() > 1 {
                    segments.pop();
                }
                dir = vfs.lookup_dir(&segments).ok_or(ResolveError::NotFound)?;
            }
            name => {
                let child = vfs.child(dir, name).ok_or(ResolveError::NotFound)?;
                segments.push(name.to_string());
                if vfs.node(child).is_dir() {
                    dir = child;
                } else if i == parts.len() - 1 {
                    return Ok(Resolution { node: child, segments });
                } else {
                    return Err(ResolveError::NotFound);
                }
            }
        }
    }
    Ok(Resolution { node: dir, segments })
}

impl TerminalContext {
    /// Resolve without touching the session. An empty path is the current directory.
    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let resolved = resolve(&self.vfs, self.cwd(), self.user(), path).ok()?;
        debug!("resolved '{path}' to {}", self.vfs.absolute_path(resolved.node));
        Some(resolved.node)
    }

    /// Resolve a directory and make it the current one. A file target is an error
    /// and leaves the session as it was.
    pub fn change_dir(&mut self, path: &str) -> Result<NodeId, ResolveError> {
        let resolved = resolve(&self.vfs, self.cwd(), self.user(), path)?;
        if !self.vfs.node(resolved.node).is_dir() {
            return Err(ResolveError::NotADirectory);
        }
        self.set_cwd(resolved.segments);
        Ok(resolved.node)
    }
}
