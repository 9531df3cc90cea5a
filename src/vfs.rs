// arena of nodes, parent links are plain indices

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error, info};

use crate::error::{Result, ShellError};
use crate::seed::{PostRecord, SeedKind, SeedNode};

/// Size `ls` reports for every directory.
pub const DIRECTORY_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Directory { children: Vec<NodeId> },
    File { content: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct VfsNode {
    pub name: String,
    /// `ls -l` style mode string, e.g. `-rwxr-xr-x`.
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub date: String,
    parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl VfsNode {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The user execute bit sits at index 3 of the mode string.
    pub fn is_executable(&self) -> bool {
        self.permissions.chars().nth(3) == Some('x')
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn content(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Size as listed by `ls`: fixed for directories, derived from content for files.
    pub fn size(&self) -> usize {
        match &self.kind {
            NodeKind::Directory { .. } => DIRECTORY_SIZE,
            NodeKind::File { content } => file_size(content),
        }
    }

    /// Name with a `/` suffix for directories.
    pub fn display_name(&self) -> String {
        if self.is_dir() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }
}

/// Every line counts its characters plus one for the newline.
pub fn file_size(content: &[String]) -> usize {
    content.iter().map(|line| line.chars().count() + 1).sum()
}

/// Parse the display date of a node into something sortable.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Clone)]
pub struct VirtualFileSystem {
    nodes: Vec<VfsNode>,
}

impl VirtualFileSystem {
    /// Build the arena from a seed tree, assigning every parent link in one
    /// depth-first pass.
    pub fn from_seed(seed: SeedNode) -> Result<Self> {
        if !matches!(seed.kind, SeedKind::Directory { .. }) {
            return Err(ShellError::Seed("root of the seed must be a directory".to_string()));
        }
        let mut vfs = Self { nodes: Vec::new() };
        let mut stack = vec![(seed, None::<NodeId>)];
        while let Some((seed, parent)) = stack.pop() {
            let SeedNode { name, permissions, owner, group, date, kind } = seed;
            let name = if parent.is_none() { "/".to_string() } else { name };
            let (kind, pending) = match kind {
                SeedKind::Directory { children } => {
                    (NodeKind::Directory { children: Vec::new() }, children)
                }
                SeedKind::File { content } => (NodeKind::File { content }, Vec::new()),
            };
            let id = vfs.push(VfsNode { name, permissions, owner, group, date, parent, kind })?;
            // Reverse so children come off the stack in seed order.
            for child in pending.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }
        debug!("built vfs with {} nodes", vfs.nodes.len());
        Ok(vfs)
    }

    fn push(&mut self, node: VfsNode) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            if self.child(parent, &node.name).is_some() {
                return Err(ShellError::Seed(format!(
                    "duplicate entry '{}' in '{}'",
                    node.name,
                    self.absolute_path(parent)
                )));
            }
            match &mut self.nodes[parent.0].kind {
                NodeKind::Directory { children } => children.push(id),
                NodeKind::File { .. } => {
                    return Err(ShellError::Seed(format!("'{}' has a file as parent", node.name)))
                }
            }
        }
        self.nodes.push(node);
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &VfsNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `dir` with exactly this name, of either kind.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir)
            .children()
            .iter()
            .copied()
            .find(|&id| self.node(id).name == name)
    }

    pub fn child_dir(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.child(dir, name).filter(|&id| self.node(id).is_dir())
    }

    /// Walk a segment sequence (`["/", "home", ...]`) through directories only.
    pub fn lookup_dir(&self, segments: &[String]) -> Option<NodeId> {
        segments
            .iter()
            .skip(1)
            .try_fold(self.root(), |dir, name| self.child_dir(dir, name))
    }

    /// Rebuild the segment sequence of a node by walking parent links.
    pub fn segments_of(&self, id: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node(cur);
            if node.parent.is_none() {
                break;
            }
            segments.push(node.name.clone());
            current = node.parent;
        }
        segments.push("/".to_string());
        segments.reverse();
        segments
    }

    pub fn absolute_path(&self, id: NodeId) -> String {
        let segments = self.segments_of(id);
        format!("/{}", segments[1..].join("/"))
    }

    /// Append blog posts as files of `/home/<user>/blog`. Returns how many were added;
    /// a missing target directory is logged and leaves the tree untouched.
    pub fn ingest_posts(&mut self, user: &str, posts: Vec<PostRecord>) -> usize {
        let target = ["/", "home", user, "blog"].map(String::from);
        let Some(blog) = self.lookup_dir(&target) else {
            error!("blog directory /home/{user}/blog not found in the filesystem");
            return 0;
        };
        let mut added = 0;
        for post in posts {
            let name = post.name.clone();
            let node = VfsNode {
                name: post.name,
                permissions: post.permissions,
                owner: post.owner,
                group: post.group,
                date: post.date,
                parent: Some(blog),
                kind: NodeKind::File { content: post.content },
            };
            match self.push(node) {
                Ok(_) => added += 1,
                Err(e) => error!("skipping blog post '{name}': {e}"),
            }
        }
        info!("ingested {added} blog posts into /home/{user}/blog");
        added
    }
}
