use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ShellConfig;
use crate::error::Result;

const BUNDLED_FILESYSTEM: &str = include_str!("../data/filesystem.json");
const BUNDLED_POSTS: &str = include_str!("../data/blogposts.json");

fn default_dir_mode() -> String {
    "drwxr-xr-x".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedNode {
    pub name: String,
    #[serde(default = "default_dir_mode")]
    pub permissions: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub date: String,
    #[serde(flatten)]
    pub kind: SeedKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeedKind {
    Directory {
        #[serde(default)]
        children: Vec<SeedNode>,
    },
    File {
        #[serde(default)]
        content: Vec<String>,
    },
}

/// One blog post as supplied by the content collaborator. Size is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub name: String,
    pub date: String,
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub content: Vec<String>,
}

pub fn parse_tree(json: &str) -> Result<SeedNode> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_posts(json: &str) -> Result<Vec<PostRecord>> {
    Ok(serde_json::from_str(json)?)
}

fn read_or_bundled(path: Option<&Path>, bundled: &'static str) -> Result<String> {
    match path {
        Some(path) => {
            info!("reading seed data from {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => Ok(bundled.to_string()),
    }
}

pub fn load_tree(config: &ShellConfig) -> Result<SeedNode> {
    parse_tree(&read_or_bundled(config.seed_path.as_deref(), BUNDLED_FILESYSTEM)?)
}

pub fn load_posts(config: &ShellConfig) -> Result<Vec<PostRecord>> {
    parse_posts(&read_or_bundled(config.posts_path.as_deref(), BUNDLED_POSTS)?)
}

pub fn bundled_tree() -> Result<SeedNode> {
    parse_tree(BUNDLED_FILESYSTEM)
}

pub fn bundled_posts() -> Result<Vec<PostRecord>> {
    parse_posts(BUNDLED_POSTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_nodes() {
        let tree = parse_tree(
            r#"{"name":"/","type":"directory","children":[
                {"name":"a.txt","type":"file","permissions":"-rw-r--r--","content":["x"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(tree.permissions, "drwxr-xr-x");
        match tree.kind {
            SeedKind::Directory { children } => {
                assert_eq!(children.len(), 1);
                assert!(matches!(&children[0].kind, SeedKind::File { content } if content == &["x"]));
            }
            SeedKind::File { .. } => panic!("root parsed as file"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(parse_tree(r#"{"name":"/","type":"symlink"}"#).is_err());
    }

    #[test]
    fn posts_ignore_extra_fields() {
        let posts = parse_posts(
            r##"[{"name":"p.md","type":"file","date":"2024-10-27 02:24","permissions":"-rw-r--r--.",
                "owner":"earentir","group":"earentir","content":["# P"]}]"##,
        )
        .unwrap();
        assert_eq!(posts[0].name, "p.md");
    }

    #[test]
    fn bundled_data_is_valid() {
        let tree = bundled_tree().unwrap();
        assert!(matches!(tree.kind, SeedKind::Directory { .. }));
        assert!(!bundled_posts().unwrap().is_empty());
    }

    #[test]
    fn external_seed_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fs.json");
        std::fs::write(&path, r#"{"name":"/","type":"directory","children":[]}"#).unwrap();
        let config = ShellConfig { seed_path: Some(path), ..ShellConfig::default() };
        let tree = load_tree(&config).unwrap();
        assert!(matches!(tree.kind, SeedKind::Directory { ref children } if children.is_empty()));
    }
}
