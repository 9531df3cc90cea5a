use regex::{Regex, RegexBuilder};

use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::vfs::{NodeId, NodeKind, VirtualFileSystem};

const USAGE: &str = "Usage: grep [-r] [-i] <pattern> <file|directory>";

pub struct GrepCommand;

fn search_lines(prefix: &str, content: &[String], regex: &Regex, matches: &mut Vec<String>) {
    for (i, line) in content.iter().enumerate() {
        if regex.is_match(line) {
            matches.push(format!("{}:{}:{}", prefix, i + 1, line));
        }
    }
}

/// Depth first, children in stored order. Each match carries the path built so far.
fn search_dir(vfs: &VirtualFileSystem, dir: NodeId, base: &str, regex: &Regex, matches: &mut Vec<String>) {
    for &child in vfs.node(dir).children() {
        let entry = vfs.node(child);
        let entry_path = format!("{}/{}", base, entry.name);
        match &entry.kind {
            NodeKind::File { content } => search_lines(&entry_path, content, regex, matches),
            NodeKind::Directory { .. } => search_dir(vfs, child, &entry_path, regex, matches),
        }
    }
}

impl Command for GrepCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        let mut recursive = false;
        let mut case_insensitive = false;
        let mut start = 0;
        while start < args.len() && args[start].starts_with('-') {
            for flag in args[start].chars().skip(1) {
                match flag {
                    'r' => recursive = true,
                    'i' => case_insensitive = true,
                    _ => {}
                }
            }
            start += 1;
        }
        if args.len() < start + 2 {
            return Err(ShellError::usage(USAGE));
        }

        let pattern = &args[start];
        // paths with spaces may arrive split, glue them back
        let target = args[start + 1..].join(" ");

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| ShellError::InvalidPattern { pattern: pattern.clone(), source })?;

        let id = ctx
            .resolve_path(&target)
            .ok_or_else(|| ShellError::not_found(format!("grep: {target}"), "No such file or directory"))?;

        let vfs = &ctx.vfs;
        let node = vfs.node(id);
        let mut matches = Vec::new();
        match &node.kind {
            NodeKind::File { content } => search_lines(&node.name, content, &regex, &mut matches),
            NodeKind::Directory { .. } if recursive => search_dir(vfs, id, &target, &regex, &mut matches),
            NodeKind::Directory { .. } => {
                return Err(ShellError::wrong_kind(
                    format!("grep: {target}"),
                    "Is a directory. Use -r to search directories recursively.",
                ))
            }
        }

        if matches.is_empty() {
            Ok(CommandOutput::None)
        } else {
            Ok(CommandOutput::Lines(matches))
        }
    }
}
