use std::cmp::Ordering;

use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::vfs::{NodeId, VfsNode};

pub struct LsCommand;

#[derive(Debug, Default, Clone, Copy)]
struct LsFlags {
    all: bool,
    long: bool,
    sizes: bool,
}

fn parse_flags(args: &[String]) -> LsFlags {
    let mut flags = LsFlags::default();
    for arg in args {
        if arg.starts_with('-') && arg.len() > 1 {
            for c in arg.chars().skip(1) {
                match c {
                    'a' => flags.all = true,
                    'l' => flags.long = true,
                    's' => flags.sizes = true,
                    _ => {} // unknown flags are ignored
                }
            }
        }
    }
    flags
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Directories first, then by name.
fn type_then_name(a: &VfsNode, b: &VfsNode) -> Ordering {
    b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name))
}

/// Newest first; undated entries sink to the end.
fn newest_first(a: &VfsNode, b: &VfsNode) -> Ordering {
    b.timestamp().cmp(&a.timestamp())
}

impl LsCommand {
    /// Format one target: a directory's entries, or a file on its own.
    fn listing(&self, ctx: &TerminalContext, target: NodeId, flags: LsFlags) -> Vec<String> {
        let vfs = &ctx.vfs;
        let node = vfs.node(target);
        let mut entries: Vec<&VfsNode> = if node.is_dir() {
            node.children().iter().map(|&id| vfs.node(id)).collect()
        } else {
            vec![node]
        };
        if !flags.all {
            entries.retain(|entry| !is_hidden(&entry.name));
        }

        // Blog listings replace the usual order entirely.
        if node.name == "blog" || ctx.formatted_path().ends_with("/blog") {
            entries.sort_by(|a, b| newest_first(a, b));
        } else {
            entries.sort_by(|a, b| type_then_name(a, b));
        }

        if flags.long || flags.sizes {
            let total: usize = entries.iter().map(|entry| entry.size()).sum();
            let mut lines = vec![format!("total {total}")];
            for entry in &entries {
                if flags.long {
                    lines.push(format!(
                        "{} 1 {} {} {:>6} {} {}",
                        entry.permissions,
                        entry.owner,
                        entry.group,
                        entry.size(),
                        entry.date,
                        entry.display_name()
                    ));
                } else {
                    lines.push(format!("{:>6} {}", entry.size(), entry.name));
                }
            }
            lines
        } else {
            let names: Vec<String> = entries.iter().map(|entry| entry.display_name()).collect();
            vec![names.join("  ")]
        }
    }
}

impl Command for LsCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        let flags = parse_flags(args);
        let paths: Vec<&String> = args.iter().filter(|arg| !arg.starts_with('-')).collect();

        if paths.is_empty() {
            let lines = self.listing(ctx, ctx.cwd_node(), flags);
            return Ok(CommandOutput::Lines(lines));
        }

        let mut output = Vec::new();
        for (index, path) in paths.iter().enumerate() {
            match ctx.resolve_path(path) {
                None => output.push(
                    ShellError::not_found(format!("ls: cannot access '{path}'"), "No such file or directory")
                        .to_string(),
                ),
                Some(target) => {
                    if paths.len() > 1 {
                        output.push(format!("{path}:"));
                    }
                    output.extend(self.listing(ctx, target, flags));
                }
            }
            if index < paths.len() - 1 {
                output.push(String::new());
            }
        }
        Ok(CommandOutput::Lines(output))
    }
}
