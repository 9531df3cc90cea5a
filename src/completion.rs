use log::debug;

use crate::command::CommandRegistry;
use crate::context::TerminalContext;
use crate::parser::escape_spaces;
use crate::vfs::NodeId;

/// Which entries a path completion offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryFilter {
    Directories,
    Files,
    Any,
}

impl EntryFilter {
    fn for_command(command: &str) -> Self {
        match command {
            "cd" => EntryFilter::Directories,
            "cat" => EntryFilter::Files,
            _ => EntryFilter::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPress {
    Single,
    Double,
}

/// Turns raw key presses into single or double presses. Two presses within
/// `window_ms` make a double; the press after a double starts over.
#[derive(Debug, Clone)]
pub struct TabTracker {
    window_ms: u64,
    last_ms: Option<u64>,
    count: u8,
}

impl TabTracker {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, last_ms: None, count: 0 }
    }

    pub fn press(&mut self, now_ms: u64) -> TabPress {
        let quick = self
            .last_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.window_ms);
        self.last_ms = Some(now_ms);
        if quick {
            self.count += 1;
        } else {
            self.count = 1;
        }
        if self.count == 2 {
            self.count = 0;
            TabPress::Double
        } else {
            TabPress::Single
        }
    }
}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// New buffer, cursor as a character offset.
    Edit { buffer: String, cursor: usize },
    /// Candidates to print; the buffer stays as it is.
    Listing(String),
    Unchanged,
}

/// Byte offset where the token under completion starts: right after the last space
/// that is not backslash-escaped.
fn partial_start(before: &str) -> usize {
    let mut start = 0;
    let mut escaping = false;
    for (i, c) in before.char_indices() {
        if escaping {
            escaping = false;
        } else if c == '\\' {
            escaping = true;
        } else if c == ' ' {
            start = i + 1;
        }
    }
    start
}

fn unescape(text: &str) -> String {
    text.replace("\\ ", " ")
}

/// Longest prefix shared by every suggestion. Starts from the first one and drops
/// characters from its end until all others start with it.
pub fn common_prefix(suggestions: &[String]) -> String {
    let Some(first) = suggestions.first() else {
        return String::new();
    };
    let mut prefix = first.clone();
    while !prefix.is_empty() && !suggestions.iter().all(|s| s.starts_with(prefix.as_str())) {
        prefix.pop();
    }
    prefix
}

/// Directory a typed path prefix (everything up to and including the last `/`)
/// points at. An empty prefix is the current directory.
fn prefix_dir(ctx: &TerminalContext, dir_part: &str) -> Option<NodeId> {
    if dir_part.is_empty() {
        return Some(ctx.cwd_node());
    }
    ctx.resolve_path(&unescape(dir_part)).filter(|&id| ctx.vfs.node(id).is_dir())
}

fn split_path(partial: &str) -> (&str, &str) {
    match partial.rfind('/') {
        Some(i) => partial.split_at(i + 1),
        None => ("", partial),
    }
}

/// Executable files for a `./` token, keeping any typed subdirectory.
fn executable_suggestions(ctx: &TerminalContext, partial: &str) -> Vec<String> {
    let rest = &partial[2..];
    let (dir_part, name_part) = split_path(rest);
    let name_part = unescape(name_part);
    let Some(dir) = prefix_dir(ctx, dir_part) else {
        return Vec::new();
    };
    let mut out: Vec<String> = ctx
        .vfs
        .node(dir)
        .children()
        .iter()
        .map(|&id| ctx.vfs.node(id))
        .filter(|entry| entry.is_file() && entry.is_executable() && entry.name.starts_with(&name_part))
        .map(|entry| format!("./{}{}", dir_part, escape_spaces(&entry.name)))
        .collect();
    out.sort();
    out
}

fn path_suggestions(ctx: &TerminalContext, partial: &str, filter: EntryFilter) -> Vec<String> {
    let (dir_part, name_part) = split_path(partial);
    let name_part = unescape(name_part);
    let Some(dir) = prefix_dir(ctx, dir_part) else {
        return Vec::new();
    };
    let mut out: Vec<String> = ctx
        .vfs
        .node(dir)
        .children()
        .iter()
        .map(|&id| ctx.vfs.node(id))
        .filter(|entry| entry.name.starts_with(&name_part))
        .filter(|entry| match filter {
            EntryFilter::Directories => entry.is_dir(),
            EntryFilter::Files => entry.is_file(),
            EntryFilter::Any => true,
        })
        .map(|entry| {
            let slash = if entry.is_dir() { "/" } else { "" };
            format!("{}{}{}", dir_part, escape_spaces(&entry.name), slash)
        })
        .collect();
    out.sort();
    out
}

/// Candidates for the token ending at the end of `before`.
pub fn suggest(ctx: &TerminalContext, registry: &CommandRegistry, before: &str) -> Vec<String> {
    let start = partial_start(before);
    let partial = &before[start..];
    let command = before[..start].split_whitespace().next();

    if partial.starts_with("./") {
        return executable_suggestions(ctx, partial);
    }
    match command {
        None => registry.completions(partial),
        Some(command) => path_suggestions(ctx, partial, EntryFilter::for_command(command)),
    }
}

/// Last path component of a suggestion, keeping a directory's trailing `/`.
fn final_component(suggestion: &str) -> &str {
    let trimmed = suggestion.strip_suffix('/').unwrap_or(suggestion);
    match trimmed.rfind('/') {
        Some(i) => &suggestion[i + 1..],
        None => suggestion,
    }
}

/// Complete `buffer` at `cursor` (a character offset, clamped to the buffer).
pub fn complete(
    ctx: &TerminalContext,
    registry: &CommandRegistry,
    buffer: &str,
    cursor: usize,
    press: TabPress,
) -> Completion {
    let split = buffer.char_indices().nth(cursor).map_or(buffer.len(), |(i, _)| i);
    let (before, after) = buffer.split_at(split);
    let suggestions = suggest(ctx, registry, before);
    debug!("completing {before:?}: {} candidates", suggestions.len());

    if suggestions.is_empty() {
        return Completion::Unchanged;
    }

    if press == TabPress::Double {
        let names: Vec<&str> = suggestions.iter().map(|s| final_component(s)).collect();
        return Completion::Listing(names.join("  "));
    }

    let start = partial_start(before);
    let partial = &before[start..];
    let replacement = if let [only] = suggestions.as_slice() {
        if only.ends_with('/') {
            only.clone()
        } else {
            format!("{only} ")
        }
    } else {
        let prefix = common_prefix(&suggestions);
        if prefix.chars().count() <= partial.chars().count() {
            return Completion::Unchanged;
        }
        prefix
    };

    let head = &before[..start];
    let cursor = head.chars().count() + replacement.chars().count();
    Completion::Edit { buffer: format!("{head}{replacement}{after}"), cursor }
}
