// scripts run one command per line, like a batch file

use log::debug;

use crate::command::{CommandOutput, CommandRegistry, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::parser::parse_input;
use crate::vfs::NodeId;

/// Execute the file at `id`. The first line must be the configured shebang; every
/// other non-blank line that is not a `#` comment goes through the command table.
/// Errors of individual lines become part of the output and do not stop the script.
pub fn run_script(id: NodeId, ctx: &mut TerminalContext, registry: &CommandRegistry) -> CommandResult {
    let node = ctx.vfs.node(id);
    let name = node.name.clone();
    if !node.is_executable() {
        return Err(ShellError::PermissionDenied(name));
    }
    let lines = node.content().map(<[String]>::to_vec).unwrap_or_default();
    match lines.first() {
        Some(first) if first.trim() == ctx.config.shebang => {}
        _ => return Err(ShellError::NotAScript(name)),
    }
    debug!("running script {name} ({} lines)", lines.len());

    let mut parts = Vec::new();
    let mut pending = Vec::new();
    for line in lines.iter().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let args = parse_input(line);
        let Some((cmd, rest)) = args.split_first() else {
            continue;
        };
        let result = registry.dispatch(cmd, rest, ctx).unwrap_or_else(|e| CommandOutput::Text(e.to_string()));
        match result.plain_lines() {
            Ok(lines) => pending.extend(lines),
            Err(display) => {
                flush_text(&mut pending, &mut parts);
                parts.push(display);
            }
        }
    }
    flush_text(&mut pending, &mut parts);

    Ok(match parts.len() {
        0 => CommandOutput::None,
        1 => parts.remove(0),
        _ => CommandOutput::Sequence(parts),
    })
}

// consecutive plain lines stay one text block
fn flush_text(pending: &mut Vec<String>, parts: &mut Vec<CommandOutput>) {
    if !pending.is_empty() {
        parts.push(CommandOutput::Text(pending.join("\n")));
        pending.clear();
    }
}
