use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;

pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        match args.first().map(String::as_str) {
            Some("-c") => {
                ctx.history.clear();
                ctx.persist_history();
                Ok(CommandOutput::None)
            }
            Some("-d") => {
                let Some(raw) = args.get(1) else {
                    return Err(ShellError::usage("Usage: history -d <index>"));
                };
                let deleted = raw.parse::<usize>().map(|index| ctx.history.delete(index)).unwrap_or(false);
                if !deleted {
                    return Err(ShellError::usage("history: index out of range"));
                }
                ctx.persist_history();
                Ok(CommandOutput::None)
            }
            _ => {
                if ctx.history.is_empty() {
                    return Ok(CommandOutput::None);
                }
                Ok(CommandOutput::Lines(ctx.history.to_vec()))
            }
        }
    }
}
