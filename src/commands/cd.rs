use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::path::ResolveError;

pub struct CdCommand;

impl Command for CdCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        // no arg means home, same as `cd ~`
        let path = args.first().map(|p| p.trim()).unwrap_or("~");

        match ctx.change_dir(path) {
            Ok(_) => Ok(CommandOutput::None),
            Err(ResolveError::NotFound) => {
                Err(ShellError::not_found(format!("cd: {path}"), "No such directory"))
            }
            Err(ResolveError::NotADirectory) => {
                Err(ShellError::wrong_kind(format!("cd: {path}"), "Not a directory"))
            }
        }
    }
}
