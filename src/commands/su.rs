use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;

pub struct SuCommand;

impl Command for SuCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        match args {
            [dash, user, ..] if dash == "-" && !user.is_empty() => {
                // any name goes, there is no user database
                ctx.set_user(user);
                Ok(CommandOutput::None)
            }
            _ => Err(ShellError::usage("Usage: su - <username>")),
        }
    }
}
