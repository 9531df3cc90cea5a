use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;

pub struct PwdCommand;

impl Command for PwdCommand {
    fn execute(&self, _args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        Ok(CommandOutput::Text(ctx.pwd()))
    }
}
