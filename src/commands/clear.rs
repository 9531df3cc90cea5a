use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;

pub struct ClearCommand;

impl Command for ClearCommand {
    fn execute(&self, _args: &[String], _ctx: &mut TerminalContext) -> CommandResult {
        // the front end wipes its buffer when it sees this
        Ok(CommandOutput::Clear)
    }
}
