use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;

/// echo [STRING]...
/// Prints its arguments, or the value of a known pseudo variable.
pub struct EchoCommand;

/// Value of a pseudo environment variable, if `name` is one.
fn lookup(name: &str, ctx: &TerminalContext) -> Option<String> {
    let value = match name {
        "$USER" => ctx.user().to_string(),
        "$HOME" => ctx.home_path(),
        "$HOSTNAME" => ctx.config.hostname.clone(),
        // segments glued with "/", so the root shows up doubled
        "$PATH" => ctx.cwd().join("/"),
        "$PWD" => ctx.pwd(),
        "$SHELL" => "/bin/earsh".to_string(),
        "$TERM" => "earterm-mono".to_string(),
        "$LANG" => "en_US.UTF-8".to_string(),
        "$EDITOR" | "$VISUAL" => "vi".to_string(),
        "$PAGER" => "less".to_string(),
        "$HISTSIZE" => ctx.history.capacity().to_string(),
        "$HISTCONTROL" => "ignoredups".to_string(),
        // a single blank line
        "." => String::new(),
        _ => return None,
    };
    Some(value)
}

impl Command for EchoCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        let Some(first) = args.first() else {
            return Ok(CommandOutput::Text(String::new()));
        };
        let out = lookup(first, ctx).unwrap_or_else(|| args.join(" "));
        Ok(CommandOutput::Text(out))
    }
}
