use std::collections::HashMap;

use log::debug;

use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::parser::parse_input;
use crate::script;

/// What a handler hands back for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    None,
    /// A single string, shown line by line.
    Text(String),
    /// Already split lines.
    Lines(Vec<String>),
    /// Rendered Markdown.
    Rich(String),
    Clear,
    /// Several outputs in order, as a script produces them.
    Sequence(Vec<CommandOutput>),
}

impl CommandOutput {
    pub fn is_none(&self) -> bool {
        matches!(self, CommandOutput::None)
    }

    /// Split into plain lines. Output that has to reach the display as is comes back in `Err`.
    pub fn plain_lines(self) -> Result<Vec<String>, CommandOutput> {
        match self {
            CommandOutput::None => Ok(Vec::new()),
            CommandOutput::Text(text) => Ok(text.split('\n').map(str::to_string).collect()),
            CommandOutput::Lines(lines) => Ok(lines),
            other => Err(other),
        }
    }
}

pub type CommandResult = Result<CommandOutput, ShellError>;

pub trait Command {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult;
}

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::default_commands()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: HashMap::new() }
    }

    pub fn register_command(&mut self, name: &str, cmd: Box<dyn Command>) {
        self.commands.insert(name.to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Command names starting with `partial`, sorted.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        self.get_command_names()
            .into_iter()
            .filter(|name| name.starts_with(partial))
            .collect()
    }

    pub fn default_commands() -> Self {
        let mut reg = Self::new();
        reg.register_command("ls", Box::new(crate::commands::ls::LsCommand));
        reg.register_command("cat", Box::new(crate::commands::cat::CatCommand));
        reg.register_command("help", Box::new(crate::commands::help::HelpCommand));
        reg.register_command("clear", Box::new(crate::commands::clear::ClearCommand));
        reg.register_command("cd", Box::new(crate::commands::cd::CdCommand));
        reg.register_command("su", Box::new(crate::commands::su::SuCommand));
        reg.register_command("grep", Box::new(crate::commands::grep::GrepCommand));
        reg.register_command("pwd", Box::new(crate::commands::pwd::PwdCommand));
        reg.register_command("history", Box::new(crate::commands::history::HistoryCommand));
        reg.register_command("echo", Box::new(crate::commands::echo::EchoCommand));
        reg
    }

    /// Table lookup only; executable paths are handled by [`run_command`].
    pub fn dispatch(&self, name: &str, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        match self.get(name) {
            Some(command) => command.execute(args, ctx),
            None => Err(ShellError::CommandNotFound(name.to_string())),
        }
    }
}

/// Parse and run one line. Errors never escape: they come back as their display text.
pub fn run_command(input: &str, ctx: &mut TerminalContext, registry: &CommandRegistry) -> CommandOutput {
    let args = parse_input(input);
    debug!("dispatching {args:?}");
    execute_args(&args, ctx, registry).unwrap_or_else(|e| CommandOutput::Text(e.to_string()))
}

fn execute_args(args: &[String], ctx: &mut TerminalContext, registry: &CommandRegistry) -> CommandResult {
    let Some((cmd, rest)) = args.split_first() else {
        return Ok(CommandOutput::None);
    };
    if cmd.starts_with('/') {
        return execute_absolute(cmd, ctx, registry);
    }
    if let Some(relative) = cmd.strip_prefix("./") {
        return execute_relative(cmd, relative, ctx, registry);
    }
    registry.dispatch(cmd, rest, ctx)
}

fn missing(cmd: &str) -> ShellError {
    ShellError::not_found(cmd, "No such file or directory")
}

/// `/path/to/script`: must resolve to an executable file.
fn execute_absolute(cmd: &str, ctx: &mut TerminalContext, registry: &CommandRegistry) -> CommandResult {
    let id = ctx.resolve_path(cmd).ok_or_else(|| missing(cmd))?;
    let node = ctx.vfs.node(id);
    if !node.is_file() || !node.is_executable() {
        return Err(ShellError::PermissionDenied(cmd.to_string()));
    }
    script::run_script(id, ctx, registry)
}

/// `./script` or `./dir/script`, looked up from the current directory.
fn execute_relative(
    cmd: &str,
    relative: &str,
    ctx: &mut TerminalContext,
    registry: &CommandRegistry,
) -> CommandResult {
    let (dir_part, file_name) = match relative.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, relative),
    };
    let dir = match dir_part {
        Some(dir_path) => ctx
            .resolve_path(dir_path)
            .filter(|&id| ctx.vfs.node(id).is_dir())
            .ok_or_else(|| missing(cmd))?,
        None => ctx.cwd_node(),
    };
    let id = ctx
        .vfs
        .child(dir, file_name)
        .filter(|&id| ctx.vfs.node(id).is_file())
        .ok_or_else(|| missing(cmd))?;
    if !ctx.vfs.node(id).is_executable() {
        return Err(ShellError::PermissionDenied(cmd.to_string()));
    }
    script::run_script(id, ctx, registry)
}
