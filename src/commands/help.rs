use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;

/// help
/// Display usage for every command.
pub struct HelpCommand;

const HELP_TEXT: &str = "Supported commands:
- cat <file_path>: View file contents
    - Paths may contain spaces: cat \"folder name/file.txt\" or cat folder\\ name/file.txt
    - Markdown (.md) files are rendered

- cd <directory>: Change directory
    - cd .. : Go up one directory
    - cd ~ : Go to home directory

- clear: Clear the terminal

- echo <text>: Print text
    - Knows $USER, $HOME, $PATH, $PWD, $HOSTNAME, $SHELL and friends

- grep [options] <pattern> <file|directory>: Search for pattern in file or directory
    Options:
    -r : Search directories recursively
    -i : Case-insensitive search

- help: Show this help message

- history: Show command history
    Options:
    -c : Clear command history
    -d <index> : Delete command at index

- ls [options] [directories]: List files
    Options:
    -l : Long listing format
    -a : All files (including hidden)
    -s : Show sizes

- pwd: Show current directory

- su - <username>: Switch user

- /path/to/script or ./script: Run an executable script starting with #!/bin/earsh";

impl Command for HelpCommand {
    fn execute(&self, _args: &[String], _ctx: &mut TerminalContext) -> CommandResult {
        Ok(CommandOutput::Text(HELP_TEXT.to_string()))
    }
}
