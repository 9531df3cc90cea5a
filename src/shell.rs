use log::debug;

use crate::command::{run_command, CommandOutput, CommandRegistry};
use crate::completion::{self, Completion, TabTracker};
use crate::config::ShellConfig;
use crate::context::TerminalContext;
use crate::error::Result;
use crate::launch;
use crate::render::{DisplayEvent, MarkdownRenderer};
use crate::storage::KeyValueStore;

pub struct Shell {
    ctx: TerminalContext,
    registry: CommandRegistry,
    tabs: TabTracker,
}

/// Split command output into what the display receives.
pub fn to_events(output: CommandOutput) -> Vec<DisplayEvent> {
    match output {
        CommandOutput::None => Vec::new(),
        CommandOutput::Text(text) => text.split('\n').map(|line| DisplayEvent::Line(line.to_string())).collect(),
        CommandOutput::Lines(lines) => lines.into_iter().map(DisplayEvent::Line).collect(),
        CommandOutput::Rich(content) => vec![DisplayEvent::Rich(content)],
        CommandOutput::Clear => vec![DisplayEvent::Clear],
        CommandOutput::Sequence(parts) => parts.into_iter().flat_map(to_events).collect(),
    }
}

impl Shell {
    pub fn new(ctx: TerminalContext) -> Self {
        let tabs = TabTracker::new(ctx.config.double_tab_ms);
        Self { ctx, registry: CommandRegistry::default_commands(), tabs }
    }

    pub fn boot(
        config: ShellConfig,
        store: Box<dyn KeyValueStore>,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Result<Self> {
        Ok(Self::new(TerminalContext::boot(config, store, renderer)?))
    }

    pub fn context(&self) -> &TerminalContext {
        &self.ctx
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn prompt(&self) -> String {
        self.ctx.prompt()
    }

    /// A line typed at the prompt: recorded in history, then executed.
    pub fn submit(&mut self, line: &str) -> Vec<DisplayEvent> {
        let line = line.trim();
        if !line.is_empty() {
            self.ctx.record_history(line);
        }
        self.execute(line)
    }

    /// Echo the prompt with `line` and run it, without touching history.
    pub fn execute(&mut self, line: &str) -> Vec<DisplayEvent> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        let mut events = vec![DisplayEvent::Line(format!("{}{}", self.ctx.prompt(), line))];
        let output = run_command(line, &mut self.ctx, &self.registry);
        debug!("'{line}' produced {output:?}");
        events.extend(to_events(output));
        events
    }

    /// Handle a completion key press at wall-clock time `now_ms`.
    pub fn complete(&mut self, buffer: &str, cursor: usize, now_ms: u64) -> Completion {
        let press = self.tabs.press(now_ms);
        completion::complete(&self.ctx, &self.registry, buffer, cursor, press)
    }

    pub fn history_prev(&mut self) -> Option<String> {
        self.ctx.history.prev().map(str::to_string)
    }

    pub fn history_next(&mut self) -> String {
        self.ctx.history.next().to_string()
    }

    pub fn last_argument(&mut self) -> Option<String> {
        self.ctx.history.last_argument()
    }

    /// Run the `blogpost` launch parameter, if any.
    pub fn launch_blogpost(&mut self, raw: &str) -> Vec<DisplayEvent> {
        let Some(plan) = launch::plan_blogpost(raw, &self.ctx.config) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if let Some(notice) = plan.notice {
            events.push(DisplayEvent::Line(notice.to_string()));
        }
        events.extend(self.execute(&plan.command));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_ctx;

    fn line(text: &str) -> DisplayEvent {
        DisplayEvent::Line(text.to_string())
    }

    #[test]
    fn test_submit_echoes_prompt_and_output() {
        let mut shell = Shell::new(sample_ctx());
        assert_eq!(
            shell.submit("  pwd "),
            vec![line("earentir@hera:~$ pwd"), line("/home/earentir/")]
        );
        assert_eq!(shell.context().history.to_vec(), vec!["pwd"]);
    }

    #[test]
    fn test_empty_submit_is_silent() {
        let mut shell = Shell::new(sample_ctx());
        assert!(shell.submit("   ").is_empty());
        assert!(shell.context().history.is_empty());
    }

    #[test]
    fn test_echo_dot_prints_one_blank_line() {
        let mut shell = Shell::new(sample_ctx());
        assert_eq!(shell.submit("echo ."), vec![line("earentir@hera:~$ echo ."), line("")]);
    }

    #[test]
    fn test_prompt_follows_cd() {
        let mut shell = Shell::new(sample_ctx());
        shell.submit("cd /etc");
        assert_eq!(shell.prompt(), "earentir@hera:/etc$ ");
    }

    #[test]
    fn test_clear_and_rich_events() {
        let mut shell = Shell::new(sample_ctx());
        assert_eq!(shell.submit("clear").last(), Some(&DisplayEvent::Clear));
        assert_eq!(
            shell.submit("cat blog/older.md").last(),
            Some(&DisplayEvent::Rich("# Older".to_string()))
        );
    }

    #[test]
    fn test_script_keeps_rich_and_clear_events() {
        let mut ctx = sample_ctx();
        let seed = crate::vfs::tests::dir(
            "/",
            vec![
                crate::vfs::tests::script("s.sh", &["#!/bin/earsh", "clear", "cat p.md"]),
                crate::vfs::tests::file("p.md", &["# T", "", "body"]),
            ],
        );
        ctx.vfs = crate::vfs::VirtualFileSystem::from_seed(seed).unwrap();
        ctx.change_dir("/").unwrap();
        let mut shell = Shell::new(ctx);
        assert_eq!(
            shell.submit("./s.sh"),
            vec![
                line("earentir@hera:/$ ./s.sh"),
                DisplayEvent::Clear,
                DisplayEvent::Rich("# T\n\nbody".into()),
            ]
        );
    }

    #[test]
    fn test_history_navigation() {
        let mut shell = Shell::new(sample_ctx());
        shell.submit("ls -l blog");
        shell.submit("cat about.txt");
        assert_eq!(shell.history_prev().as_deref(), Some("cat about.txt"));
        assert_eq!(shell.history_prev().as_deref(), Some("ls -l blog"));
        assert_eq!(shell.history_prev(), None);
        assert_eq!(shell.history_next(), "cat about.txt");
        assert_eq!(shell.history_next(), "");
        assert_eq!(shell.last_argument().as_deref(), Some("about.txt"));
        assert_eq!(shell.last_argument().as_deref(), Some("blog"));
    }

    #[test]
    fn test_double_tab_lists() {
        let mut shell = Shell::new(sample_ctx());
        assert_eq!(shell.complete("c", 1, 10_000), Completion::Unchanged);
        assert_eq!(shell.complete("c", 1, 10_100), Completion::Listing("cat  cd  clear".into()));
    }

    #[test]
    fn test_launch_blogpost() {
        let mut shell = Shell::new(sample_ctx());
        let events = shell.launch_blogpost("older%3F");
        assert_eq!(events[0], line("Invalid blog post name."));
        assert_eq!(events[1], line("earentir@hera:~$ cat /home/earentir/blog/older.md"));
        assert_eq!(events[2], DisplayEvent::Rich("# Older".into()));
        assert!(shell.context().history.is_empty());
    }
}
