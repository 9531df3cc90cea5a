use crate::command::{Command, CommandOutput, CommandResult};
use crate::context::TerminalContext;
use crate::error::ShellError;
use crate::render::linkify;

pub struct CatCommand;

impl Command for CatCommand {
    fn execute(&self, args: &[String], ctx: &mut TerminalContext) -> CommandResult {
        // only the first operand counts, extra ones are ignored
        let Some(path) = args.first() else {
            return Err(ShellError::usage("cat: missing operand"));
        };

        let id = ctx
            .resolve_path(path)
            .ok_or_else(|| ShellError::not_found(format!("cat: {path}"), "No such file"))?;
        let node = ctx.vfs.node(id);
        let Some(content) = node.content() else {
            return Err(ShellError::wrong_kind(format!("cat: {path}"), "Is a directory"));
        };

        if node.name.ends_with(".md") {
            let markdown = content.join("\n");
            return Ok(CommandOutput::Rich(ctx.render_markdown(&markdown)));
        }

        let text = content.iter().map(|line| linkify(line)).collect::<Vec<_>>().join("\n");
        Ok(CommandOutput::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_ctx;

    fn cat(ctx: &mut TerminalContext, args: &[&str]) -> CommandResult {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        CatCommand.execute(&args, ctx)
    }

    #[test]
    fn test_cat_links_urls() {
        let mut ctx = sample_ctx();
        let out = cat(&mut ctx, &["about.txt"]).unwrap();
        assert_eq!(
            out,
            CommandOutput::Text(
                "hello\nsee <a href=\"https://example.com/x\" class=\"link\" target=\"_blank\">https://example.com/x</a> now"
                    .into()
            )
        );
    }

    #[test]
    fn test_cat_markdown_is_rich() {
        let mut ctx = sample_ctx();
        assert_eq!(cat(&mut ctx, &["blog/newer.md"]).unwrap(), CommandOutput::Rich("# Newer".into()));
    }

    #[test]
    fn test_cat_spaced_path() {
        let mut ctx = sample_ctx();
        assert_eq!(
            cat(&mut ctx, &["my docs/read me.txt"]).unwrap(),
            CommandOutput::Text("spaced out".into())
        );
    }

    #[test]
    fn test_cat_errors() {
        let mut ctx = sample_ctx();
        assert_eq!(cat(&mut ctx, &[]).unwrap_err().to_string(), "cat: missing operand");
        assert_eq!(cat(&mut ctx, &["nope"]).unwrap_err().to_string(), "cat: nope: No such file");
        assert_eq!(cat(&mut ctx, &["blog"]).unwrap_err().to_string(), "cat: blog: Is a directory");
    }
}
