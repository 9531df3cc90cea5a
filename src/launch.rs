// handling for the ?blogpost= launch parameter

use std::borrow::Cow;

use log::{info, warn};
use percent_encoding::percent_decode_str;

use crate::config::ShellConfig;
use crate::parser::escape_spaces;

pub const INVALID_POST_NOTICE: &str = "Invalid blog post name.";

/// What to run for a `blogpost` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogLaunch {
    /// Printed before the command when the name had to be cleaned up.
    pub notice: Option<&'static str>,
    pub command: String,
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ' ')
        .collect()
}

/// Plan the startup command for `raw`. Empty values launch nothing.
pub fn plan_blogpost(raw: &str, config: &ShellConfig) -> Option<BlogLaunch> {
    if raw.is_empty() {
        return None;
    }
    let decoded: Cow<'_, str> = percent_decode_str(raw).decode_utf8().unwrap_or_else(|e| {
        warn!("blogpost parameter is not valid UTF-8 after decoding: {e}");
        percent_decode_str(raw).decode_utf8_lossy()
    });
    let name = decoded.strip_suffix(".md").unwrap_or(decoded.as_ref());
    let clean = sanitize(name);

    let notice = (clean != name && clean != "list").then_some(INVALID_POST_NOTICE);
    let command = if clean == "list" {
        config.blog_list_script.clone()
    } else {
        format!("cat {}/{}.md", config.blog_dir, escape_spaces(&clean))
    };
    info!("blogpost launch: {command}");
    Some(BlogLaunch { notice, command })
}
