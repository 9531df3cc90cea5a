// the display text of each variant is the exact line the terminal prints

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Path resolution failed. `prefix` carries the command and path as shown to the user.
    #[error("{prefix}: {message}")]
    NotFound { prefix: String, message: &'static str },

    /// Found a file where a directory was expected, or the other way round.
    #[error("{prefix}: {message}")]
    WrongKind { prefix: String, message: &'static str },

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("{0}")]
    Usage(String),

    #[error("{0}: Not a valid shell script")]
    NotAScript(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("grep: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("seed error: {0}")]
    Seed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ShellError {
    pub fn not_found(prefix: impl Into<String>, message: &'static str) -> Self {
        ShellError::NotFound { prefix: prefix.into(), message }
    }

    pub fn wrong_kind(prefix: impl Into<String>, message: &'static str) -> Self {
        ShellError::WrongKind { prefix: prefix.into(), message }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        ShellError::Usage(message.into())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_prefix_and_message() {
        let e = ShellError::not_found("cat: notes.txt", "No such file");
        assert_eq!(e.to_string(), "cat: notes.txt: No such file");
    }

    #[test]
    fn ls_style_not_found() {
        let e = ShellError::not_found("ls: cannot access 'nope'", "No such file or directory");
        assert_eq!(e.to_string(), "ls: cannot access 'nope': No such file or directory");
    }

    #[test]
    fn wrong_kind_display() {
        let e = ShellError::wrong_kind("cd: blog.sh", "Not a directory");
        assert_eq!(e.to_string(), "cd: blog.sh: Not a directory");
    }

    #[test]
    fn permission_and_script_display() {
        assert_eq!(
            ShellError::PermissionDenied("./run.sh".into()).to_string(),
            "./run.sh: Permission denied"
        );
        assert_eq!(
            ShellError::NotAScript("notes.sh".into()).to_string(),
            "notes.sh: Not a valid shell script"
        );
    }

    #[test]
    fn command_not_found_display() {
        let e = ShellError::CommandNotFound("vim".into());
        assert_eq!(e.to_string(), "Command not found: vim");
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: ShellError = json_err.into();
        assert!(e.to_string().contains("JSON error"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: ShellError = toml_err.into();
        assert!(e.to_string().contains("TOML parse error"));
    }
}
