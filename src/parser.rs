#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuote(char),
}

/// Split a line into arguments.
///
/// Backslash takes the next character literally, inside quotes too. `'` and `"` behave
/// the same and only close on the character that opened them. Unquoted whitespace ends
/// an argument and never produces an empty one. Unterminated quotes and a trailing
/// backslash keep whatever was collected.
pub fn parse_input(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut state = State::Normal;
    let mut escaping = false;

    for c in input.chars() {
        if escaping {
            current.push(c);
            escaping = false;
            continue;
        }
        if c == '\\' {
            escaping = true;
            continue;
        }
        match state {
            State::InQuote(quote) if c == quote => state = State::Normal,
            State::InQuote(_) => current.push(c),
            State::Normal if c == '"' || c == '\'' => state = State::InQuote(c),
            State::Normal if c.is_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            State::Normal => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Backslash-escape spaces so a name survives [`parse_input`] as one argument.
pub fn escape_spaces(name: &str) -> String {
    name.replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(parse_input("ls -l /home"), args(&["ls", "-l", "/home"]));
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(parse_input("echo \"a b\" c"), args(&["echo", "a b", "c"]));
    }

    #[test]
    fn test_quote_glued_to_word() {
        assert_eq!(parse_input("cat \"a b\".md"), args(&["cat", "a b.md"]));
    }

    #[test]
    fn test_backslash_space() {
        assert_eq!(parse_input("a\\ b"), args(&["a b"]));
    }

    #[test]
    fn test_escape_inside_quotes() {
        assert_eq!(parse_input(r#"echo "say \"hi\"""#), args(&["echo", "say \"hi\""]));
    }

    #[test]
    fn test_other_quote_is_literal() {
        assert_eq!(parse_input(r#"echo "it's""#), args(&["echo", "it's"]));
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(parse_input("  pwd   \t  x  "), args(&["pwd", "x"]));
        assert!(parse_input("   ").is_empty());
        assert!(parse_input("").is_empty());
    }

    #[test]
    fn test_unterminated_quote_is_lenient() {
        assert_eq!(parse_input("cat 'my file"), args(&["cat", "my file"]));
    }

    #[test]
    fn test_trailing_escape_is_lenient() {
        assert_eq!(parse_input("cd docs\\"), args(&["cd", "docs"]));
    }

    #[test]
    fn test_escape_spaces_roundtrip() {
        let escaped = escape_spaces("read me.txt");
        assert_eq!(escaped, "read\\ me.txt");
        assert_eq!(parse_input(&escaped), args(&["read me.txt"]));
    }

    proptest! {
        #[test]
        fn never_yields_empty_arguments(line in ".{0,40}") {
            prop_assert!(parse_input(&line).iter().all(|a| !a.is_empty()));
        }

        #[test]
        fn plain_words_split_like_whitespace(words in proptest::collection::vec("[a-z0-9./-]{1,8}", 0..6)) {
            let line = words.join("  ");
            prop_assert_eq!(parse_input(&line), words);
        }
    }
}
