use crate::redirect::{Direction, Redirection};

const BACKGROUND_MARKER: &str = "&";
const PIPE_SYMBOL: char = '|';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The redirection symbol is not followed by exactly one path token.
    #[error("illegal file name for '{symbol}' redirection")]
    IllegalRedirection { symbol: char },
    /// A redirection or pipe with no program in front of it.
    #[error("missing command before '{symbol}'")]
    MissingCommand { symbol: char },
}

/// One launch worth of argument vectors after metacharacters are removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Program name followed by its arguments. Empty means nothing to run.
    pub argv: Vec<String>,
    /// Trailing `&` was present.
    pub background: bool,
    pub redirection: Option<Redirection>,
    /// Right-hand side of `a | b`. Its stdin reads what `argv` writes.
    pub pipe_rhs: Option<Vec<String>>,
}

impl Invocation {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Strip `&`, `>`, `<` and `|` constructs from the tokens, in that order.
///
/// `&` only counts as the last token. The other symbols are found anywhere
/// by their first character. Output redirection wins over input
/// redirection, and a pipe is only looked for when neither is present.
pub fn extract(mut tokens: Vec<String>) -> Result<Invocation, ExtractError> {
    let background = take_background(&mut tokens);

    let mut redirection = take_redirection(Direction::Output, &mut tokens)?;
    if redirection.is_none() {
        redirection = take_redirection(Direction::Input, &mut tokens)?;
    }

    let pipe_rhs = if redirection.is_none() {
        take_pipe(&mut tokens)
    } else {
        None
    };

    if tokens.is_empty() {
        if let Some(redirection) = &redirection {
            return Err(ExtractError::MissingCommand {
                symbol: redirection.direction.symbol(),
            });
        }
        if pipe_rhs.is_some() {
            return Err(ExtractError::MissingCommand { symbol: PIPE_SYMBOL });
        }
    }

    Ok(Invocation {
        argv: tokens,
        background,
        redirection,
        pipe_rhs,
    })
}

fn take_background(tokens: &mut Vec<String>) -> bool {
    if tokens.last().is_some_and(|t| t == BACKGROUND_MARKER) {
        tokens.pop();
        true
    } else {
        false
    }
}

fn take_redirection(
    direction: Direction,
    tokens: &mut Vec<String>,
) -> Result<Option<Redirection>, ExtractError> {
    let symbol = direction.symbol();
    let Some(pos) = tokens.iter().position(|t| t.starts_with(symbol)) else {
        return Ok(None);
    };

    // Exactly one token (the path) may follow the symbol.
    if tokens.len() != pos + 2 {
        return Err(ExtractError::IllegalRedirection { symbol });
    }

    let path = tokens.pop().unwrap_or_default();
    tokens.truncate(pos);
    Ok(Some(Redirection::new(direction, path)))
}

fn take_pipe(tokens: &mut Vec<String>) -> Option<Vec<String>> {
    let pos = tokens
        .iter()
        .enumerate()
        .position(|(i, t)| t.starts_with(PIPE_SYMBOL) && i + 1 < tokens.len())?;

    let rhs = tokens.split_off(pos + 1);
    tokens.truncate(pos);
    Some(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize;

    fn extract_line(line: &str) -> Result<Invocation, ExtractError> {
        extract(tokenize(line))
    }

    #[test]
    fn plain_tokens_pass_through_unchanged() {
        for line in ["ls -l /tmp", "echo hello world", "a", "grep -r foo ."] {
            let tokens = tokenize(line);
            let inv = extract(tokens.clone()).unwrap();
            assert_eq!(inv.argv, tokens);
            assert!(!inv.background);
            assert!(inv.redirection.is_none());
            assert!(inv.pipe_rhs.is_none());
        }
    }

    #[test]
    fn trailing_ampersand_sets_background() {
        let inv = extract_line("sleep 5 &").unwrap();
        assert_eq!(inv.argv, vec!["sleep", "5"]);
        assert!(inv.background);
    }

    #[test]
    fn ampersand_elsewhere_is_literal() {
        let inv = extract_line("echo & done").unwrap();
        assert_eq!(inv.argv, vec!["echo", "&", "done"]);
        assert!(!inv.background);
    }

    #[test]
    fn lone_ampersand_leaves_nothing_to_run() {
        let inv = extract_line("&").unwrap();
        assert!(inv.is_empty());
        assert!(inv.background);
    }

    #[test]
    fn output_redirect() {
        let inv = extract_line("echo hi > out.txt").unwrap();
        assert_eq!(inv.argv, vec!["echo", "hi"]);
        assert_eq!(
            inv.redirection,
            Some(Redirection::new(Direction::Output, "out.txt"))
        );
    }

    #[test]
    fn input_redirect() {
        let inv = extract_line("cat < in.txt").unwrap();
        assert_eq!(inv.argv, vec!["cat"]);
        assert_eq!(
            inv.redirection,
            Some(Redirection::new(Direction::Input, "in.txt"))
        );
    }

    #[test]
    fn symbol_matches_on_first_character() {
        let inv = extract_line("echo hi >> log").unwrap();
        assert_eq!(inv.argv, vec!["echo", "hi"]);
        assert_eq!(inv.redirection, Some(Redirection::new(Direction::Output, "log")));
    }

    #[test]
    fn redirect_with_background() {
        let inv = extract_line("sleep 1 > out &").unwrap();
        assert!(inv.background);
        assert_eq!(inv.argv, vec!["sleep", "1"]);
        assert_eq!(inv.redirection, Some(Redirection::new(Direction::Output, "out")));
    }

    #[test]
    fn missing_redirect_target_is_illegal() {
        assert_eq!(
            extract_line("cmd >"),
            Err(ExtractError::IllegalRedirection { symbol: '>' })
        );
        assert_eq!(
            extract_line("cmd <"),
            Err(ExtractError::IllegalRedirection { symbol: '<' })
        );
    }

    #[test]
    fn extra_tokens_after_target_are_illegal() {
        assert_eq!(
            extract_line("cmd > a b"),
            Err(ExtractError::IllegalRedirection { symbol: '>' })
        );
        assert_eq!(
            extract_line("cat < a b"),
            Err(ExtractError::IllegalRedirection { symbol: '<' })
        );
    }

    #[test]
    fn output_wins_over_input() {
        // Once `>` is taken the input scan is skipped, so `<` stays literal.
        let inv = extract_line("sort < in > out").unwrap();
        assert_eq!(inv.argv, vec!["sort", "<", "in"]);
        assert_eq!(inv.redirection, Some(Redirection::new(Direction::Output, "out")));
    }

    #[test]
    fn input_before_output_is_illegal() {
        assert!(extract_line("sort > out < in").is_err());
    }

    #[test]
    fn pipe_split() {
        let inv = extract_line("echo hello | wc").unwrap();
        assert_eq!(inv.argv, vec!["echo", "hello"]);
        assert_eq!(inv.pipe_rhs, Some(vec!["wc".to_string()]));
    }

    #[test]
    fn pipe_with_arguments_on_both_sides() {
        let inv = extract_line("ls -l /tmp | grep -c x &").unwrap();
        assert!(inv.background);
        assert_eq!(inv.argv, vec!["ls", "-l", "/tmp"]);
        assert_eq!(
            inv.pipe_rhs,
            Some(vec!["grep".to_string(), "-c".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn trailing_pipe_is_literal() {
        let inv = extract_line("echo a |").unwrap();
        assert_eq!(inv.argv, vec!["echo", "a", "|"]);
        assert!(inv.pipe_rhs.is_none());
    }

    #[test]
    fn second_pipe_stays_in_right_side() {
        let inv = extract_line("a | b | c").unwrap();
        assert_eq!(inv.argv, vec!["a"]);
        assert_eq!(
            inv.pipe_rhs,
            Some(vec!["b".to_string(), "|".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn pipe_not_split_when_redirected() {
        let inv = extract_line("echo a | wc > out").unwrap();
        assert_eq!(inv.argv, vec!["echo", "a", "|", "wc"]);
        assert!(inv.pipe_rhs.is_none());
    }

    #[test]
    fn pipe_without_left_command() {
        assert_eq!(
            extract_line("| wc"),
            Err(ExtractError::MissingCommand { symbol: '|' })
        );
        assert_eq!(
            extract_line("| echo RHS &"),
            Err(ExtractError::MissingCommand { symbol: '|' })
        );
    }

    #[test]
    fn redirect_without_command() {
        assert_eq!(
            extract_line("> f"),
            Err(ExtractError::MissingCommand { symbol: '>' })
        );
        assert_eq!(
            extract_line("< f"),
            Err(ExtractError::MissingCommand { symbol: '<' })
        );
    }

    #[test]
    fn empty_tokens() {
        let inv = extract(Vec::new()).unwrap();
        assert!(inv.is_empty());
        assert_eq!(inv.program(), None);
    }
}
