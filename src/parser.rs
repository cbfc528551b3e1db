/// Split an input line into argument tokens.
///
/// Only the space character separates tokens. Tabs and every other
/// character, including quotes and backslashes, are kept as literal text.
/// Runs of spaces never produce empty tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
