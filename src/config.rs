use tracing::warn;

pub const DEFAULT_PROMPT: &str = ">>> ";
/// Input buffer size; one slot is reserved, so 1023 characters are kept.
pub const DEFAULT_MAX_INPUT: usize = 1024;
pub const BANNER: &str = "A minimal linux shell.\nType 'exit' to exit.\n";

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_input: usize,
    pub show_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_input: DEFAULT_MAX_INPUT,
            show_banner: true,
        }
    }
}

impl Config {
    /// Build the config from `LSH_PROMPT`, `LSH_MAX_INPUT` and `LSH_NO_BANNER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(prompt) = lookup("LSH_PROMPT") {
            config.prompt = prompt;
        }

        if let Some(raw) = lookup("LSH_MAX_INPUT") {
            match raw.trim().parse::<usize>() {
                Ok(size) if size >= 2 => config.max_input = size,
                _ => warn!(value = %raw, "ignoring invalid LSH_MAX_INPUT"),
            }
        }

        config.show_banner = lookup("LSH_NO_BANNER").is_none();
        config
    }
}
