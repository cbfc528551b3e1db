use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::{BANNER, Config};
use crate::executor::{EXIT_COMMAND, LaunchResult, Launcher};
use crate::{input, metachar, parser, status};

/// The read-launch loop.
pub struct Shell {
    config: Config,
    launcher: Launcher,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            launcher: Launcher::new(),
        }
    }

    /// Prompt, read and launch until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: &mut R, out: &mut W) -> io::Result<()> {
        if self.config.show_banner {
            writeln!(out, "{BANNER}")?;
        }

        loop {
            self.launcher.reap();

            write!(out, "{}", self.config.prompt)?;
            out.flush()?;

            let Some(line) = input::read_line(reader, self.config.max_input)? else {
                writeln!(out)?;
                break;
            };

            if !self.handle_line(&line, out)? {
                break;
            }
        }

        debug!(
            still_running = self.launcher.background_count(),
            "shell exiting"
        );
        Ok(())
    }

    /// Launch one line. Returns false once the shell should stop.
    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let tokens = parser::tokenize(line);
        debug!(?tokens, "tokenized");

        match tokens.first() {
            None => return Ok(true),
            // Checked ahead of extraction so `exit` always wins.
            Some(first) if first == EXIT_COMMAND => return Ok(false),
            Some(_) => {}
        }

        let invocation = match metachar::extract(tokens) {
            Ok(invocation) => invocation,
            Err(e) => {
                eprintln!("lsh: {e}");
                debug!(code = status::LAUNCH_FAILURE, "command rejected");
                return Ok(true);
            }
        };
        if invocation.is_empty() {
            return Ok(true);
        }
        debug!(?invocation, "launching");

        match self.launcher.launch(&invocation) {
            Ok(LaunchResult::Exit) => Ok(false),
            Ok(LaunchResult::Background(pid)) => {
                writeln!(out, "[{pid}]")?;
                Ok(true)
            }
            Ok(LaunchResult::Completed(_)) => Ok(true),
            Err(e) => {
                eprintln!("lsh: {e}");
                debug!(code = status::LAUNCH_FAILURE, "launch failed");
                Ok(true)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn quiet() -> Config {
        Config {
            show_banner: false,
            ..Config::default()
        }
    }

    fn run(config: Config, script: &str) -> String {
        let mut shell = Shell::new(config);
        let mut reader = Cursor::new(script.to_string());
        let mut out = Vec::new();
        shell.run(&mut reader, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn banner_then_prompt() {
        let out = run(Config::default(), "exit\n");
        assert!(out.starts_with(BANNER));
        assert!(out.ends_with(">>> "));
    }

    #[test]
    fn blank_lines_just_reprompt() {
        let out = run(quiet(), "\n   \nexit\n");
        assert_eq!(out, ">>> >>> >>> ");
    }

    #[test]
    fn exit_stops_before_queued_input() {
        let out = run(quiet(), "exit\ntrue\n");
        assert_eq!(out, ">>> ");
    }

    #[test]
    fn end_of_input_stops() {
        let out = run(quiet(), "true\n");
        assert_eq!(out, ">>> >>> \n");
    }

    #[test]
    fn failures_keep_the_loop_going() {
        let out = run(quiet(), "echo >\nlsh-no-such-program-xyz\nexit\n");
        assert_eq!(out, ">>> >>> >>> ");
    }

    #[test]
    fn exit_wins_over_bad_redirection() {
        let out = run(quiet(), "exit >\ntrue\n");
        assert_eq!(out, ">>> ");
    }

    #[test]
    fn missing_left_command_runs_nothing() {
        let out = run(quiet(), "| echo RHS\n> lsh-never-created\nexit\n");
        assert_eq!(out, ">>> >>> >>> ");
        assert!(!std::path::Path::new("lsh-never-created").exists());
    }

    #[test]
    fn background_pid_goes_to_writer() {
        let out = run(quiet(), "true &\nexit\n");
        let pid = out
            .strip_prefix(">>> [")
            .and_then(|rest| rest.split(']').next())
            .and_then(|pid| pid.parse::<u32>().ok());
        assert!(pid.is_some_and(|pid| pid > 0), "out was: {out:?}");
        assert!(out.ends_with("]\n>>> "), "out was: {out:?}");
    }

    #[test]
    fn custom_prompt() {
        let config = Config {
            prompt: "$ ".into(),
            ..quiet()
        };
        assert_eq!(run(config, "exit\n"), "$ ");
    }
}
