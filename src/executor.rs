use std::fs::File;
use std::io;
use std::process::{Child, Command};

use tracing::{debug, warn};

use crate::metachar::Invocation;
use crate::redirect::{Direction, Redirection};
use crate::signals;
use crate::status;

/// First token that ends the shell instead of launching anything.
pub const EXIT_COMMAND: &str = "exit";

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to open pipe: {0}")]
    Pipe(#[source] io::Error),
    #[error("failed to open file {path} for redirection: {source}")]
    Redirect {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch \"{program}\": {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// What happened to one launched command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchResult {
    /// The exit command was given; nothing was spawned.
    Exit,
    /// Foreground command finished with this exit code.
    Completed(i32),
    /// Background command is running under this pid.
    Background(u32),
}

/// Spawns commands and keeps handles to the ones sent to the background.
#[derive(Debug, Default)]
pub struct Launcher {
    background: Vec<Child>,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one invocation: foreground commands are waited for, background
    /// ones return their pid at once and are tracked for reaping.
    pub fn launch(&mut self, invocation: &Invocation) -> Result<LaunchResult, LaunchError> {
        let Some(program) = invocation.program() else {
            return Ok(LaunchResult::Completed(0));
        };
        if program == EXIT_COMMAND {
            return Ok(LaunchResult::Exit);
        }

        let (input, output) = open_redirection(invocation.redirection.as_ref())?;

        let children = match invocation.pipe_rhs.as_deref() {
            Some(rhs) if !rhs.is_empty() => {
                self.spawn_pipe(&invocation.argv, rhs, input, output, invocation.background)?
            }
            _ => {
                let mut cmd = command(&invocation.argv);
                if let Some(file) = input {
                    cmd.stdin(file);
                }
                if let Some(file) = output {
                    cmd.stdout(file);
                }
                vec![spawn(cmd, program)?]
            }
        };

        Ok(self.settle(children, invocation.background))
    }

    /// Number of background children not yet reaped.
    pub fn background_count(&self) -> usize {
        self.background.len()
    }

    /// Collect background children that have exited, without blocking.
    pub fn reap(&mut self) {
        self.background.retain_mut(|child| match child.try_wait() {
            Ok(Some(exit)) => {
                debug!(pid = child.id(), code = status::exit_code(exit), "background command finished");
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(pid = child.id(), error = %e, "failed to poll background command");
                false
            }
        });
    }

    /// Spawn `lhs | rhs`. The right side starts first so it is already
    /// reading when the left side begins writing.
    ///
    /// `input` feeds the left side and `output` takes the right side's
    /// stdout. `extract` never pairs a pipe with a redirection, but a
    /// hand-built `Invocation` may.
    fn spawn_pipe(
        &mut self,
        lhs: &[String],
        rhs: &[String],
        input: Option<File>,
        output: Option<File>,
        background: bool,
    ) -> Result<Vec<Child>, LaunchError> {
        let (reader, writer) = os_pipe::pipe().map_err(LaunchError::Pipe)?;

        let mut rhs_cmd = command(rhs);
        rhs_cmd.stdin(reader);
        if let Some(file) = output {
            rhs_cmd.stdout(file);
        }
        let rhs_child = spawn(rhs_cmd, &rhs[0])?;

        let mut lhs_cmd = command(lhs);
        lhs_cmd.stdout(writer);
        if let Some(file) = input {
            lhs_cmd.stdin(file);
        }
        match spawn(lhs_cmd, &lhs[0]) {
            Ok(lhs_child) => Ok(vec![lhs_child, rhs_child]),
            Err(e) => {
                // The write end is gone, so the right side sees EOF and exits.
                if background {
                    self.background.push(rhs_child);
                } else {
                    self.settle(vec![rhs_child], false);
                }
                Err(e)
            }
        }
    }

    /// Wait for `children` or hand them to the background list.
    /// The first child's pid is returned; the last child's status wins.
    fn settle(&mut self, mut children: Vec<Child>, background: bool) -> LaunchResult {
        if background {
            let pid = children.first().map_or(0, Child::id);
            debug!(pid, count = children.len(), "command sent to background");
            self.background.append(&mut children);
            return LaunchResult::Background(pid);
        }

        let mut code = 0;
        for child in &mut children {
            code = match child.wait() {
                Ok(exit) => status::exit_code(exit),
                Err(e) => {
                    warn!(pid = child.id(), error = %e, "failed to wait for command");
                    status::LAUNCH_FAILURE
                }
            };
        }
        debug!(code, "foreground command finished");
        LaunchResult::Completed(code)
    }
}

fn open_redirection(
    redirection: Option<&Redirection>,
) -> Result<(Option<File>, Option<File>), LaunchError> {
    let Some(redirection) = redirection else {
        return Ok((None, None));
    };

    let file = redirection.open().map_err(|source| LaunchError::Redirect {
        path: redirection.path.clone(),
        source,
    })?;

    Ok(match redirection.direction {
        Direction::Input => (Some(file), None),
        Direction::Output => (None, Some(file)),
    })
}

/// Build the spawn configuration for one argument vector.
fn command(argv: &[String]) -> Command {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    signals::reset_in_child(&mut cmd);
    cmd
}

/// Spawn and drop the configuration, which closes the parent's copies of
/// any pipe ends or files handed to the child.
fn spawn(mut cmd: Command, program: &str) -> Result<Child, LaunchError> {
    let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })?;
    debug!(pid = child.id(), program, "spawned");
    Ok(child)
}
