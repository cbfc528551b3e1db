use std::fs::{File, OpenOptions};
use std::io;

/// Mode bits for files created by output redirection (before umask).
#[cfg(unix)]
const CREATE_MODE: u32 = 0o666;

/// Which standard stream a redirection replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `< file`: replaces stdin, file must exist
    Input,
    /// `> file`: replaces stdout, created or truncated
    Output,
}

impl Direction {
    /// The first character that marks a redirection token.
    pub fn symbol(self) -> char {
        match self {
            Direction::Input => '<',
            Direction::Output => '>',
        }
    }
}

/// A single I/O redirection instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub direction: Direction,
    pub path: String,
}

impl Redirection {
    pub fn new(direction: Direction, path: impl Into<String>) -> Self {
        Self {
            direction,
            path: path.into(),
        }
    }

    /// Open the redirection target the way the child stream needs it.
    pub fn open(&self) -> io::Result<File> {
        match self.direction {
            Direction::Input => File::open(&self.path),
            Direction::Output => {
                let mut options = OpenOptions::new();
                options.write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(CREATE_MODE);
                }
                options.open(&self.path)
            }
        }
    }
}
