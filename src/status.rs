use std::process::ExitStatus;

/// Shell-style code for a finished process: its exit code, or `128 + N`
/// when signal N killed it.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| killed_by(status).map(|signal| 128 + signal))
        .unwrap_or(LAUNCH_FAILURE)
}

#[cfg(unix)]
fn killed_by(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn killed_by(_status: ExitStatus) -> Option<i32> {
    None
}

/// Status recorded for a command that failed before or while spawning.
pub const LAUNCH_FAILURE: i32 = 1;
