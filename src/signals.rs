//! Signal dispositions for an interactive session.
//!
//! The shell ignores the keyboard quit and suspend signals so it cannot be
//! killed with Ctrl-\ or stopped with Ctrl-Z. Ignored dispositions survive
//! `exec`, so every child puts them back to `SIG_DFL` before it starts.

#[cfg(unix)]
use std::io;

#[cfg(unix)]
const KEYBOARD_SIGNALS: [libc::c_int; 2] = [libc::SIGQUIT, libc::SIGTSTP];

#[cfg(unix)]
fn set_disposition(signal: libc::c_int, handler: libc::sighandler_t) -> io::Result<()> {
    let previous = unsafe { libc::signal(signal, handler) };
    if previous == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Ignore SIGQUIT and SIGTSTP in the shell process.
#[cfg(unix)]
pub fn ignore_keyboard_signals() -> io::Result<()> {
    for signal in KEYBOARD_SIGNALS {
        set_disposition(signal, libc::SIG_IGN)?;
    }
    Ok(())
}

/// Restore default dispositions. Runs in the forked child before `exec`,
/// so it only calls `signal(2)`, which is async-signal-safe.
#[cfg(unix)]
pub fn restore_keyboard_signals() -> io::Result<()> {
    for signal in KEYBOARD_SIGNALS {
        set_disposition(signal, libc::SIG_DFL)?;
    }
    Ok(())
}

/// Install [`restore_keyboard_signals`] as a pre-exec hook on `command`.
#[cfg(unix)]
pub fn reset_in_child(command: &mut std::process::Command) {
    use std::os::unix::process::CommandExt;

    // SAFETY: the hook only calls signal(2), which is async-signal-safe,
    // and touches no memory shared with the parent.
    unsafe {
        command.pre_exec(restore_keyboard_signals);
    }
}

#[cfg(not(unix))]
pub fn reset_in_child(_command: &mut std::process::Command) {}
