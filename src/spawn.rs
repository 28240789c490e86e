//! Launching external programs and reaping their children.
use crate::{Error, Result};
use nix::{
    sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal},
    unistd::{close, execvp, fork, setsid, ForkResult},
};
use std::{ffi::CString, os::unix::io::RawFd, process};
use tracing::debug;

/// The capability to launch external commands on behalf of keybindings.
pub trait Spawner {
    /// Launch `argv` detached from the window manager process.
    fn spawn(&self, argv: &[&str]) -> Result<()>;
}

/// A [`Spawner`] that double-forks so children are not in the window
/// manager's process group and never become its zombies.
///
/// The grandchild closes the display connection file descriptor before
/// exec so that spawned programs do not hold the X connection open, then
/// starts its own session.
#[derive(Debug, Clone, Copy)]
pub struct DetachedSpawner {
    display_fd: Option<RawFd>,
}

impl DetachedSpawner {
    /// Create a spawner that will close `display_fd` in spawned children.
    pub fn new(display_fd: Option<RawFd>) -> Self {
        Self { display_fd }
    }
}

impl Spawner for DetachedSpawner {
    fn spawn(&self, argv: &[&str]) -> Result<()> {
        debug!(?argv, "spawning subprocess");

        let prog = match argv.first() {
            Some(p) => CString::new(*p).map_err(|e| Error::Spawn(e.to_string()))?,
            None => return Ok(()),
        };
        let args: Vec<CString> = argv
            .iter()
            .map(|a| CString::new(*a))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Spawn(e.to_string()))?;

        match unsafe { fork() } {
            Ok(ForkResult::Parent { .. }) => Ok(()),
            Ok(ForkResult::Child) => {
                // the intermediate child exists only to orphan the grandchild:
                // it exits immediately and is reaped by the SIGCHLD handler
                if let Ok(ForkResult::Child) = unsafe { fork() } {
                    if let Some(fd) = self.display_fd {
                        let _ = close(fd);
                    }
                    let _ = setsid();
                    let _ = execvp(&prog, &args);
                    process::exit(1);
                }
                process::exit(0);
            }
            Err(e) => Err(Error::Spawn(e.to_string())),
        }
    }
}

extern "C" fn reap(_: libc::c_int) {
    // restricted to waitpid: everything here must be async-signal-safe
    unsafe { while libc::waitpid(-1, std::ptr::null_mut(), libc::WNOHANG) > 0 {} }
}

/// Install the SIGCHLD handler that reaps finished children with WNOHANG.
pub fn install_sigchld_reaper() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(reap),
        SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
        SigSet::empty(),
    );

    unsafe { sigaction(Signal::SIGCHLD, &action) }
        .map(|_| ())
        .map_err(|_| Error::SigChld)
}
