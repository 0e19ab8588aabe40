// SIGINT handling for interactive mode.
//
// The handler runs asynchronously, so it only writes a newline and records
// what kind of redraw the interactive loop owes the terminal.  The loop
// applies the redraw through its LineEditor once control is back in
// ordinary code.

use anyhow::{Context, Result};
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd;
use tracing::debug;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Redraw {
    WithPrompt,
    WithoutPrompt,
}

const NO_REDRAW: u8 = 0;
const WITHOUT_PROMPT: u8 = 1;
const WITH_PROMPT: u8 = 2;

// True only while the interactive loop is blocked reading a line.
// The handler may observe a stale value; the worst case is a redraw of
// the wrong kind.
static AWAITING_INPUT: AtomicBool = AtomicBool::new(false);
static PENDING_REDRAW: AtomicU8 = AtomicU8::new(NO_REDRAW);

extern "C" fn handle_sigint(signo: libc::c_int) {
    if signo != libc::SIGINT {
        return;
    }

    let _ = unistd::write(libc::STDOUT_FILENO, b"\n");

    let redraw = if AWAITING_INPUT.load(Ordering::Acquire) {
        WITH_PROMPT
    } else {
        WITHOUT_PROMPT
    };
    PENDING_REDRAW.store(redraw, Ordering::Release);
}

pub fn set_awaiting_input(awaiting: bool) {
    AWAITING_INPUT.store(awaiting, Ordering::Release);
}

#[cfg(test)]
pub fn is_awaiting_input() -> bool {
    AWAITING_INPUT.load(Ordering::Acquire)
}

pub fn take_pending_redraw() -> Option<Redraw> {
    match PENDING_REDRAW.swap(NO_REDRAW, Ordering::AcqRel) {
        WITH_PROMPT => Some(Redraw::WithPrompt),
        WITHOUT_PROMPT => Some(Redraw::WithoutPrompt),
        _ => None,
    }
}

// Installs the SIGINT handler; the previous disposition comes back on drop.
pub struct InterruptHandler {
    previous: SigAction,
}

impl InterruptHandler {
    pub fn install() -> Result<InterruptHandler> {
        PENDING_REDRAW.store(NO_REDRAW, Ordering::Release);

        // Restart reads interrupted by the signal instead of failing them
        let action = SigAction::new(
            SigHandler::Handler(handle_sigint),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        // SAFETY: the handler only touches atomics and calls write(2)
        let previous = unsafe { signal::sigaction(Signal::SIGINT, &action) }
            .context("unable to install the SIGINT handler")?;

        debug!("SIGINT handler installed");

        Ok(InterruptHandler { previous })
    }
}

impl Drop for InterruptHandler {
    fn drop(&mut self) {
        // SAFETY: restores the disposition that was in place before install()
        let _ = unsafe { signal::sigaction(Signal::SIGINT, &self.previous) };

        AWAITING_INPUT.store(false, Ordering::Release);

        debug!("SIGINT handler restored");
    }
}
