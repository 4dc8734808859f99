use std::sync::atomic::{AtomicBool, Ordering};
use anyhow::Result;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_signal(_sig: i32) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Replaces the default SIGINT/SIGTERM behaviour with a flag.
///
/// The process is no longer killed outright; instead the installer notices
/// the flag at its next checkpoint and unwinds, so the work directory is
/// removed like on any other error. The handler resets itself, so a second
/// signal terminates the process the default way.
pub fn install_signal_handlers() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESETHAND,
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { signal::sigaction(sig, &action) }
            .map_err(|e| anyhow::anyhow!("Failed to register {sig:?} handler: {e}"))?;
    }
    Ok(())
}

/// Whether SIGINT or SIGTERM has been received.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

