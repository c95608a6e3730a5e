//! One-shot broadcast used to stop the refresh loop.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use web_time::Instant;

/// A flag that goes from unset to set exactly once and wakes everyone waiting on it.
#[derive(Debug, Default)]
pub(crate) struct FinishSignal {
    fired: Mutex<bool>,
    cond: Condvar,
}

impl FinishSignal {
    /// Sets the signal. Returns `true` only for the call that actually set it.
    pub(crate) fn fire(&self) -> bool {
        let mut fired = self.fired.lock();
        if *fired {
            return false;
        }
        *fired = true;
        self.cond.notify_all();
        true
    }

    pub(crate) fn is_fired(&self) -> bool {
        *self.fired.lock()
    }

    /// Blocks for at most `timeout`, returning early once the signal fires.
    ///
    /// Returns whether the signal has fired. Any `timeout`, including
    /// [`Duration::MAX`], is valid.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let begin = Instant::now();
        let mut fired = self.fired.lock();
        while !*fired {
            let remaining = timeout.saturating_sub(begin.elapsed());
            if remaining.is_zero() || self.cond.wait_for(&mut fired, remaining).timed_out() {
                break;
            }
        }
        *fired
    }
}
