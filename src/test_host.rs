//! In-memory popup host with a virtual clock.

use core::time::Duration;

use crate::listener::{HostError, PopupHost};

#[derive(Debug, Default)]
pub(crate) struct MemoryHost {
    now: Duration,
    next_id: u64,
    popups: Vec<(u64, String, String)>,
    timers: Vec<(Duration, u64)>,
    pub(crate) fail_appends: bool,
    pub(crate) fail_timers: bool,
}

impl MemoryHost {
    pub(crate) fn live_count(&self) -> usize {
        self.popups.len()
    }

    pub(crate) fn texts(&self) -> Vec<&str> {
        self.popups.iter().map(|(_, _, t)| t.as_str()).collect()
    }

    pub(crate) fn classes(&self) -> Vec<&str> {
        self.popups.iter().map(|(_, c, _)| c.as_str()).collect()
    }

    /// Move the clock forward and fire every timer that is due.
    pub(crate) fn advance(&mut self, by: Duration) {
        self.now += by;
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(deadline, _)| *deadline <= now);
        self.timers = pending;
        for (_, id) in due {
            self.popups.retain(|(p, _, _)| *p != id);
        }
    }
}

impl PopupHost for MemoryHost {
    type Popup = u64;

    fn append_popup(&mut self, class: &str, text: &str) -> Result<u64, HostError> {
        if self.fail_appends {
            return Err(HostError::Dom("append_child failed".to_string()));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.popups.push((id, class.to_string(), text.to_string()));
        Ok(id)
    }

    fn remove_after(&mut self, popup: u64, delay: Duration) -> Result<(), HostError> {
        if self.fail_timers {
            return Err(HostError::Dom("setTimeout failed".to_string()));
        }
        self.timers.push((self.now + delay, popup));
        Ok(())
    }

    fn remove_now(&mut self, popup: &u64) {
        self.popups.retain(|(p, _, _)| p != popup);
    }
}
