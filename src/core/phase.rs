//! # Group lifecycle phase.
//!
//! ```text
//! Idle ──start()──► Starting ──all launched──► Running
//!   │                   │                         │
//!   │ stop()            └──────── stop() ─────────┤
//!   ▼                                             ▼
//! Stopped ◄──────────── fan-out done ────────── Stopping
//! ```
//!
//! [`PhaseCell`] stores the phase in an atomic. Entering `Stopping` (or `Stopped`
//! straight from `Idle`) goes through a compare-and-swap, so exactly one caller
//! wins; that CAS is the group's stop guard.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of a [`Group`](crate::Group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, not started.
    Idle,
    /// `start` is launching start tasks.
    Starting,
    /// Every start task has been launched.
    Running,
    /// Stop fan-out in progress.
    Stopping,
    /// Terminal.
    Stopped,
}

impl Phase {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Phase::Idle,
            1 => Phase::Starting,
            2 => Phase::Running,
            3 => Phase::Stopping,
            _ => Phase::Stopped,
        }
    }

    /// Returns `true` once a stop has been initiated.
    pub fn is_stopping(self) -> bool {
        matches!(self, Phase::Stopping | Phase::Stopped)
    }
}

/// Atomic holder for [`Phase`].
#[derive(Debug)]
pub(crate) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(Phase::Idle as u8))
    }

    pub(crate) fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves `from → to`; returns the actual phase on mismatch.
    pub(crate) fn transition(&self, from: Phase, to: Phase) -> Result<(), Phase> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(Phase::from_u8)
    }

    /// Claims the stop.
    ///
    /// Returns the phase the group was in if this caller won, `None` if a stop
    /// was already initiated. From `Idle` the group goes directly to `Stopped`.
    pub(crate) fn begin_stop(&self) -> Option<Phase> {
        let mut current = self.get();
        loop {
            let target = match current {
                Phase::Stopping | Phase::Stopped => return None,
                Phase::Idle => Phase::Stopped,
                Phase::Starting | Phase::Running => Phase::Stopping,
            };
            match self.transition(current, target) {
                Ok(()) => return Some(current),
                Err(actual) => current = actual,
            }
        }
    }

    /// Marks the fan-out as finished.
    pub(crate) fn finish_stop(&self) {
        self.0.store(Phase::Stopped as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn start_path_transitions() {
        let cell = PhaseCell::new();
        assert_eq!(cell.get(), Phase::Idle);
        assert!(cell.transition(Phase::Idle, Phase::Starting).is_ok());
        assert_eq!(cell.transition(Phase::Idle, Phase::Starting), Err(Phase::Starting));
        assert!(cell.transition(Phase::Starting, Phase::Running).is_ok());
        assert_eq!(cell.get(), Phase::Running);
    }

    #[test]
    fn stop_from_idle_is_terminal() {
        let cell = PhaseCell::new();
        assert_eq!(cell.begin_stop(), Some(Phase::Idle));
        assert_eq!(cell.get(), Phase::Stopped);
        assert_eq!(cell.begin_stop(), None);
        assert!(cell.transition(Phase::Idle, Phase::Starting).is_err());
    }

    #[test]
    fn stop_while_starting_blocks_running() {
        let cell = PhaseCell::new();
        cell.transition(Phase::Idle, Phase::Starting).unwrap();
        assert_eq!(cell.begin_stop(), Some(Phase::Starting));
        assert_eq!(cell.transition(Phase::Starting, Phase::Running), Err(Phase::Stopping));
        assert!(cell.get().is_stopping());
        cell.finish_stop();
        assert_eq!(cell.get(), Phase::Stopped);
    }

    #[test]
    fn concurrent_begin_stop_has_one_winner() {
        let cell = Arc::new(PhaseCell::new());
        cell.transition(Phase::Idle, Phase::Starting).unwrap();
        cell.transition(Phase::Starting, Phase::Running).unwrap();

        let winners = Arc::new(AtomicUsize::new(0));
        let threads: Vec<_> = (0..16)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    if cell.begin_stop().is_some() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(cell.get(), Phase::Stopping);
    }
}
