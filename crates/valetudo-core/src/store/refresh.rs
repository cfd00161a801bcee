// ── Background refresh timer ──
//
// At most one timer is armed at a time. Arming always clears the previous
// timer first, and every arm gets a new generation number so a timer that
// fires late can tell it has been superseded.

use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    deadline: Instant,
    handle: AbortHandle,
}

#[derive(Debug, Default)]
pub struct RefreshTimer {
    armed: Option<ArmedTimer>,
    generation: u64,
}

impl RefreshTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|t| t.deadline)
    }

    /// Abort the pending timer, if any. Returns whether one was armed.
    pub fn clear(&mut self) -> bool {
        match self.armed.take() {
            Some(timer) => {
                trace!(generation = timer.generation, "clearing refresh timer");
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Arm a new timer firing at `deadline`.
    ///
    /// `spawn` receives the new generation and returns the handle of the
    /// task that will fire it.
    pub(crate) fn arm<F>(&mut self, deadline: Instant, spawn: F) -> u64
    where
        F: FnOnce(u64) -> AbortHandle,
    {
        self.clear();
        self.generation += 1;
        let generation = self.generation;
        let handle = spawn(generation);
        self.armed = Some(ArmedTimer {
            generation,
            deadline,
            handle,
        });
        generation
    }

    /// Called by a firing timer task. Disarms only if `generation` is still
    /// the armed one, without aborting the caller's own task.
    pub(crate) fn disarm_if_current(&mut self, generation: u64) -> bool {
        if self.armed.as_ref().is_some_and(|t| t.generation == generation) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.clear();
    }
}
