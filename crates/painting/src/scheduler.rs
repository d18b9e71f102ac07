//! Frame scheduling for animated brushes
//!
//! Animation runs as a chain of one-shot frame requests: each tick asks for
//! the next one only if it still has work. The scheduler hands out a
//! [`TickHandle`] per request so a requester can cancel it, and so a tick that
//! was already queued when its owner stopped can be recognised as stale.

use std::collections::VecDeque;

use tracing::trace;

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of frame callbacks
pub trait FrameScheduler {
    /// Request one callback on the next frame
    fn schedule_next_tick(&mut self) -> TickHandle;

    /// Withdraw a pending request. Unknown or already-run handles are ignored.
    fn cancel_scheduled(&mut self, handle: TickHandle);
}

/// A scheduler pumped by the host's own frame loop.
///
/// Requests queue up in order; the host calls [`ManualScheduler::pop_due`]
/// once per frame and routes the handle back to the session.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest pending request, if any
    pub fn pop_due(&mut self) -> Option<TickHandle> {
        self.pending.pop_front()
    }

    /// True when no callbacks are waiting
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending.push_back(handle);
        trace!("schedule_next_tick: {:?} ({} pending)", handle, self.pending.len());
        handle
    }

    fn cancel_scheduled(&mut self, handle: TickHandle) {
        self.pending.retain(|pending| *pending != handle);
    }
}
