//! Timers that feed the single simulation clock
//!
//! Two clocks drive a round: the host's per-frame callback and a slower
//! wall-clock decay timer. The decay timer never touches state directly; it
//! enqueues [`SimEvent`]s that the next tick drains before doing anything
//! else, so all mutation happens on one logical clock.
//!
//! Frame scheduling uses generation-stamped tokens. Cancelling bumps the
//! generation, which turns every outstanding token stale: a frame callback
//! that was already queued by the host becomes a no-op instead of mutating a
//! freshly reset round.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Work queued for the start of the next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Apply passive decay this many times
    Decay { intervals: u32 },
    /// Rendering surface changed size (pixels)
    Resize { width: f32, height: f32 },
}

/// FIFO of pending simulation events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: VecDeque<SimEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: SimEvent) {
        self.events.push_back(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Fixed-interval wall-clock timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayTimer {
    interval_ms: f64,
    next_due_ms: Option<f64>,
}

impl DecayTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_due_ms: None,
        }
    }

    /// Start counting from `now_ms`
    pub fn arm(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    /// Number of whole intervals that elapsed up to `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(due) = self.next_due_ms else {
            return 0;
        };
        if now_ms < due {
            return 0;
        }
        let fired = ((now_ms - due) / self.interval_ms).floor() as u32 + 1;
        self.next_due_ms = Some(due + fired as f64 * self.interval_ms);
        fired
    }
}

/// Handle for one scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameToken {
    generation: u32,
    seq: u64,
}

/// At most one pending frame at a time; cancellation invalidates old tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameScheduler {
    generation: u32,
    next_seq: u64,
    pending: Option<FrameToken>,
}

impl FrameScheduler {
    /// Request the next frame. Replaces any pending request.
    pub fn schedule(&mut self) -> FrameToken {
        let token = FrameToken {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending = Some(token);
        token
    }

    /// Claim a delivered frame. False for stale or superseded tokens.
    pub fn take(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Drop the pending frame and invalidate every token handed out so far
    pub fn cancel_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}
