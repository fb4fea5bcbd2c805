//! Debounced preview scheduling.
//!
//! `PreviewDebouncer` does not own a thread or timer. Every edit calls
//! [`schedule`](PreviewDebouncer::schedule), which restarts the quiet
//! period; the caller polls [`poll`](PreviewDebouncer::poll) from its tick
//! and requests a preview when it returns `true`.

use std::time::{Duration, Instant};

use tracing::debug;

/// Restartable one-shot timer for preview generation.
#[derive(Debug)]
pub struct PreviewDebouncer {
    /// Quiet period after the last edit.
    delay: Duration,
    /// When the pending request fires, if one is pending.
    deadline: Option<Instant>,
    enabled: bool,
}

impl PreviewDebouncer {
    pub fn new(delay_ms: u64, enabled: bool) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            deadline: None,
            enabled,
        }
    }

    /// Start or restart the quiet period from `now`. Ignored while disabled.
    pub fn schedule(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }
        if self.deadline.is_some() {
            debug!("Preview request rescheduled");
        }
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("Pending preview request cancelled");
        }
    }

    /// Returns `true` once when the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending request fires. Zero when due or idle.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline
            .map_or(Duration::ZERO, |deadline| deadline.saturating_duration_since(now))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling also cancels a pending request.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel();
        }
        debug!(enabled, "Auto-preview enabled state changed");
    }
}
