//! Activation state machine: Idle → Acquiring → Active → Idle.
//!
//! The controller never touches browser APIs. The host asks it what a click
//! means, performs the (async) acquisition itself and reports the outcome
//! back with the attempt id it was given.

use crate::constants::NOTICE_DURATION_MS;
use crate::error::CaptureError;
use instant::Instant;
use std::time::Duration;

/// Identifies one acquisition attempt. Ids only ever increase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Acquiring(AttemptId),
    Active(AttemptId),
}

/// What the host must do in response to a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureAction {
    /// Request the microphone and report back under this id.
    Start(AttemptId),
    /// Release capture and clear the extraction tick.
    Stop,
}

/// Outcome of reporting an acquisition result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Activated,
    /// The attempt was cancelled or superseded; release what it acquired.
    Discarded,
    Failed(CaptureError),
}

/// Transient message shown over the blob.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn expired(&self, now: Instant) -> bool {
        now >= self.shown_at && now - self.shown_at >= Duration::from_millis(NOTICE_DURATION_MS)
    }
}

#[derive(Debug)]
pub struct Controller {
    phase: Phase,
    next_attempt: u64,
    notice: Option<Notice>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            next_attempt: 1,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The activation flag exposed to the host.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    /// A click on the blob.
    pub fn on_gesture(&mut self) -> GestureAction {
        match self.phase {
            Phase::Idle => {
                let id = AttemptId(self.next_attempt);
                self.next_attempt += 1;
                self.phase = Phase::Acquiring(id);
                self.notice = None;
                log::info!("[controller] acquiring (attempt {})", id.0);
                GestureAction::Start(id)
            }
            Phase::Acquiring(_) | Phase::Active(_) => {
                self.stop();
                GestureAction::Stop
            }
        }
    }

    /// Report the outcome of `attempt`. Only the current attempt may change
    /// state; anything else is discarded regardless of its result.
    pub fn resolve(
        &mut self,
        attempt: AttemptId,
        result: Result<(), CaptureError>,
        now: Instant,
    ) -> Resolution {
        if self.phase != Phase::Acquiring(attempt) {
            log::info!("[controller] discarding stale attempt {}", attempt.0);
            return Resolution::Discarded;
        }
        match result {
            Ok(()) => {
                self.phase = Phase::Active(attempt);
                log::info!("[controller] active (attempt {})", attempt.0);
                Resolution::Activated
            }
            Err(e) => {
                self.phase = Phase::Idle;
                log::warn!("[controller] capture failed: {}", e);
                self.notice = Some(Notice {
                    message: e.user_message().to_string(),
                    shown_at: now,
                });
                Resolution::Failed(e)
            }
        }
    }

    /// External teardown. Returns whether anything was running.
    pub fn stop(&mut self) -> bool {
        let was = self.phase;
        self.phase = Phase::Idle;
        match was {
            Phase::Idle => false,
            Phase::Acquiring(id) | Phase::Active(id) => {
                log::info!("[controller] stopped (attempt {})", id.0);
                true
            }
        }
    }

    /// Current notice, if it has not expired yet.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.expired(now))
    }

    /// Drop an expired notice. Returns true when one was removed.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.expired(now)) {
            self.notice = None;
            return true;
        }
        false
    }
}
