//! Stream lifecycle — the state machine shared by every streaming call.
//!
//! ```text
//! Idle ──activate──▶ Active ──finish──▶ Completed | Cancelled | Errored
//!   └──────────────────finish──────────────▶ Cancelled | Errored
//! ```
//!
//! Pushes and state mutations only happen while the stream is
//! `Active`. The first terminal state wins; later
//! attempts to finish are ignored so teardown is deterministic.

use std::fmt;

use crate::id::StreamId;

/// How a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The server reached its completion condition or the client ended the stream.
    Completed,
    /// The client went away; no further work was scheduled.
    Cancelled,
    /// An inbound or transport failure closed the stream.
    Errored,
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Errored => f.write_str("errored"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamPhase {
    Idle,
    Active,
    Finished(StreamOutcome),
}

/// Tracks one stream from creation to its terminal state.
#[derive(Debug)]
pub struct StreamLifecycle {
    id: StreamId,
    phase: StreamPhase,
}

impl Default for StreamLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamLifecycle {
    /// A fresh, idle stream with a new id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: StreamId::new(),
            phase: StreamPhase::Idle,
        }
    }

    #[must_use]
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Whether pushes and mutations are currently allowed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == StreamPhase::Active
    }

    /// Move from `Idle` to `Active`. Returns `false` from any other phase.
    pub fn activate(&mut self) -> bool {
        if self.phase != StreamPhase::Idle {
            return false;
        }
        self.phase = StreamPhase::Active;
        true
    }

    /// Enter a terminal phase.
    ///
    /// Returns `false` if the stream had already finished, in which case the
    /// earlier outcome is kept. A stream that never became active can only
    /// be cancelled or fail; completing it is treated as cancellation.
    pub fn finish(&mut self, outcome: StreamOutcome) -> bool {
        match self.phase {
            StreamPhase::Finished(_) => false,
            StreamPhase::Idle if outcome == StreamOutcome::Completed => {
                self.phase = StreamPhase::Finished(StreamOutcome::Cancelled);
                true
            }
            _ => {
                self.phase = StreamPhase::Finished(outcome);
                true
            }
        }
    }

    /// Terminal outcome, if reached.
    #[must_use]
    pub fn outcome(&self) -> Option<StreamOutcome> {
        match self.phase {
            StreamPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}
