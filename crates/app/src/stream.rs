//! Plumbing shared by the streaming use-cases.
//!
//! A streaming call is a task that talks to its transport through channels:
//! an [`Inbound`] receiver for client messages and an `mpsc::Sender` for
//! server pushes. Dropping the outbound receiver is the cancellation signal;
//! every streaming loop watches `Sender::closed` alongside its other work.

use std::time::Duration;

use tokio::sync::mpsc;

use hearth_domain::error::StreamError;
use hearth_domain::id::StreamId;
use hearth_domain::stream::StreamOutcome;

/// Client-to-server half of a stream.
///
/// The transport closes the channel on end-of-stream and sends an `Err`
/// when the stream breaks.
pub type Inbound<T> = mpsc::Receiver<Result<T, StreamError>>;

/// Timing knobs for server-push streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    /// Delay between two pushes (and before the first one).
    pub interval: Duration,
    /// Number of pushes after which the server completes the stream.
    pub push_count: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            push_count: 5,
        }
    }
}

/// What happened on a stream that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub id: StreamId,
    pub outcome: StreamOutcome,
    /// Messages the server pushed to the client.
    pub sent: usize,
    /// Messages the server consumed from the client.
    pub received: usize,
}
