//! Security service — room locks and batched security actions.

use tracing::Instrument;

use hearth_domain::error::{HearthError, StreamError, ValidationError};
use hearth_domain::room::RoomId;
use hearth_domain::security::{LockState, SecurityAction};
use hearth_domain::stream::{StreamLifecycle, StreamOutcome};

use crate::ports::HomeStateStore;
use crate::stream::{Inbound, StreamSummary};

/// A single `{action, room}` pair as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityActionRequest {
    pub action: String,
    pub room: String,
}

/// One client message of a security action stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityBatch {
    pub actions: Vec<SecurityActionRequest>,
}

/// Result of a security action stream that reached end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityReport {
    pub stream: StreamSummary,
    /// Actions that named a known action and room.
    pub accepted: usize,
    /// Actions that were logged and skipped.
    pub skipped: usize,
}

/// Application service for lock control.
pub struct SecurityService<S> {
    store: S,
}

impl<S: HomeStateStore> SecurityService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lock (`on = true`) or unlock a room and persist the new state.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `room` is not `1..=5`.
    pub fn lock_on_off(&self, room: &str, on: bool) -> Result<LockState, HearthError> {
        let room = RoomId::parse(room)?;
        let state = LockState::from(on);
        self.store.set_lock(room, state);
        tracing::info!(%room, lock = %state, "room lock changed");
        Ok(state)
    }

    /// Read the persisted lock state of a room.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `room` is not `1..=5`.
    pub fn lock_state(&self, room: &str) -> Result<LockState, HearthError> {
        let room = RoomId::parse(room)?;
        Ok(self.store.lock_state(room))
    }

    /// Consume batches of security actions until the client ends the stream.
    ///
    /// Each action is validated and logged; unrecognized actions or rooms are
    /// warned about and skipped without closing the stream. Actions are not
    /// applied to the lock state. The caller acknowledges exactly once, when
    /// this returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the [`StreamError`] the transport reported; nothing is
    /// acknowledged in that case.
    pub async fn stream_security_actions(
        &self,
        mut inbound: Inbound<SecurityBatch>,
    ) -> Result<SecurityReport, StreamError> {
        let mut lifecycle = StreamLifecycle::new();
        let span = tracing::info_span!("stream_security_actions", stream_id = %lifecycle.id());

        async move {
            lifecycle.activate();
            let mut received = 0;
            let mut accepted = 0;
            let mut skipped = 0;

            while let Some(message) = inbound.recv().await {
                let batch = match message {
                    Ok(batch) => batch,
                    Err(err) => {
                        lifecycle.finish(StreamOutcome::Errored);
                        tracing::error!(error = %err, "error in security actions stream");
                        return Err(err);
                    }
                };
                received += 1;

                for request in &batch.actions {
                    match validate(request) {
                        Ok((action, room)) => {
                            accepted += 1;
                            tracing::info!(%action, %room, "received security action");
                        }
                        Err(err) => {
                            skipped += 1;
                            tracing::warn!(error = %err, "skipping security action");
                        }
                    }
                }
            }

            lifecycle.finish(StreamOutcome::Completed);
            tracing::info!(batches = received, accepted, skipped, "security actions stream ended");

            Ok(SecurityReport {
                stream: StreamSummary {
                    id: lifecycle.id(),
                    outcome: StreamOutcome::Completed,
                    sent: 1,
                    received,
                },
                accepted,
                skipped,
            })
        }
        .instrument(span)
        .await
    }
}

fn validate(request: &SecurityActionRequest) -> Result<(SecurityAction, RoomId), ValidationError> {
    let action = SecurityAction::parse(&request.action)?;
    let room = RoomId::parse(&request.room)?;
    Ok((action, room))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use crate::state_store::InMemoryStateStore;

    fn make_service() -> (SecurityService<Arc<InMemoryStateStore>>, Arc<InMemoryStateStore>) {
        let store = Arc::new(InMemoryStateStore::new());
        (SecurityService::new(Arc::clone(&store)), store)
    }

    fn batch(actions: &[(&str, &str)]) -> SecurityBatch {
        SecurityBatch {
            actions: actions
                .iter()
                .map(|(action, room)| SecurityActionRequest {
                    action: (*action).to_string(),
                    room: (*room).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn should_persist_lock_state() {
        let (svc, store) = make_service();

        assert_eq!(svc.lock_on_off("2", true).unwrap(), LockState::Locked);
        assert_eq!(store.lock_state(RoomId::MasterBedroom), LockState::Locked);
        assert_eq!(svc.lock_state("2").unwrap(), LockState::Locked);

        svc.lock_on_off("2", false).unwrap();
        assert_eq!(svc.lock_state("2").unwrap(), LockState::Unlocked);
    }

    #[test]
    fn should_reject_lock_for_invalid_room() {
        let (svc, _) = make_service();
        assert!(matches!(
            svc.lock_on_off("7", true),
            Err(HearthError::Validation(ValidationError::InvalidRoom(_)))
        ));
        for room in RoomId::all() {
            assert_eq!(svc.lock_state(&room.number().to_string()).unwrap(), LockState::Unlocked);
        }
    }

    #[tokio::test]
    async fn should_acknowledge_once_after_end_of_stream() {
        let (svc, _) = make_service();
        let (tx, rx) = mpsc::channel(8);

        tx.send(Ok(batch(&[("LOCK_ON", "1")]))).await.unwrap();
        tx.send(Ok(batch(&[("LOCK_OFF", "1")]))).await.unwrap();
        drop(tx);

        let report = svc.stream_security_actions(rx).await.unwrap();
        assert_eq!(report.stream.outcome, StreamOutcome::Completed);
        assert_eq!(report.stream.received, 2);
        assert_eq!(report.stream.sent, 1);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped, 0);
    }

    #[tokio::test]
    async fn should_skip_invalid_actions_without_closing_stream() {
        let (svc, _) = make_service();
        let (tx, rx) = mpsc::channel(8);

        tx.send(Ok(batch(&[("LOCK_SIDEWAYS", "1"), ("LOCK_ON", "9")])))
            .await
            .unwrap();
        tx.send(Ok(batch(&[("LOCK_ON", "3")]))).await.unwrap();
        drop(tx);

        let report = svc.stream_security_actions(rx).await.unwrap();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped, 2);
    }

    #[tokio::test]
    async fn should_not_touch_lock_state_when_streaming_actions() {
        let (svc, store) = make_service();
        let (tx, rx) = mpsc::channel(8);

        tx.send(Ok(batch(&[("LOCK_ON", "5")]))).await.unwrap();
        drop(tx);

        svc.stream_security_actions(rx).await.unwrap();
        assert_eq!(store.lock_state(RoomId::Garage), LockState::Unlocked);
    }

    #[tokio::test]
    async fn should_propagate_inbound_error_without_acknowledging() {
        let (svc, _) = make_service();
        let (tx, rx) = mpsc::channel(8);

        tx.send(Ok(batch(&[("LOCK_ON", "1")]))).await.unwrap();
        tx.send(Err(StreamError::Disconnected)).await.unwrap();
        tx.send(Ok(batch(&[("LOCK_OFF", "1")]))).await.unwrap();
        drop(tx);

        let result = svc.stream_security_actions(rx).await;
        assert_eq!(result, Err(StreamError::Disconnected));
    }

    #[tokio::test]
    async fn should_complete_empty_stream() {
        let (svc, _) = make_service();
        let (tx, rx) = mpsc::channel::<Result<SecurityBatch, StreamError>>(1);
        drop(tx);

        let report = svc.stream_security_actions(rx).await.unwrap();
        assert_eq!(report.stream.received, 0);
        assert_eq!(report.accepted, 0);
    }
}
