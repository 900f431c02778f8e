//! Thermostat service — room temperatures, one-off and streamed.

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::Instrument;

use hearth_domain::error::HearthError;
use hearth_domain::room::RoomId;
use hearth_domain::stream::{StreamLifecycle, StreamOutcome};
use hearth_domain::temperature::Temperature;

use crate::ports::HomeStateStore;
use crate::stream::{StreamSettings, StreamSummary};

/// One push of a temperature stream, in the order the rooms were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSnapshot {
    pub temperatures: Vec<Temperature>,
}

/// Application service for thermostat calls.
pub struct ThermostatService<S> {
    store: S,
    settings: StreamSettings,
}

impl<S: HomeStateStore> ThermostatService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S, settings: StreamSettings) -> Self {
        Self { store, settings }
    }

    /// Set the temperature of a room and return the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `room` is not `1..=5`; the
    /// store is left untouched.
    pub fn set_temperature(&self, room: &str, celsius: f64) -> Result<Temperature, HearthError> {
        let room = RoomId::parse(room)?;
        let temperature = Temperature::new(celsius);
        self.store.set_temperature(room, temperature);
        tracing::info!(%room, %temperature, "temperature set");
        Ok(temperature)
    }

    /// Read the current temperature of a room.
    ///
    /// # Errors
    ///
    /// Returns [`HearthError::Validation`] when `room` is not `1..=5`.
    pub fn get_temperature(&self, room: &str) -> Result<Temperature, HearthError> {
        let room = RoomId::parse(room)?;
        let temperature = self.store.temperature(room);
        tracing::debug!(%room, %temperature, "temperature read");
        Ok(temperature)
    }

    /// Push a snapshot of the requested rooms every tick until
    /// `push_count` snapshots were sent or the client goes away.
    ///
    /// Unrecognized rooms are not rejected here: they read as
    /// [`Temperature::UNSET`]. The first push happens one interval after the
    /// call starts. Cancellation (the receiver of `outbound` being dropped)
    /// is observed immediately, even mid-interval, and stops the ticker.
    pub async fn stream_temperatures(
        &self,
        rooms: &[String],
        outbound: mpsc::Sender<TemperatureSnapshot>,
    ) -> StreamSummary {
        let mut lifecycle = StreamLifecycle::new();
        let span = tracing::info_span!("stream_temperatures", stream_id = %lifecycle.id());

        async move {
            let slots: Vec<Option<RoomId>> =
                rooms.iter().map(|raw| RoomId::parse(raw).ok()).collect();
            let interval = self.settings.interval;
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            lifecycle.activate();
            tracing::debug!(rooms = ?rooms, "temperature stream active");

            let mut sent = 0;
            let mut outcome = StreamOutcome::Completed;
            while lifecycle.is_active() && sent < self.settings.push_count {
                tokio::select! {
                    biased;
                    () = outbound.closed() => {
                        outcome = StreamOutcome::Cancelled;
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let snapshot = TemperatureSnapshot {
                    temperatures: self.store.temperatures(&slots),
                };
                if outbound.send(snapshot).await.is_err() {
                    outcome = StreamOutcome::Cancelled;
                    break;
                }
                sent += 1;
            }

            lifecycle.finish(outcome);
            tracing::debug!(%outcome, sent, "temperature stream finished");

            StreamSummary {
                id: lifecycle.id(),
                outcome,
                sent,
                received: 0,
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use hearth_domain::error::ValidationError;

    use crate::state_store::InMemoryStateStore;

    fn make_service() -> ThermostatService<Arc<InMemoryStateStore>> {
        ThermostatService::new(Arc::new(InMemoryStateStore::new()), StreamSettings::default())
    }

    #[test]
    fn should_return_value_that_was_set_for_every_room() {
        let svc = make_service();
        for (room, value) in [("1", 21.0), ("2", 18.5), ("3", -2.0), ("4", 23.25), ("5", 9.0)] {
            assert_eq!(svc.set_temperature(room, value).unwrap().celsius(), value);
            assert_eq!(svc.get_temperature(room).unwrap().celsius(), value);
        }
    }

    #[test]
    fn should_reject_invalid_room_without_mutation() {
        let svc = make_service();
        svc.set_temperature("1", 21.0).unwrap();

        let result = svc.set_temperature("6", 20.0);
        assert!(matches!(
            result,
            Err(HearthError::Validation(ValidationError::InvalidRoom(ref room))) if room == "6"
        ));

        assert_eq!(svc.get_temperature("1").unwrap(), Temperature::new(21.0));
        for room in ["2", "3", "4", "5"] {
            assert_eq!(svc.get_temperature(room).unwrap(), Temperature::UNSET);
        }
    }

    #[test]
    fn should_not_coerce_padded_or_prefixed_room_numbers() {
        let svc = make_service();
        for raw in ["01", "+1", " 1", "1\n", "001"] {
            assert!(matches!(
                svc.set_temperature(raw, 30.0),
                Err(HearthError::Validation(ValidationError::InvalidRoom(_)))
            ));
        }
        assert_eq!(svc.get_temperature("1").unwrap(), Temperature::UNSET);
    }

    #[test]
    fn should_reject_get_for_invalid_room() {
        let svc = make_service();
        assert!(matches!(
            svc.get_temperature("0"),
            Err(HearthError::Validation(ValidationError::InvalidRoom(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_push_exactly_five_snapshots_then_complete() {
        let svc = make_service();
        svc.set_temperature("1", 22.0).unwrap();
        let (tx, mut rx) = mpsc::channel(16);

        let summary = svc.stream_temperatures(&["1".to_string()], tx).await;
        assert_eq!(summary.outcome, StreamOutcome::Completed);
        assert_eq!(summary.sent, 5);

        let mut received = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            received.push(snapshot);
        }
        assert_eq!(received.len(), 5);
        for snapshot in received {
            assert_eq!(snapshot.temperatures, vec![Temperature::new(22.0)]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_map_unknown_rooms_to_unset_in_request_order() {
        let svc = make_service();
        svc.set_temperature("3", 20.0).unwrap();
        let (tx, mut rx) = mpsc::channel(16);

        let rooms = ["3".to_string(), "9".to_string(), "1".to_string()];
        svc.stream_temperatures(&rooms, tx).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first.temperatures,
            vec![Temperature::new(20.0), Temperature::UNSET, Temperature::UNSET]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_one_interval_before_first_push() {
        let svc = Arc::new(make_service());
        let (tx, mut rx) = mpsc::channel(16);
        let started = Instant::now();

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.stream_temperatures(&["2".to_string()], tx).await })
        };

        rx.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        drop(rx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn should_reflect_updates_made_while_streaming() {
        let svc = Arc::new(make_service());
        let (tx, mut rx) = mpsc::channel(16);

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.stream_temperatures(&["4".to_string()], tx).await })
        };

        assert_eq!(rx.recv().await.unwrap().temperatures, vec![Temperature::UNSET]);
        svc.set_temperature("4", 24.0).unwrap();
        assert_eq!(
            rx.recv().await.unwrap().temperatures,
            vec![Temperature::new(24.0)]
        );

        drop(rx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_pushing_when_client_cancels_after_two_messages() {
        let svc = Arc::new(make_service());
        let (tx, mut rx) = mpsc::channel(16);

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.stream_temperatures(&["1".to_string()], tx).await })
        };

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        drop(rx);

        let summary = task.await.unwrap();
        assert_eq!(summary.outcome, StreamOutcome::Cancelled);
        assert_eq!(summary.sent, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_observe_cancellation_before_next_tick() {
        let svc = Arc::new(make_service());
        let (tx, rx) = mpsc::channel(16);
        let started = Instant::now();

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.stream_temperatures(&["1".to_string()], tx).await })
        };

        tokio::time::sleep(Duration::from_millis(300)).await;
        drop(rx);

        let summary = task.await.unwrap();
        assert_eq!(summary.outcome, StreamOutcome::Cancelled);
        assert_eq!(summary.sent, 0);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn should_honour_configured_push_count() {
        let svc = ThermostatService::new(
            Arc::new(InMemoryStateStore::new()),
            StreamSettings {
                interval: Duration::from_millis(10),
                push_count: 2,
            },
        );
        let (tx, mut rx) = mpsc::channel(16);

        let summary = svc.stream_temperatures(&[], tx).await;
        assert_eq!(summary.sent, 2);
        assert_eq!(rx.recv().await.unwrap().temperatures, Vec::new());
    }
}
