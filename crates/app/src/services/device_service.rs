//! Device service — switching smart devices on and off over a
//! bidirectional stream.

use tokio::sync::mpsc;
use tracing::Instrument;

use hearth_domain::device::{DeviceAction, DeviceType};
use hearth_domain::error::{StreamError, ValidationError};
use hearth_domain::room::RoomId;
use hearth_domain::stream::{StreamLifecycle, StreamOutcome};

use crate::ports::HomeStateStore;
use crate::stream::{Inbound, StreamSummary};

/// A `{room, deviceType, action}` command as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub room: String,
    pub device_type: String,
    pub action: String,
}

/// Acknowledgment pushed for every inbound [`DeviceCommand`], in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAck {
    pub success: bool,
}

/// A device that is currently switched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineDevice {
    pub device_type: DeviceType,
    pub room: RoomId,
}

/// Application service for device control.
pub struct DeviceService<S> {
    store: S,
}

impl<S: HomeStateStore> DeviceService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Apply one command to the device registry.
    ///
    /// `on` stores the device in the given room, replacing any earlier
    /// room. `off` removes it; the room is not consulted.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an unknown action, a blank device
    /// type, or (for `on`) an unknown room. The registry is unchanged then.
    pub fn apply(&self, command: &DeviceCommand) -> Result<DeviceAction, ValidationError> {
        let action = DeviceAction::parse(&command.action)?;
        let device = DeviceType::new(command.device_type.as_str())?;

        match action {
            DeviceAction::On => {
                let room = RoomId::parse(&command.room)?;
                tracing::info!(%device, %room, "device switched on");
                self.store.set_device_online(device, room);
            }
            DeviceAction::Off => {
                tracing::info!(%device, "device switched off");
                self.store.set_device_offline(device.as_str());
            }
        }
        Ok(action)
    }

    /// All devices currently switched on, sorted by device type.
    pub fn online_devices(&self) -> Vec<OnlineDevice> {
        self.store
            .online_devices()
            .into_iter()
            .map(|(device_type, room)| OnlineDevice { device_type, room })
            .collect()
    }

    fn online_summary(&self) -> String {
        self.store
            .online_devices()
            .iter()
            .map(|(device, _)| device.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Serve one device control stream.
    ///
    /// Every inbound command is applied and acknowledged before the next one
    /// is read, so `ack[i]` always answers `command[i]`. Commands that fail
    /// validation are logged and acknowledged with `success: false`.
    /// The stream completes when the client ends its side, and is cancelled
    /// as soon as the receiver of `outbound` is dropped.
    ///
    /// # Errors
    ///
    /// Returns the [`StreamError`] the transport reported. No acknowledgment
    /// is sent for it or for anything after it.
    pub async fn stream_device_control(
        &self,
        mut inbound: Inbound<DeviceCommand>,
        outbound: mpsc::Sender<DeviceAck>,
    ) -> Result<StreamSummary, StreamError> {
        let mut lifecycle = StreamLifecycle::new();
        let span = tracing::info_span!("stream_device_control", stream_id = %lifecycle.id());

        async move {
            lifecycle.activate();
            let mut received = 0;
            let mut sent = 0;

            let outcome = loop {
                let message = tokio::select! {
                    biased;
                    () = outbound.closed() => break StreamOutcome::Cancelled,
                    message = inbound.recv() => message,
                };

                let command = match message {
                    None => break StreamOutcome::Completed,
                    Some(Ok(command)) => command,
                    Some(Err(err)) => {
                        lifecycle.finish(StreamOutcome::Errored);
                        tracing::error!(error = %err, "error in device control stream");
                        return Err(err);
                    }
                };
                received += 1;

                let success = match self.apply(&command) {
                    Ok(_) => true,
                    Err(err) => {
                        tracing::warn!(error = %err, "rejecting device command");
                        false
                    }
                };
                tracing::debug!(online = %self.online_summary(), "currently online devices");

                if outbound.send(DeviceAck { success }).await.is_err() {
                    break StreamOutcome::Cancelled;
                }
                sent += 1;
            };

            lifecycle.finish(outcome);
            tracing::info!(%outcome, received, sent, "device control stream ended");

            Ok(StreamSummary {
                id: lifecycle.id(),
                outcome,
                sent,
                received,
            })
        }
        .instrument(span)
        .await
    }
}
