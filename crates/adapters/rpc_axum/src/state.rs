//! Shared state for the RPC handlers.

use std::sync::Arc;

use hearth_app::ports::HomeStateStore;
use hearth_app::services::device_service::DeviceService;
use hearth_app::services::security_service::SecurityService;
use hearth_app::services::thermostat_service::ThermostatService;

/// Default capacity of the per-stream inbound and outbound channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Services shared across all RPC handlers.
///
/// Generic over the state store to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`;
/// only the `Arc` wrappers are cloned.
pub struct RpcState<S> {
    /// Thermostat service.
    pub thermostat: Arc<ThermostatService<S>>,
    /// Security service.
    pub security: Arc<SecurityService<S>>,
    /// Device service.
    pub device: Arc<DeviceService<S>>,
    /// Capacity of each stream's message channels.
    pub channel_capacity: usize,
}

impl<S> Clone for RpcState<S> {
    fn clone(&self) -> Self {
        Self {
            thermostat: Arc::clone(&self.thermostat),
            security: Arc::clone(&self.security),
            device: Arc::clone(&self.device),
            channel_capacity: self.channel_capacity,
        }
    }
}

impl<S> RpcState<S>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    /// Create a new state from service instances.
    pub fn new(
        thermostat: ThermostatService<S>,
        security: SecurityService<S>,
        device: DeviceService<S>,
    ) -> Self {
        Self {
            thermostat: Arc::new(thermostat),
            security: Arc::new(security),
            device: Arc::new(device),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Override the per-stream channel capacity (at least 1).
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
