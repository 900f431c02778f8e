//! RPC method handlers, one module per service.
//!
//! Methods are routed by `/<package>.<Service>/<Method>`.

#[allow(clippy::missing_errors_doc)]
pub mod device;
#[allow(clippy::missing_errors_doc)]
pub mod security;
#[allow(clippy::missing_errors_doc)]
pub mod thermostat;

use axum::Router;
use axum::routing::{get, post};

use hearth_app::ports::HomeStateStore;

use crate::state::RpcState;

/// Build the sub-router hosting every RPC method.
pub fn routes<S>() -> Router<RpcState<S>>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    Router::new()
        // Thermostat
        .route(
            "/thermostat.ThermostatService/SetTemperature",
            post(thermostat::set_temperature::<S>),
        )
        .route(
            "/thermostat.ThermostatService/GetTemperature",
            post(thermostat::get_temperature::<S>),
        )
        .route(
            "/thermostat.ThermostatService/StreamTemperatures",
            post(thermostat::stream_temperatures::<S>),
        )
        // Security
        .route(
            "/security.SecurityService/LockOnOff",
            post(security::lock_on_off::<S>),
        )
        .route(
            "/security.SecurityService/GetLockState",
            post(security::get_lock_state::<S>),
        )
        .route(
            "/security.SecurityService/StreamSecurityActions",
            get(security::stream_security_actions::<S>),
        )
        // Device
        .route(
            "/device.DeviceService/StreamDeviceControl",
            get(device::stream_device_control::<S>),
        )
        .route(
            "/device.DeviceService/ListOnlineDevices",
            post(device::list_online_devices::<S>),
        )
}
