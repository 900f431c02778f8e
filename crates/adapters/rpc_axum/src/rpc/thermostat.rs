//! Thermostat RPC handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

use hearth_app::ports::HomeStateStore;

use crate::error::RpcError;
use crate::state::RpcState;
use crate::wire::{
    RoomRequest, SetTemperatureRequest, StreamTemperaturesRequest, TemperatureResponse,
    TemperaturesMessage,
};

/// `POST /thermostat.ThermostatService/SetTemperature`
pub async fn set_temperature<S>(
    State(state): State<RpcState<S>>,
    Json(request): Json<SetTemperatureRequest>,
) -> Result<Json<TemperatureResponse>, RpcError>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let temperature = state
        .thermostat
        .set_temperature(&request.room.into_text(), request.temperature)?;
    Ok(Json(TemperatureResponse {
        success: true,
        current_temp: temperature.celsius(),
    }))
}

/// `POST /thermostat.ThermostatService/GetTemperature`
pub async fn get_temperature<S>(
    State(state): State<RpcState<S>>,
    Json(request): Json<RoomRequest>,
) -> Result<Json<TemperatureResponse>, RpcError>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let temperature = state
        .thermostat
        .get_temperature(&request.room.into_text())?;
    Ok(Json(TemperatureResponse {
        success: true,
        current_temp: temperature.celsius(),
    }))
}

/// `POST /thermostat.ThermostatService/StreamTemperatures` — Server-Sent Events.
///
/// Spawns the stream task and relays each snapshot as a `message` event.
/// When the task completes, one final `end` event is sent and the response
/// closes. If the client disconnects first, the response body (and with it
/// the channel receiver) is dropped, which cancels the task.
pub async fn stream_temperatures<S>(
    State(state): State<RpcState<S>>,
    Json(request): Json<StreamTemperaturesRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let rooms: Vec<String> = request.rooms.into_iter().map(|r| r.into_text()).collect();
    let (tx, rx) = mpsc::channel(state.channel_capacity);
    let thermostat = Arc::clone(&state.thermostat);

    tokio::spawn(async move {
        thermostat.stream_temperatures(&rooms, tx).await;
    });

    let events = ReceiverStream::new(rx)
        .filter_map(|snapshot| {
            match serde_json::to_string(&TemperaturesMessage::from(snapshot)) {
                Ok(json) => Some(Ok::<_, Infallible>(Event::default().data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize temperature snapshot");
                    None
                }
            }
        })
        .chain(tokio_stream::once(Ok(Event::default().event("end").data("{}"))));

    Sse::new(events).keep_alive(KeepAlive::default())
}
