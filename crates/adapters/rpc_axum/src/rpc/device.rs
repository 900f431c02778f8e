//! Device RPC handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use hearth_app::ports::HomeStateStore;
use hearth_app::services::device_service::DeviceCommand;
use hearth_domain::stream::StreamOutcome;

use crate::error::RpcStatus;
use crate::frame::{self, ServerFrame};
use crate::state::RpcState;
use crate::wire::{DeviceControlRequest, OnlineDevicesResponse, SuccessResponse};

/// `POST /device.DeviceService/ListOnlineDevices`
pub async fn list_online_devices<S>(State(state): State<RpcState<S>>) -> Json<OnlineDevicesResponse>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    Json(OnlineDevicesResponse {
        devices: state
            .device
            .online_devices()
            .into_iter()
            .map(Into::into)
            .collect(),
    })
}

/// `GET /device.DeviceService/StreamDeviceControl` — bidirectional streaming
/// over a WebSocket.
pub async fn stream_device_control<S>(
    State(state): State<RpcState<S>>,
    ws: WebSocketUpgrade,
) -> Response
where
    S: HomeStateStore + Send + Sync + 'static,
{
    ws.on_upgrade(move |socket| serve_device_control(state, socket))
}

async fn serve_device_control<S>(state: RpcState<S>, socket: WebSocket)
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let (mut sink, source) = socket.split();
    let (in_tx, in_rx) = mpsc::channel(state.channel_capacity);
    let (out_tx, out_rx) = mpsc::channel(state.channel_capacity);
    let reader = tokio::spawn(frame::pump_inbound::<DeviceControlRequest, DeviceCommand, _>(
        source, in_tx,
    ));

    // Acks are written in the order the service produced them. When the
    // socket stops accepting writes, the receiver is dropped and the
    // service sees the stream as cancelled.
    let writer = async {
        let mut out_rx = out_rx;
        while let Some(ack) = out_rx.recv().await {
            let message = ServerFrame::Message(SuccessResponse::from(ack));
            if frame::send_frame(&mut sink, &message).await.is_err() {
                return false;
            }
        }
        true
    };

    let (result, writable) = tokio::join!(
        state.device.stream_device_control(in_rx, out_tx),
        writer
    );
    reader.abort();

    if writable {
        let last = match result {
            Ok(summary) if summary.outcome == StreamOutcome::Completed => {
                Some(ServerFrame::<()>::End)
            }
            Ok(_) => None,
            Err(err) => Some(ServerFrame::Error(RpcStatus::from(&err))),
        };
        let sent = match last {
            Some(last) => frame::send_frame(&mut sink, &last).await,
            None => Ok(()),
        };
        if let Err(err) = sent {
            tracing::debug!(%err, "device stream peer gone before final frame");
        }
    }
    let _ = sink.close().await;
}
