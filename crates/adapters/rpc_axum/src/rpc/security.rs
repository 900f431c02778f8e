//! Security RPC handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use hearth_app::ports::HomeStateStore;
use hearth_app::services::security_service::SecurityBatch;

use crate::error::{RpcError, RpcStatus};
use crate::frame::{self, ServerFrame};
use crate::state::RpcState;
use crate::wire::{
    LockRequest, LockStateResponse, RoomRequest, SecurityActionsRequest, SuccessResponse,
};

/// `POST /security.SecurityService/LockOnOff`
pub async fn lock_on_off<S>(
    State(state): State<RpcState<S>>,
    Json(request): Json<LockRequest>,
) -> Result<Json<SuccessResponse>, RpcError>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    state
        .security
        .lock_on_off(&request.room.into_text(), request.on)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /security.SecurityService/GetLockState`
pub async fn get_lock_state<S>(
    State(state): State<RpcState<S>>,
    Json(request): Json<RoomRequest>,
) -> Result<Json<LockStateResponse>, RpcError>
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let lock = state.security.lock_state(&request.room.into_text())?;
    Ok(Json(LockStateResponse {
        success: true,
        locked: lock.is_locked(),
    }))
}

/// `GET /security.SecurityService/StreamSecurityActions` — client-streaming
/// over a WebSocket.
pub async fn stream_security_actions<S>(
    State(state): State<RpcState<S>>,
    ws: WebSocketUpgrade,
) -> Response
where
    S: HomeStateStore + Send + Sync + 'static,
{
    ws.on_upgrade(move |socket| serve_security_actions(state, socket))
}

async fn serve_security_actions<S>(state: RpcState<S>, socket: WebSocket)
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let (mut sink, source) = socket.split();
    let (in_tx, in_rx) = mpsc::channel(state.channel_capacity);
    let reader = tokio::spawn(frame::pump_inbound::<SecurityActionsRequest, SecurityBatch, _>(
        source, in_tx,
    ));

    let result = state.security.stream_security_actions(in_rx).await;
    reader.abort();

    let sent = match result {
        Ok(_) => {
            let ack = ServerFrame::Message(SuccessResponse { success: true });
            match frame::send_frame(&mut sink, &ack).await {
                Ok(()) => frame::send_frame(&mut sink, &ServerFrame::<()>::End).await,
                Err(err) => Err(err),
            }
        }
        Err(err) => {
            let status = ServerFrame::<()>::Error(RpcStatus::from(&err));
            frame::send_frame(&mut sink, &status).await
        }
    };
    if let Err(err) = sent {
        tracing::debug!(%err, "security stream peer gone before final frame");
    }
    let _ = sink.close().await;
}
