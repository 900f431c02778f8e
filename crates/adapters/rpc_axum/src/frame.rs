//! Framing for streaming calls carried over a WebSocket.
//!
//! Every text frame is one JSON envelope:
//!
//! | Direction | Frame |
//! |-----------|-------|
//! | client → server | `{"type":"message","payload":{…}}` |
//! | client → server | `{"type":"end"}`, client is done sending |
//! | server → client | `{"type":"message","payload":{…}}` |
//! | server → client | `{"type":"end"}`, call completed normally |
//! | server → client | `{"type":"error","payload":{"code":…,"details":…}}` |
//!
//! The server closes the socket after `end` or `error`. A client that closes
//! the socket without sending `end` has disconnected, not finished.

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use hearth_domain::error::StreamError;

use crate::error::RpcStatus;

/// Envelope sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ClientFrame<T> {
    Message(T),
    End,
}

/// Envelope sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ServerFrame<T> {
    Message(T),
    End,
    Error(RpcStatus),
}

enum Decoded<W> {
    Message(W),
    End,
    Skip,
    Failed(StreamError),
}

fn decode<W: DeserializeOwned>(frame: Option<Result<Message, axum::Error>>) -> Decoded<W> {
    match frame {
        None | Some(Ok(Message::Close(_))) => Decoded::Failed(StreamError::Disconnected),
        Some(Err(err)) => Decoded::Failed(StreamError::Transport(err.to_string())),
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Decoded::Skip,
        Some(Ok(Message::Binary(_))) => Decoded::Failed(StreamError::Malformed(
            "binary frames are not supported".to_string(),
        )),
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientFrame<W>>(&text) {
            Ok(ClientFrame::Message(payload)) => Decoded::Message(payload),
            Ok(ClientFrame::End) => Decoded::End,
            Err(err) => Decoded::Failed(StreamError::Malformed(err.to_string())),
        },
    }
}

/// Read client frames from `source` and forward them into `inbound`.
///
/// Payloads are decoded as `W` and converted into the service's message
/// type `T`. Returns (dropping `inbound`, which the service sees as
/// end-of-stream) once the client sends `end`. Any failure is forwarded as
/// a single `Err` and stops reading. Also returns as soon as the service
/// drops its receiver.
pub async fn pump_inbound<W, T, St>(mut source: St, inbound: mpsc::Sender<Result<T, StreamError>>)
where
    W: DeserializeOwned,
    T: From<W>,
    St: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = tokio::select! {
            () = inbound.closed() => return,
            frame = source.next() => frame,
        };

        let forwarded = match decode::<W>(frame) {
            Decoded::Message(payload) => Ok(T::from(payload)),
            Decoded::End => return,
            Decoded::Skip => continue,
            Decoded::Failed(err) => Err(err),
        };

        let failed = forwarded.is_err();
        if inbound.send(forwarded).await.is_err() || failed {
            return;
        }
    }
}

/// Encode and send one server frame.
///
/// # Errors
///
/// Returns the sink error if the socket is gone.
pub async fn send_frame<T, Si>(sink: &mut Si, frame: &ServerFrame<T>) -> Result<(), axum::Error>
where
    T: Serialize,
    Si: Sink<Message, Error = axum::Error> + Unpin,
{
    let text = match serde_json::to_string(frame) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "failed to serialize stream frame");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        n: u32,
    }

    fn text(json: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(json.to_string().into()))
    }

    async fn pump(frames: Vec<Result<Message, axum::Error>>) -> Vec<Result<u32, StreamError>> {
        let (tx, mut rx) = mpsc::channel(16);
        pump_inbound::<Ping, Ping, _>(stream::iter(frames), tx).await;

        let mut forwarded = Vec::new();
        while let Some(item) = rx.recv().await {
            forwarded.push(item.map(|p| p.n));
        }
        forwarded
    }

    #[tokio::test]
    async fn should_forward_messages_until_end() {
        let forwarded = pump(vec![
            text(r#"{"type":"message","payload":{"n":1}}"#),
            text(r#"{"type":"message","payload":{"n":2}}"#),
            text(r#"{"type":"end"}"#),
            text(r#"{"type":"message","payload":{"n":3}}"#),
        ])
        .await;
        assert_eq!(forwarded, vec![Ok(1), Ok(2)]);
    }

    #[tokio::test]
    async fn should_report_disconnect_when_socket_closes_before_end() {
        let forwarded = pump(vec![text(r#"{"type":"message","payload":{"n":1}}"#)]).await;
        assert_eq!(forwarded, vec![Ok(1), Err(StreamError::Disconnected)]);
    }

    #[tokio::test]
    async fn should_report_malformed_frame_and_stop() {
        let forwarded = pump(vec![
            text(r#"{"type":"message","payload":{"n":"one"}}"#),
            text(r#"{"type":"message","payload":{"n":2}}"#),
        ])
        .await;
        assert_eq!(forwarded.len(), 1);
        assert!(matches!(forwarded[0], Err(StreamError::Malformed(_))));
    }

    #[tokio::test]
    async fn should_ignore_pings() {
        let forwarded = pump(vec![
            Ok(Message::Ping(Vec::new().into())),
            text(r#"{"type":"message","payload":{"n":7}}"#),
            text(r#"{"type":"end"}"#),
        ])
        .await;
        assert_eq!(forwarded, vec![Ok(7)]);
    }

    #[test]
    fn should_encode_server_frames_with_type_tag() {
        let message = serde_json::to_value(ServerFrame::Message(serde_json::json!({"success": true})))
            .unwrap();
        assert_eq!(
            message,
            serde_json::json!({"type": "message", "payload": {"success": true}})
        );

        let end = serde_json::to_value(ServerFrame::<()>::End).unwrap();
        assert_eq!(end, serde_json::json!({"type": "end"}));
    }
}
