//! Real-time WebSocket endpoint - 订单事件推送
//!
//! GET /api/ws?token=<JWT>
//! Auth: JWT 通过 query parameter 传递（浏览器 WebSocket 不支持自定义 headers）
//!
//! 协议:
//! - Server → Client: `{"type":"connected",...}` 握手确认，随后为 `OrderEvent`
//! - Client → Server: 无业务消息，仅 Close / Pong

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Duration;

use super::{Partition, SessionGuard};
use crate::auth::{Action, CurrentUser, can_perform, resolve_user};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// First frame sent after the upgrade
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Connected {
    #[serde(rename = "type")]
    kind: &'static str,
    partition: &'static str,
    user_id: i64,
}

/// GET /api/ws?token=<JWT>
///
/// The token is checked before the upgrade request itself, so a bad token is
/// always a 401 even from clients that cannot upgrade.
pub async fn handle_ws(
    State(state): State<ServerState>,
    Query(query): Query<WsAuthQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    // 手动验证 JWT（浏览器 WebSocket 不支持 Authorization header）
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        security_log!("WARN", "ws_auth_missing", endpoint = "/api/ws");
        return Err(AppError::unauthorized());
    };
    let user = resolve_user(&state, &token).await?;

    let partition = Partition::for_role(user.role)
        .filter(|_| can_perform(&user, Action::Subscribe, None))
        .ok_or_else(|| AppError::forbidden("This role has no real-time channel"))?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let Some(session) = state.hub.try_open_session(user.id) else {
        return Err(AppError::forbidden(format!(
            "Too many open connections (max {})",
            super::MAX_SESSIONS_PER_USER
        )));
    };

    // the slot is released when the callback is dropped, upgraded or not
    Ok(ws
        .on_upgrade(move |socket| ws_session(socket, state, user, partition, session))
        .into_response())
}

async fn ws_session(
    socket: WebSocket,
    state: ServerState,
    user: CurrentUser,
    partition: Partition,
    _session: SessionGuard,
) {
    let (sink, stream) = socket.split();
    let hub_rx = state.hub.subscribe(partition);

    tracing::info!(user_id = user.id, partition = partition.as_str(), "WS connected");
    pump(sink, stream, hub_rx, &user, partition).await;
    tracing::info!(user_id = user.id, "WS disconnected");
}

/// Greet, then forward hub events until either side goes away
async fn pump<S, R, E>(
    mut sink: S,
    mut stream: R,
    mut hub_rx: broadcast::Receiver<shared::OrderEvent>,
    user: &CurrentUser,
    partition: Partition,
) where
    S: SinkExt<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let hello = Connected {
        kind: "connected",
        partition: partition.as_str(),
        user_id: user.id,
    };
    if send_json(&mut sink, &hello).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_json(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // 错过的事件不重放，客户端需重新拉取订单列表
                        tracing::warn!(user_id = user.id, lagged = n, "WS subscriber lagged, events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }
}

async fn send_json<S, T>(sink: &mut S, value: &T) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
    T: Serialize,
{
    let json = serde_json::to_string(value).map_err(|e| {
        tracing::error!("Failed to serialize WS message: {e}");
    })?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
