/*!
WebSocket server.

One route, `/ws`. Each connection holds its own subscription to the
detector, gets a `sync:init` with the current state on connect, then
receives every detector event as it is published. Text frames are RPC
requests and are answered in order.
*/

use async_broadcast::{Receiver, RecvError};
use atsense::Event;
use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
  },
  response::Response,
  routing::get,
  Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::rpc::{dispatch_json, DetectorHost};

/// Default WebSocket server port.
pub const DEFAULT_WS_PORT: u16 = 3031;

/// Server state shared by every connection.
#[derive(Debug, Clone)]
pub struct WebSocketState {
  host: DetectorHost,
  port: u16,
}

impl WebSocketState {
  /// Serve `host` on the default port.
  pub fn new(host: DetectorHost) -> Self {
    Self::with_port(host, DEFAULT_WS_PORT)
  }

  pub fn with_port(host: DetectorHost, port: u16) -> Self {
    Self { host, port }
  }
}

/// Bind `127.0.0.1:<port>` and serve until the process exits.
///
/// Exits the process if the port cannot be bound.
pub async fn start_server(ws_state: WebSocketState) {
  let addr = format!("127.0.0.1:{}", ws_state.port);
  let app = Router::new()
    .route("/ws", get(upgrade))
    .layer(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    )
    .with_state(ws_state);

  let listener = match tokio::net::TcpListener::bind(&addr).await {
    Ok(l) => l,
    Err(e) => {
      log::error!("Failed to bind WebSocket server to {addr}: {e}");
      std::process::exit(1);
    }
  };
  log::info!("Detector bridge listening on ws://{addr}/ws");

  if let Err(e) = axum::serve(listener, app).await {
    log::error!("WebSocket server failed: {e}");
    std::process::exit(1);
  }
}

async fn upgrade(ws: WebSocketUpgrade, State(ws_state): State<WebSocketState>) -> Response {
  ws.on_upgrade(move |socket| serve_connection(socket, ws_state.host))
}

async fn serve_connection(mut socket: WebSocket, host: DetectorHost) {
  // Subscribe before reading state so nothing published in between is missed.
  let mut events = host.detector.subscribe();
  if !send_event(&mut socket, &Event::SyncInit(host.detector.state())).await {
    return;
  }
  log::debug!("[ws] page connected");

  loop {
    tokio::select! {
      frame = socket.recv() => match frame {
        Some(Ok(Message::Text(text))) => {
          let response = respond(&host, &text).await;
          if socket.send(Message::Text(response)).await.is_err() {
            break;
          }
        }
        Some(Ok(Message::Close(_))) | None => break,
        Some(Err(e)) => {
          log::warn!("[ws] connection error: {e}");
          break;
        }
        Some(Ok(_)) => {}
      },

      event = events.recv() => match event {
        Ok(event) => {
          if !send_event(&mut socket, &event).await {
            break;
          }
        }
        Err(RecvError::Overflowed(n)) => {
          log::warn!("[ws] page fell behind, {n} detector events dropped");
        }
        Err(RecvError::Closed) => break,
      },
    }
  }
  log::debug!("[ws] page disconnected");
}

/// Returns false once the socket is gone.
async fn send_event(socket: &mut WebSocket, event: &Event) -> bool {
  match serde_json::to_string(event) {
    Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
    Err(e) => {
      log::error!("[ws] failed to encode {}: {e}", event.name());
      true
    }
  }
}

/// Answer one `{"id", "method", "args"}` request, echoing `id`.
///
/// Dispatch runs on the blocking pool: a detection may call the host callback,
/// the prompt and the store.
async fn respond(host: &DetectorHost, text: &str) -> String {
  let request: Value = match serde_json::from_str(text) {
    Ok(v) => v,
    Err(e) => return json!({ "id": null, "error": format!("Invalid JSON: {e}") }).to_string(),
  };

  let id = request.get("id").cloned().unwrap_or(Value::Null);
  let method = request
    .get("method")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_owned();
  let args = request.get("args").cloned().unwrap_or(Value::Null);

  let host = host.clone();
  let mut response = tokio::task::spawn_blocking(move || dispatch_json(&host, &method, &args))
    .await
    .unwrap_or_else(|e| json!({ "error": format!("RPC task failed: {e}") }));
  if let Some(obj) = response.as_object_mut() {
    obj.insert("id".to_owned(), id);
  }
  response.to_string()
}
