/*!
RPC request/response types and dispatch.
*/

#![allow(missing_docs)]

use atsense::{
  AccessibilityPreferences, AtsenseResult, Detector, DetectorBuilder, DetectorState, InputBus,
  InputEvent, SharedProbe, Verdict,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use ts_rs::TS;

/// A detector wired to the input bus and preference probe that RPC feeds.
#[derive(Debug, Clone)]
pub struct DetectorHost {
  pub detector: Arc<Detector>,
  pub input: InputBus,
  pub probe: SharedProbe,
}

impl DetectorHost {
  /// Build a detector whose input and accessibility preferences come from RPC calls.
  ///
  /// Any input source or probe already set on `builder` is replaced.
  pub fn new(builder: DetectorBuilder) -> AtsenseResult<Self> {
    let input = InputBus::new();
    let probe = SharedProbe::default();
    let detector = builder.input(input.clone()).probe(probe.clone()).build()?;
    Ok(Self {
      detector: Arc::new(detector),
      input,
      probe,
    })
  }
}

/// RPC request.
#[derive(Debug, Deserialize, TS)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
#[ts(export)]
pub enum RpcRequest {
  /// Deliver one page event (key down, focus, load).
  Input(InputEvent),
  /// Report the page's current accessibility media-query flags.
  Preferences(AccessibilityPreferences),
  /// Copy of the detector state.
  State,
  IsDetected,
  IsDisabledByUser,
  /// Opt out of the built-in screen reader.
  Disable,
  /// Clear the opt-out.
  Enable,
  /// Run one guarded evaluation now.
  Check,
}

/// RPC response.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RpcResponse {
  State(DetectorState),
  Verdict(Verdict),
  Bool(bool),
  /// No data.
  Null,
}

pub fn dispatch_json(host: &DetectorHost, method: &str, args: &JsonValue) -> JsonValue {
  let request_value = json!({ "method": method, "args": args });

  match serde_json::from_value::<RpcRequest>(request_value) {
    Ok(request) => json!({ "result": dispatch(host, request) }),
    Err(e) => {
      log::warn!("[rpc] Invalid request for {method}: {e}");
      json!({ "error": format!("Invalid request: {}", e) })
    }
  }
}

pub fn dispatch(host: &DetectorHost, request: RpcRequest) -> RpcResponse {
  let detector = &host.detector;
  match request {
    RpcRequest::Input(event) => {
      host.input.dispatch(&event);
      RpcResponse::Null
    }

    RpcRequest::Preferences(preferences) => {
      log::debug!("[rpc] preferences now {preferences:?}");
      host.probe.set(preferences);
      RpcResponse::Null
    }

    RpcRequest::State => RpcResponse::State(detector.state()),
    RpcRequest::IsDetected => RpcResponse::Bool(detector.is_detected()),
    RpcRequest::IsDisabledByUser => RpcResponse::Bool(detector.is_disabled_by_user()),

    RpcRequest::Disable => {
      detector.disable_builtin_screen_reader();
      RpcResponse::Null
    }

    RpcRequest::Enable => {
      detector.enable_builtin_screen_reader();
      RpcResponse::Null
    }

    RpcRequest::Check => RpcResponse::Verdict(detector.check()),
  }
}
