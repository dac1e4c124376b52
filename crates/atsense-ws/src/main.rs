/*!
Standalone detector server.

```text
atsense-ws [config.json]
```

`ATSENSE_WS_PORT` overrides the port, `ATSENSE_STORE` persists the opt-out
preference to a JSON file instead of memory. `RUST_LOG` controls logging.
*/

use atsense::{
  Detector, DetectorConfig, JsonFileStore, MemoryStore, PreferenceStore, StaticPrompt,
  ThreadScheduler,
};
use atsense_ws::{start_server, DetectorHost, WebSocketState, DEFAULT_WS_PORT};
use std::sync::Arc;

fn load_config() -> DetectorConfig {
  let Some(path) = std::env::args().nth(1) else {
    return DetectorConfig::default();
  };
  match DetectorConfig::from_json_file(&path) {
    Ok(config) => {
      log::info!("Loaded config from {path}");
      config
    }
    Err(e) => {
      log::error!("Failed to load config from {path}: {e}");
      std::process::exit(1);
    }
  }
}

fn port() -> u16 {
  match std::env::var("ATSENSE_WS_PORT") {
    Ok(value) => value.parse().unwrap_or_else(|e| {
      log::warn!("Ignoring ATSENSE_WS_PORT={value}: {e}");
      DEFAULT_WS_PORT
    }),
    Err(_) => DEFAULT_WS_PORT,
  }
}

fn store() -> Arc<dyn PreferenceStore> {
  match std::env::var_os("ATSENSE_STORE") {
    Some(path) => {
      let store = JsonFileStore::new(path);
      log::info!("Preferences stored in {}", store.path().display());
      Arc::new(store)
    }
    None => Arc::new(MemoryStore::new()),
  }
}

#[tokio::main]
async fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  // The page answers prompts itself after seeing detection:positive.
  let builder = Detector::builder()
    .config(load_config())
    .store(store())
    .prompt(StaticPrompt::decline())
    .scheduler(ThreadScheduler::new());

  let host = match DetectorHost::new(builder) {
    Ok(host) => host,
    Err(e) => {
      log::error!("Invalid detector configuration: {e}");
      std::process::exit(1);
    }
  };

  start_server(WebSocketState::with_port(host, port())).await;
}
