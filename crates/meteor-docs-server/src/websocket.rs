//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the live reload WebSocket endpoint.
pub const RELOAD_PATH: &str = "/__reload";

/// Messages sent to clients for live reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// The site was rebuilt; reload the page
    Reload,

    /// The last rebuild failed; the served files are stale
    BuildFailed {
        /// Build error, shown in an overlay
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side live reload script.
///
/// Connects to `path` on the serving host, reloads on `reload` and shows an
/// overlay with the error on `build_failed`. After the server goes away it
/// polls until it is back and reloads.
pub fn reload_client_script(path: &str) -> String {
    format!(
        r#"(function() {{
  'use strict';

  var url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{path}';
  var overlayId = '__reload-overlay';

  function showError(message) {{
    var overlay = document.getElementById(overlayId);
    if (!overlay) {{
      overlay = document.createElement('pre');
      overlay.id = overlayId;
      overlay.style.cssText = 'position:fixed;inset:0;z-index:9999;margin:0;padding:2rem;' +
        'background:rgba(20,20,20,0.92);color:#ff8080;font:14px/1.5 monospace;white-space:pre-wrap;overflow:auto;';
      document.body.appendChild(overlay);
    }}
    overlay.textContent = 'Build failed\n\n' + message;
  }}

  function connect(reloadOnOpen) {{
    var ws = new WebSocket(url);

    ws.onopen = function() {{
      if (reloadOnOpen) location.reload();
    }};

    ws.onmessage = function(event) {{
      var msg = JSON.parse(event.data);
      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;
        case 'build_failed':
          showError(msg.message);
          break;
        case 'connected':
          console.log('[reload] connected');
          break;
      }}
    }};

    ws.onclose = function() {{
      setTimeout(function() {{ connect(true); }}, 1000);
    }};
  }}

  connect(false);
}})();
"#,
        path = path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = ReloadHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        assert_eq!(hub.subscriber_count(), 2);
        assert_eq!(first.try_recv().unwrap(), ReloadMessage::Reload);
        assert_eq!(second.try_recv().unwrap(), ReloadMessage::Reload);
    }

    #[test]
    fn send_without_subscribers_is_silent() {
        let hub = ReloadHub::default();

        hub.send(ReloadMessage::Connected);

        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn serializes_messages() {
        let msg = ReloadMessage::BuildFailed {
            message: "Referenced documents not found: introduction".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(
            json,
            r#"{"type":"build_failed","message":"Referenced documents not found: introduction"}"#
        );
        assert_eq!(
            serde_json::to_string(&ReloadMessage::Reload).unwrap(),
            r#"{"type":"reload"}"#
        );
    }

    #[test]
    fn client_script_targets_endpoint() {
        let script = reload_client_script(RELOAD_PATH);

        assert!(script.contains("location.host + '/__reload'"));
        assert!(script.contains("case 'build_failed'"));
    }
}
