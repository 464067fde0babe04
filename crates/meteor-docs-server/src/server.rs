//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::header,
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use tokio::sync::{broadcast, RwLock};
use tower_http::services::{ServeDir, ServeFile};

use meteor_docs_site::{SiteFiles, SiteProject};
use meteor_docs_static::{BuildConfig, BuildResult, StaticBuilder};

use crate::watcher::FileWatcher;
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage, RELOAD_PATH};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Build settings; the reload script is added on start
    pub build: BuildConfig,

    /// Site record files, relative to `build.root_dir`
    pub site_files: SiteFiles,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            site_files: SiteFiles::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Shared server state.
struct ServerState {
    hub: ReloadHub,
    /// Error of the most recent build, replayed to clients that connect later
    last_error: RwLock<Option<String>>,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }

    /// Socket address from the configured host and port.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        addr.parse().map_err(|_| ServerError::InvalidAddress(addr))
    }

    /// Build the site, then serve it and rebuild on every change.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.addr()?;

        let mut build = self.config.build.clone();
        build.reload_script = Some(reload_client_script(RELOAD_PATH));
        let files = self.config.site_files.clone();

        let state = Arc::new(ServerState {
            hub: ReloadHub::new(),
            last_error: RwLock::new(None),
        });

        match rebuild(build.clone(), files.clone()).await {
            Ok(result) => tracing::info!(
                "Built {} pages in {}ms",
                result.pages,
                result.duration_ms
            ),
            Err(message) => {
                tracing::error!("Initial build failed: {}", message);
                *state.last_error.write().await = Some(message);
            }
        }

        let project = SiteProject::load(&build.root_dir, &files).ok();
        let base_url = project
            .as_ref()
            .map(|p| p.descriptor.base_url.clone())
            .unwrap_or_else(|| "/".to_string());
        let custom_css = project
            .map(|p| p.descriptor.theme.custom_css)
            .unwrap_or_default();

        let watch_paths = watch_paths(&build, &files, &custom_css);
        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let rebuild_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(events) = rx.recv().await {
                for event in &events {
                    tracing::info!("Changed: {}", event.path().display());
                }

                match rebuild(build.clone(), files.clone()).await {
                    Ok(result) => {
                        tracing::info!(
                            "Rebuilt {} pages in {}ms",
                            result.pages,
                            result.duration_ms
                        );
                        *rebuild_state.last_error.write().await = None;
                        rebuild_state.hub.send(ReloadMessage::Reload);
                    }
                    Err(message) => {
                        tracing::error!("Rebuild failed: {}", message);
                        *rebuild_state.last_error.write().await = Some(message.clone());
                        rebuild_state.hub.send(ReloadMessage::BuildFailed { message });
                    }
                }
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route(RELOAD_PATH, get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .with_state(state)
            .merge(site_router(&self.config.build.output_dir, &base_url));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = format!("http://{}{}", addr, base_url);
        tracing::info!("Dev server running at {}", url);

        if self.config.open {
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))
    }
}

/// Router serving a built site from `dir` under `base_url`.
///
/// Unknown paths get the site's `404.html`. With a base URL other than `/`,
/// the server root redirects to it.
pub fn site_router(dir: &Path, base_url: &str) -> Router {
    let serve = ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("404.html")));

    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        return Router::new().fallback_service(serve);
    }

    let target = format!("{}/", base);
    Router::new().nest_service(base, serve).route(
        "/",
        get(move || {
            let target = target.clone();
            async move { Redirect::temporary(&target) }
        }),
    )
}

/// Everything a rebuild depends on.
fn watch_paths(build: &BuildConfig, files: &SiteFiles, custom_css: &[String]) -> Vec<PathBuf> {
    let mut paths = vec![
        build.root_dir.join(&files.descriptor),
        build.root_dir.join(&files.sidebar),
        build.root_dir.join(&files.landing),
        build.docs_dir.clone(),
        build.pages_dir.clone(),
        build.static_dir.clone(),
    ];
    paths.extend(custom_css.iter().map(|css| build.root_dir.join(css)));
    paths
}

/// Reload the records and build the site off the async runtime.
async fn rebuild(config: BuildConfig, files: SiteFiles) -> Result<BuildResult, String> {
    tokio::task::spawn_blocking(move || {
        let project = SiteProject::load(&config.root_dir, &files).map_err(|e| e.to_string())?;
        StaticBuilder::new(config, project)
            .and_then(|builder| builder.build())
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if !send_message(&mut socket, &ReloadMessage::Connected).await {
        return;
    }

    let last_error = state.last_error.read().await.clone();
    if let Some(message) = last_error {
        if !send_message(&mut socket, &ReloadMessage::BuildFailed { message }).await {
            return;
        }
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if !send_message(&mut socket, &msg).await {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!("Reload client lagged by {} messages", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(RELOAD_PATH),
    )
}
