//! Development server with live reload for the Meteor docs site.
//!
//! Builds the site into its output directory, serves it under the base URL,
//! watches the sources and tells connected browsers to reload after each
//! rebuild.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{site_router, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{reload_client_script, ReloadHub, ReloadMessage, RELOAD_PATH};
