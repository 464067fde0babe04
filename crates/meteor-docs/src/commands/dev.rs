//! Development server command.

use std::path::Path;

use anyhow::Result;
use meteor_docs_server::{DevServer, DevServerConfig};

use super::config::ProjectConfig;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let project_config = ProjectConfig::load(config_path)?;

    let config = DevServerConfig {
        build: project_config.build_config(),
        site_files: project_config.site_files(),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
