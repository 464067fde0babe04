//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meteor_docs_server::site_router;

use super::config::ProjectConfig;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>) -> Result<()> {
    let project_config = ProjectConfig::load(config_path)?;
    let dir = dir.unwrap_or_else(|| project_config.build_config().output_dir);

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'meteor-docs build' first.",
            dir.display()
        );
    }

    let base_url = match project_config.load_project() {
        Ok(project) => project.descriptor.base_url,
        Err(e) => {
            tracing::warn!("Serving at /: {:#}", e);
            "/".to_string()
        }
    };

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let app = site_router(&dir, &base_url);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let url = format!("http://{}{}", addr, base_url);
    tracing::info!("Serving {} at {}", dir.display(), url);

    if let Err(e) = open::that(&url) {
        tracing::warn!("Failed to open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
