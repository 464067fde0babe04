//! Validate the project without writing output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use meteor_docs_site::{check_isomorphic, validate, SiteDescriptor};
use meteor_docs_static::StaticBuilder;

use super::config::ProjectConfig;

/// Run the check command.
///
/// Validates the site records, optionally compares the descriptor's shape with
/// another variant, then resolves documents and links as a build would.
pub async fn run(config_path: &Path, against: Option<PathBuf>) -> Result<()> {
    let project_config = ProjectConfig::load(config_path)?;
    let project = project_config.load_project()?;

    let violations = validate(&project);
    for violation in &violations {
        tracing::error!("{}", violation);
    }
    if !violations.is_empty() {
        anyhow::bail!("Site records have {} violation(s)", violations.len());
    }

    if let Some(path) = against {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let other = SiteDescriptor::from_toml(&source)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        check_isomorphic(&project.descriptor, &other).with_context(|| {
            format!(
                "{} does not have the same shape as the site descriptor",
                path.display()
            )
        })?;
        tracing::info!("{} has the same shape as the site descriptor", path.display());
    }

    let config = project_config.build_config();
    let plan = tokio::task::spawn_blocking(move || {
        StaticBuilder::new(config, project).and_then(|builder| builder.plan())
    })
    .await
    .context("Check task failed")??;

    tracing::info!(
        "OK: {} docs, {} pages, {} warning(s)",
        plan.docs,
        plan.pages.len(),
        plan.warnings
    );

    Ok(())
}
