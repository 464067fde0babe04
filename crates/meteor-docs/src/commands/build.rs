//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meteor_docs_static::StaticBuilder;

use super::config::ProjectConfig;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let project_config = ProjectConfig::load(config_path)?;
    let project = project_config.load_project()?;

    let mut config = project_config.build_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = tokio::task::spawn_blocking(move || {
        StaticBuilder::new(config, project).and_then(|builder| builder.build())
    })
    .await
    .context("Build task failed")??;

    tracing::info!(
        "Built {} pages ({} docs) and {} assets in {}ms",
        result.pages,
        result.docs,
        result.assets,
        result.duration_ms
    );
    if result.warnings > 0 {
        tracing::warn!("{} warning(s)", result.warnings);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteor_docs_site::write_scaffold;
    use tempfile::tempdir;

    #[tokio::test]
    async fn builds_into_requested_output() {
        let temp = tempdir().unwrap();
        write_scaffold(temp.path(), false).unwrap();
        let output = temp.path().join("public");

        run(&temp.path().join("docs.toml"), Some(output.clone()), Some(false))
            .await
            .unwrap();

        assert!(output.join("index.html").exists());
        assert!(output.join("docs/introduction/index.html").exists());
        assert!(!temp.path().join("build").exists());
    }

    #[tokio::test]
    async fn fails_without_records() {
        let temp = tempdir().unwrap();

        let err = run(&temp.path().join("docs.toml"), None, None)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("site.toml"));
    }
}
