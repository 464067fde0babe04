//! Scaffold the Meteor docs project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use meteor_docs_site::write_scaffold;

use super::config::{ProjectConfig, DEFAULT_CONFIG};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing Meteor docs...");

    let config = ProjectConfig::load(config_path)?;
    fs::create_dir_all(&config.root)
        .with_context(|| format!("Failed to create {}", config.root.display()))?;

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    let written = write_scaffold(&config.root, yes).context("Failed to scaffold project")?;
    for path in &written {
        tracing::debug!("Created {}", path.display());
    }

    if written.is_empty() {
        tracing::warn!("All files already exist. Use --yes to overwrite.");
    } else {
        tracing::info!("Created {} files", written.len());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'meteor-docs dev' to start the development server.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn scaffolds_project() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("docs.toml");

        run(&config_path, false).await.unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), DEFAULT_CONFIG);
        assert!(temp.path().join("site.toml").exists());
        assert!(temp.path().join("docs/introduction.md").exists());
        assert!(temp.path().join("pages/help.md").exists());
        assert!(temp.path().join("static/img/logo.svg").exists());
    }

    #[tokio::test]
    async fn keeps_edits_without_yes() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("docs.toml");
        run(&config_path, false).await.unwrap();
        fs::write(temp.path().join("docs/introduction.md"), "# Edited").unwrap();

        run(&config_path, false).await.unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("docs/introduction.md")).unwrap(),
            "# Edited"
        );

        run(&config_path, true).await.unwrap();
        assert_ne!(
            fs::read_to_string(temp.path().join("docs/introduction.md")).unwrap(),
            "# Edited"
        );
    }
}
