//! Project configuration (docs.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use meteor_docs_site::{SiteFiles, SiteProject};
use meteor_docs_static::BuildConfig;

/// Configuration file structure (docs.toml).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub site: SiteSection,
    pub docs: DocsSection,
    pub build: BuildSection,
}

/// Site record files, relative to the project root.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub descriptor: String,
    pub sidebar: String,
    pub landing: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            descriptor: "site.toml".to_string(),
            sidebar: "sidebars.toml".to_string(),
            landing: "landing.toml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocsSection {
    pub dir: String,
    pub pages: String,
    pub static_dir: String,
    pub output: String,
}

impl Default for DocsSection {
    fn default() -> Self {
        Self {
            dir: "docs".to_string(),
            pages: "pages".to_string(),
            static_dir: "static".to_string(),
            output: "build".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub minify: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self { minify: true }
    }
}

/// A project: its root directory and configuration.
#[derive(Debug)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load configuration from `config_path` if it exists.
    ///
    /// The project root is the directory holding the config file. Returns an
    /// error if the file exists but is malformed.
    pub fn load(config_path: &Path) -> Result<Self> {
        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let file = if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            tracing::debug!("Loaded config from {}", config_path.display());
            file
        } else {
            tracing::debug!("No {}, using defaults", config_path.display());
            ConfigFile::default()
        };

        Ok(Self { root, file })
    }

    pub fn site_files(&self) -> SiteFiles {
        SiteFiles {
            descriptor: PathBuf::from(&self.file.site.descriptor),
            sidebar: PathBuf::from(&self.file.site.sidebar),
            landing: PathBuf::from(&self.file.site.landing),
        }
    }

    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            root_dir: self.root.clone(),
            docs_dir: self.root.join(&self.file.docs.dir),
            pages_dir: self.root.join(&self.file.docs.pages),
            static_dir: self.root.join(&self.file.docs.static_dir),
            output_dir: self.root.join(&self.file.docs.output),
            minify: self.file.build.minify,
            reload_script: None,
        }
    }

    /// Load the site records (not yet validated).
    pub fn load_project(&self) -> Result<SiteProject> {
        SiteProject::load(&self.root, &self.site_files()).context("Failed to load site records")
    }
}

/// Default docs.toml written by `init`.
pub const DEFAULT_CONFIG: &str = r#"# meteor-docs configuration

[site]
# Site records, relative to this file
descriptor = "site.toml"
sidebar = "sidebars.toml"
landing = "landing.toml"

[docs]
# Markdown documents, routed under docs/
dir = "docs"

# Standalone pages, routed at the site root
pages = "pages"

# Files copied verbatim into the output
static_dir = "static"

# Output directory for the built site
output = "build"

[build]
# Minify the built-in stylesheet
minify = true
"#;
