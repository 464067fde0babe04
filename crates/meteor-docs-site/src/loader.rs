//! Loading the three site records from a project directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::SiteDescriptor;
use crate::landing::LandingPage;
use crate::sidebar::SidebarTree;
use crate::validate::validate;
use crate::SiteError;

/// File names of the site records, relative to the project root.
#[derive(Debug, Clone)]
pub struct SiteFiles {
    pub descriptor: PathBuf,
    pub sidebar: PathBuf,
    pub landing: PathBuf,
}

impl Default for SiteFiles {
    fn default() -> Self {
        Self {
            descriptor: PathBuf::from("site.toml"),
            sidebar: PathBuf::from("sidebars.toml"),
            landing: PathBuf::from("landing.toml"),
        }
    }
}

/// All records needed to build a site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteProject {
    pub descriptor: SiteDescriptor,
    pub sidebar: SidebarTree,
    pub landing: LandingPage,
}

impl SiteProject {
    /// Load the records from `root`.
    pub fn load(root: &Path, files: &SiteFiles) -> Result<Self, SiteError> {
        let descriptor = load_toml(&root.join(&files.descriptor), SiteDescriptor::from_toml)?;
        let sidebar = load_toml(&root.join(&files.sidebar), SidebarTree::from_toml)?;
        let landing = load_toml(&root.join(&files.landing), LandingPage::from_toml)?;

        tracing::debug!(
            "Loaded site '{}' with {} sidebar docs and {} landing sections",
            descriptor.title,
            sidebar.doc_ids().len(),
            landing.sections.len()
        );

        Ok(Self {
            descriptor,
            sidebar,
            landing,
        })
    }

    /// Return self if the records satisfy every structural invariant.
    pub fn validated(self) -> Result<Self, SiteError> {
        let violations = validate(&self);
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(SiteError::Invalid(violations))
        }
    }
}

fn load_toml<T>(
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, toml::de::Error>,
) -> Result<T, SiteError> {
    let content = fs::read_to_string(path).map_err(|e| SiteError::Read {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse(&content).map_err(|e| SiteError::Parse {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}
