//! Declarative records for the Meteor documentation site.
//!
//! Three independent records drive a site build: the site descriptor (branding,
//! navbar, footer, theme), the sidebar tree (categories of document ids) and the
//! landing page content (hero banner and content grids).

pub mod descriptor;
pub mod landing;
pub mod loader;
pub mod meteor;
pub mod scaffold;
pub mod sidebar;
pub mod validate;
pub mod variants;

pub use descriptor::{
    page_route, route, AnnouncementBar, ColorMode, FooterGroup, FooterLink, LinkPolicy, LinkTarget,
    Navbar, NavbarItem, Position, Shade, SiteDescriptor, TargetError,
};
pub use landing::{CallToAction, ContentBlock, GridLayout, Hero, LandingPage, Section};
pub use loader::{SiteFiles, SiteProject};
pub use meteor::meteor_project;
pub use scaffold::{meteor_scaffold, write_scaffold, ScaffoldFile};
pub use sidebar::{SidebarItem, SidebarTree};
pub use validate::{validate, Violation};
pub use variants::{check_isomorphic, ShapeMismatch};

/// Errors that can occur when loading site records.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Failed to read {file}: {message}")]
    Read { file: String, message: String },

    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Failed to write {file}: {message}")]
    Write { file: String, message: String },

    #[error("Site records have {} violation(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Invalid(Vec<Violation>),
}
