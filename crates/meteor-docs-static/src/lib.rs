//! Static site generator for the Meteor documentation site.
//!
//! Renders the landing page, every document and standalone page from the site
//! records and Markdown sources, checks internal links and writes a
//! self-contained site tree.

pub mod assets;
pub mod builder;
pub mod docs;
pub mod links;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SitePlan, StaticBuilder};
pub use docs::{discover_docs, discover_pages, DocPage, DocSet, StandalonePage};
pub use links::{BrokenLink, LinkIndex};
