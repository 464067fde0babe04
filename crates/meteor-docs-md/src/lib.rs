//! Markdown document parser with frontmatter and heading extraction.
//!
//! Documents are plain CommonMark with an optional YAML frontmatter block.
//! Rendering rewrites links through a caller-provided resolver and gives every
//! heading a stable anchor id.

pub mod codeblock;
pub mod frontmatter;
pub mod parser;
pub mod render;

pub use codeblock::Language;
pub use frontmatter::Frontmatter;
pub use parser::{parse_doc, slugify, ParseError, ParsedDoc, TocEntry};
pub use render::{render_html, LinkRewrite};
