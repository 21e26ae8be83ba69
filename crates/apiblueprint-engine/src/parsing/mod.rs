//! # Section Parser
//!
//! Turns a markdown node tree into a [`Blueprint`].
//!
//! ## Architecture
//!
//! ```text
//! MarkdownNode tree ─▶ driver::parse_section ─▶ EntityProcessor (per SectionType)
//!                          │                        │
//!                          │  signature / description / content / nested
//!                          ▼                        ▼
//!                     Step { next, source_map }   Entity
//! ```
//!
//! Classification (`classify`) tags a node with the [`SectionType`] it
//! opens; the registry in [`kinds`] maps the tag to a processor; the
//! [`driver`] walks the section's nodes through the processor and folds the
//! source maps of everything consumed.
//!
//! Header sections (groups, resources, actions, named types) use the flat
//! layout and run until a terminator header. List sections (payloads,
//! assets, headers, parameters, MSON members) are the children of one list
//! item.

pub mod classify;
pub mod code_block;
pub mod context;
pub mod cursor;
pub mod driver;
pub mod kinds;
pub mod layout;
pub mod processor;
pub mod signature;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::ast::Blueprint;
use crate::markdown::{MarkdownNode, parse_markdown};
use crate::report::Report;

pub use classify::SectionType;
pub use context::ParseContext;
pub use cursor::{Cursor, Step};
pub use driver::{Outcome, parse_section};
pub use processor::{Entity, EntityProcessor, SectionError, SectionResult};

/// Parser switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Record the spans of consumed nodes on every entity.
    pub export_source_maps: bool,
    /// Sections nested deeper than this abort the parse.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            export_source_maps: true,
            max_nesting_depth: 32,
        }
    }
}

/// A parsed node together with every diagnostic produced building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    pub node: T,
    pub report: Report,
}

/// Parses the node tree `root` of `source` into a blueprint.
///
/// `source` is used to recover raw text for descriptions; pass the text the
/// tree was built from. Parsing never fails: when it has to stop, the
/// returned blueprint is empty and the report carries the reason.
pub fn parse(source: &str, root: &MarkdownNode, options: &ParseOptions) -> ParseResult<Blueprint> {
    let mut ctx = ParseContext::new(source, options);
    let roots = std::slice::from_ref(root);
    let node = match parse_section(SectionType::Blueprint, Cursor::new(roots, 0), &mut ctx) {
        Ok(Outcome::Parsed {
            entity: Entity::Blueprint(blueprint),
            ..
        }) => blueprint,
        Ok(_) | Err(SectionError::Invalid(_)) => Blueprint::default(),
        Err(SectionError::Aborted) => {
            log::warn!("blueprint parse aborted");
            Blueprint::default()
        }
    };
    ParseResult {
        node,
        report: ctx.into_report(),
    }
}

/// Tokenizes `source` as markdown and parses it.
pub fn parse_blueprint(source: &str, options: &ParseOptions) -> ParseResult<Blueprint> {
    let root = parse_markdown(source);
    parse(source, &root, options)
}
