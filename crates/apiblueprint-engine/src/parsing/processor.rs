//! # Entity Processors
//!
//! One [`EntityProcessor`] exists per grammar unit. The driver walks a
//! section's nodes in four phases and calls back into the processor:
//!
//! 1. signature: the node that opened the section
//! 2. description: leading prose
//! 3. content: leading content blocks
//! 4. nested sections, until the nodes run out or a terminator is reached
//!
//! Every callback answers with a [`Step`]. The processor owns the entity it
//! is building and hands it over in [`EntityProcessor::finish`].

use crate::ast::mson::{self, DataStructure, TypeSection};
use crate::ast::{Action, Asset, Blueprint, Category, KeyValue, Parameter, Payload, Resource};
use crate::markdown::MarkdownNode;
use crate::report::{Diagnostic, DiagnosticCode};
use crate::source_map::SourceMap;

use super::classify::SectionType;
use super::context::ParseContext;
use super::cursor::{Cursor, Step};
use super::driver;
use super::layout::Layout;

/// Why a section stopped early.
#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    /// The section is unusable and is dropped; parsing continues after it.
    #[error(transparent)]
    Invalid(#[from] Diagnostic),
    /// The whole parse stops.
    #[error("parsing aborted")]
    Aborted,
}

pub type SectionResult<T = Step> = Result<T, SectionError>;

/// A finished entity, tagged by the grammar unit that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Blueprint(Blueprint),
    ResourceGroup(Category),
    DataStructureGroup(Category),
    Resource(Resource),
    Action(Action),
    Payload(Payload),
    Asset(Asset),
    Headers(Vec<KeyValue>),
    Parameters(Vec<Parameter>),
    Parameter(Parameter),
    Values(Vec<String>),
    Attributes(DataStructure),
    NamedType(DataStructure),
    MsonElement(mson::Element),
    MsonTypeSection(TypeSection),
}

pub trait EntityProcessor {
    fn layout(&self) -> Layout;

    /// An error in a required section aborts the whole parse.
    fn is_required(&self) -> bool {
        false
    }

    /// Whether `node`, the first node of the section, is its signature.
    fn has_signature(&self, _node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        true
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult;

    fn is_description_node(&self, _node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        false
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        Ok(Step::consume(cursor))
    }

    fn is_content_node(&self, _node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        false
    }

    fn process_content(&mut self, cursor: Cursor<'_>, _ctx: &mut ParseContext<'_>) -> SectionResult {
        Ok(Step::consume(cursor))
    }

    /// The nested section `node` opens, or `Undefined`.
    fn nested_section_type(&self, _node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        SectionType::Undefined
    }

    /// Parses a nested section and hands the result to [`Self::accept`].
    fn process_nested(
        &mut self,
        section: SectionType,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let outcome = driver::parse_section(section, cursor, ctx)?;
        Ok(outcome.into_step(|entity, source_map| self.accept(entity, source_map, ctx)))
    }

    /// Takes ownership of a finished nested entity.
    fn accept(&mut self, _entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {}

    /// Whether `node` ends a flat section.
    fn is_terminator(&self, _node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        false
    }

    /// Prose that out-of-place nodes are appended to, for entities that
    /// carry a description.
    fn dangling_text(&mut self) -> Option<&mut String> {
        None
    }

    /// Handles a node that is neither nested section nor terminator. The
    /// default appends it to [`Self::dangling_text`]; entities without a
    /// description only report it.
    fn process_unexpected(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        if let Some(description) = self.dangling_text() {
            return Ok(keep_dangling(cursor, ctx, description));
        }
        let node = cursor.node();
        ctx.warn(
            DiagnosticCode::Ignoring,
            format!("ignoring unrecognized block '{}'", excerpt(&ctx.text_of(node))),
            &node.source_map,
        );
        Ok(Step::consume(cursor))
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity;
}

/// Appends a paragraph to `target`, separated by a blank line.
pub fn push_paragraph(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push_str("\n\n");
    }
    target.push_str(text);
}

/// Keeps an out-of-place node as description text, with a warning.
pub fn keep_dangling(
    cursor: Cursor<'_>,
    ctx: &mut ParseContext<'_>,
    description: &mut String,
) -> Step {
    let node = cursor.node();
    let text = ctx.text_of(node);
    ctx.warn(
        DiagnosticCode::Ignoring,
        format!(
            "dangling block '{}' appended to the description",
            excerpt(&text)
        ),
        &node.source_map,
    );
    push_paragraph(description, &text);
    Step::consume(cursor)
}

/// First line of `text`, shortened for messages.
pub fn excerpt(text: &str) -> String {
    let line = text.trim().lines().next().unwrap_or_default();
    match line.char_indices().nth(40) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_join_with_blank_line() {
        let mut text = String::new();
        push_paragraph(&mut text, "  First\n");
        push_paragraph(&mut text, "");
        push_paragraph(&mut text, "Second");
        assert_eq!(text, "First\n\nSecond");
    }

    #[test]
    fn excerpt_shortens_long_lines() {
        assert_eq!(excerpt("short\nnext"), "short");
        assert_eq!(excerpt(&"x".repeat(50)), format!("{}...", "x".repeat(40)));
    }
}
