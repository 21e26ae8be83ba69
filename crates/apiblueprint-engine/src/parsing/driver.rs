//! # Section Driver
//!
//! Runs one section: picks its processor from the registry, walks the
//! section's nodes through the processor's phases and folds the source maps
//! of every step into the section's own map.

use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use super::classify::SectionType;
use super::context::ParseContext;
use super::cursor::{Cursor, Step};
use super::kinds;
use super::layout::Layout;
use super::processor::{Entity, EntityProcessor, SectionError, SectionResult};

/// Result of a section that did not abort the parse.
#[derive(Debug)]
pub enum Outcome {
    Parsed {
        entity: Entity,
        source_map: SourceMap,
        next: usize,
    },
    /// The section reported an error and was dropped.
    Skipped { next: usize },
}

impl Outcome {
    pub fn next(&self) -> usize {
        match self {
            Outcome::Parsed { next, .. } | Outcome::Skipped { next } => *next,
        }
    }

    /// Hands a parsed entity to `accept` and reports what was consumed.
    pub fn into_step(self, accept: impl FnOnce(Entity, &SourceMap)) -> Step {
        match self {
            Outcome::Parsed {
                entity,
                source_map,
                next,
            } => {
                accept(entity, &source_map);
                Step::new(next, source_map)
            }
            Outcome::Skipped { next } => Step::new(next, SourceMap::new()),
        }
    }
}

/// Parses the `section` opened by the node under `cursor`.
///
/// Returns `Err` only when the parse must stop; every other problem is
/// recorded in the context's report.
pub fn parse_section(
    section: SectionType,
    cursor: Cursor<'_>,
    ctx: &mut ParseContext<'_>,
) -> SectionResult<Outcome> {
    let node = cursor.node();
    let Some(mut processor) = kinds::processor_for(section, ctx) else {
        ctx.warn(
            DiagnosticCode::Ignoring,
            format!("no section matches {section:?}"),
            &node.source_map,
        );
        return Ok(Outcome::Skipped {
            next: cursor.index() + 1,
        });
    };

    log::trace!("{section:?} at node {} (depth {})", cursor.index(), ctx.depth());
    ctx.enter(section, &node.source_map)?;
    let result = drive(processor.as_mut(), cursor, ctx);
    ctx.leave();

    match result {
        Ok(Step { next, source_map }) => {
            let entity = processor.finish(&source_map, ctx);
            Ok(Outcome::Parsed {
                entity,
                source_map,
                next,
            })
        }
        Err(SectionError::Invalid(diagnostic)) => {
            ctx.report.push(diagnostic);
            if processor.is_required() {
                return Err(SectionError::Aborted);
            }
            let next = skip(processor.as_ref(), cursor, ctx);
            log::trace!("dropped {section:?}, resuming at node {next}");
            Ok(Outcome::Skipped { next })
        }
        Err(SectionError::Aborted) => Err(SectionError::Aborted),
    }
}

fn drive(
    processor: &mut dyn EntityProcessor,
    outer: Cursor<'_>,
    ctx: &mut ParseContext<'_>,
) -> SectionResult<Step> {
    let layout = processor.layout();
    let inner = layout.enter(outer);
    let siblings = inner.siblings();
    let mut progress = Progress::new(inner.index(), siblings.len(), ctx.options.export_source_maps);

    if let Some(node) = siblings.get(progress.index) {
        if processor.has_signature(node, ctx) {
            let step = processor.process_signature(inner.at(progress.index), ctx)?;
            progress.advance(step);
        }
    }

    while let Some(node) = siblings.get(progress.index) {
        if !processor.is_description_node(node, ctx) {
            break;
        }
        let step = processor.process_description(inner.at(progress.index), ctx)?;
        progress.advance(step);
    }

    while let Some(node) = siblings.get(progress.index) {
        if !processor.is_content_node(node, ctx) {
            break;
        }
        let step = processor.process_content(inner.at(progress.index), ctx)?;
        progress.advance(step);
    }

    while let Some(node) = siblings.get(progress.index) {
        let cursor = inner.at(progress.index);
        let nested = processor.nested_section_type(node, ctx);
        let step = if nested != SectionType::Undefined {
            processor.process_nested(nested, cursor, ctx)?
        } else if processor.is_terminator(node, ctx) {
            break;
        } else {
            processor.process_unexpected(cursor, ctx)?
        };
        progress.advance(step);
    }

    Ok(Step::new(
        layout.exit(outer, progress.index),
        progress.source_map,
    ))
}

/// Where to resume after a dropped section.
fn skip(processor: &dyn EntityProcessor, cursor: Cursor<'_>, ctx: &ParseContext<'_>) -> usize {
    match processor.layout() {
        Layout::List => cursor.index() + 1,
        Layout::Flat => {
            let siblings = cursor.siblings();
            let mut index = cursor.index() + 1;
            while index < siblings.len() && !processor.is_terminator(&siblings[index], ctx) {
                index += 1;
            }
            index
        }
    }
}

struct Progress {
    index: usize,
    len: usize,
    export: bool,
    source_map: SourceMap,
}

impl Progress {
    fn new(index: usize, len: usize, export: bool) -> Self {
        Self {
            index,
            len,
            export,
            source_map: SourceMap::new(),
        }
    }

    fn advance(&mut self, step: Step) {
        assert!(
            step.next > self.index && step.next <= self.len,
            "section processor must consume at least one node: at {} of {}, next {}",
            self.index,
            self.len,
            step.next
        );
        self.index = step.next;
        if self.export {
            self.source_map.append(&step.source_map);
        }
    }
}
