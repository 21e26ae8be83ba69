//! `## Name [METHOD]` and its transaction examples.
//!
//! Requests and responses are grouped into examples in document order: a
//! request that follows a response opens a new example.

use crate::ast::{Action, Payload, PayloadKind, TransactionExample};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, header_section_type, keyword_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{
    Entity, EntityProcessor, SectionResult, push_paragraph,
};
use crate::parsing::signature::action_signature;

#[derive(Debug, Default)]
pub struct ActionProcessor {
    action: Action,
}

impl ActionProcessor {
    fn push_payload(&mut self, payload: Payload, source_map: &SourceMap) {
        let opens_example = match self.action.examples.last() {
            None => true,
            Some(example) => {
                payload.kind == PayloadKind::Request && !example.responses.is_empty()
            }
        };
        if opens_example {
            self.action.examples.push(TransactionExample::default());
        }
        if let Some(example) = self.action.examples.last_mut() {
            example.source_map.append(source_map);
            match payload.kind {
                PayloadKind::Request => example.requests.push(payload),
                _ => example.responses.push(payload),
            }
        }
    }
}

impl EntityProcessor for ActionProcessor {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let (line, _) = first_line(&node.text);
        match action_signature(line) {
            Some(signature) => {
                self.action.name = signature.name;
                self.action.method = signature.method;
            }
            None => self.action.name = line.trim().to_string(),
        }
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, ctx: &ParseContext<'_>) -> bool {
        self.nested_section_type(node, ctx) == SectionType::Undefined
            && !self.is_terminator(node, ctx)
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        push_paragraph(&mut self.action.description, &ctx.text_of(cursor.node()));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match keyword_section_type(node) {
            section @ (SectionType::Parameters
            | SectionType::Attributes
            | SectionType::Request
            | SectionType::Response) => section,
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::Payload(payload) => self.push_payload(payload, source_map),
            Entity::Parameters(parameters) => self.action.parameters.extend(parameters),
            Entity::Attributes(attributes) => {
                if self.action.attributes.is_some() {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        "action attributes are defined more than once",
                        source_map,
                    );
                }
                self.action.attributes = Some(attributes);
            }
            _ => {}
        }
    }

    fn is_terminator(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        header_section_type(node) != SectionType::Undefined
    }

    fn dangling_text(&mut self) -> Option<&mut String> {
        Some(&mut self.action.description)
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        let answered = self
            .action
            .examples
            .iter()
            .any(|example| !example.responses.is_empty());
        if !answered {
            ctx.warn(
                DiagnosticCode::MissingResponse,
                format!(
                    "action '{}' is missing a response",
                    if self.action.name.is_empty() {
                        &self.action.method
                    } else {
                        &self.action.name
                    }
                ),
                source_map,
            );
        }
        self.action.source_map = source_map.clone();
        Entity::Action(self.action)
    }
}
