//! The document itself: metadata, API name, description and the top-level
//! sections.
//!
//! ```text
//! FORMAT: 1A
//! HOST: https://api.example.com
//!
//! # Notes API
//!
//! Description.
//!
//! # Group Notes
//! ...
//! ```

use crate::ast::{Blueprint, Category, CategoryKind, Element, KeyValue, Resource};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, header_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{
    Entity, EntityProcessor, SectionResult, push_paragraph,
};
use crate::parsing::signature::metadata_line;

use super::resource_group::reject_orphan_action;

#[derive(Debug, Default)]
pub struct BlueprintProcessor {
    blueprint: Blueprint,
    /// Whether the last content element is the anonymous group collecting
    /// top-level resources.
    anonymous_group_open: bool,
}

/// Metadata entries of `node`, if every line of the paragraph is one.
fn metadata(node: &MarkdownNode) -> Option<Vec<KeyValue>> {
    if node.kind != MarkdownNodeKind::Paragraph {
        return None;
    }
    node.text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(metadata_line)
        .collect()
}

fn is_name_header(node: &MarkdownNode) -> bool {
    node.is_header() && header_section_type(node) == SectionType::Undefined
}

impl BlueprintProcessor {
    fn push_resource(&mut self, resource: Resource, source_map: &SourceMap) {
        if self.anonymous_group_open {
            if let Some(Element::Category(group)) = self.blueprint.content.last_mut() {
                group.content.push(Element::Resource(resource));
                group.source_map.append(source_map);
                return;
            }
        }
        self.blueprint.content.push(Element::Category(Category {
            kind: CategoryKind::ResourceGroup,
            name: String::new(),
            content: vec![Element::Resource(resource)],
            source_map: source_map.clone(),
        }));
        self.anonymous_group_open = true;
    }
}

impl EntityProcessor for BlueprintProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn is_required(&self) -> bool {
        true
    }

    fn has_signature(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        metadata(node).is_some() || is_name_header(node)
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let mut index = cursor.index();
        let mut source_map = SourceMap::new();
        let siblings = cursor.siblings();

        if let Some(entries) = metadata(cursor.node()) {
            self.blueprint.metadata = entries;
            source_map.append(&cursor.node().source_map);
            index += 1;
        }

        if let Some(node) = siblings.get(index).filter(|node| is_name_header(node)) {
            self.blueprint.name = node.text.trim().to_string();
            source_map.append(&node.source_map);
            index += 1;
        }

        log::debug!(
            "blueprint '{}' with {} metadata entries",
            self.blueprint.name,
            self.blueprint.metadata.len()
        );
        Ok(Step::new(index, source_map))
    }

    fn is_description_node(&self, node: &MarkdownNode, ctx: &ParseContext<'_>) -> bool {
        self.nested_section_type(node, ctx) == SectionType::Undefined
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        push_paragraph(&mut self.blueprint.description, &ctx.text_of(cursor.node()));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match header_section_type(node) {
            section @ (SectionType::ResourceGroup
            | SectionType::DataStructureGroup
            | SectionType::Resource
            | SectionType::Action) => section,
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::ResourceGroup(group) | Entity::DataStructureGroup(group) => {
                self.blueprint.content.push(Element::Category(group));
                self.anonymous_group_open = false;
            }
            Entity::Resource(resource) => self.push_resource(resource, source_map),
            Entity::Action(_) => reject_orphan_action(source_map, ctx),
            _ => {}
        }
    }

    fn dangling_text(&mut self) -> Option<&mut String> {
        Some(&mut self.blueprint.description)
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        if self.blueprint.name.is_empty() {
            ctx.warn(
                DiagnosticCode::Format,
                "expected API name, e.g. '# <API Name>'",
                source_map,
            );
        }
        self.blueprint.source_map = source_map.clone();
        Entity::Blueprint(self.blueprint)
    }
}
