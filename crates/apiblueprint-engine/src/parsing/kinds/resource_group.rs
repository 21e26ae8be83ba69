//! `# Group Name`: prose and the resources under it.

use crate::ast::{Category, CategoryKind, CopyText, Element};
use crate::markdown::MarkdownNode;
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, header_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult, push_paragraph};
use crate::parsing::signature::group_signature;

#[derive(Debug, Default)]
pub struct ResourceGroupProcessor {
    category: Category,
}

/// Appends `text` to the trailing copy element of `content`, opening one if
/// needed.
pub(crate) fn push_copy(content: &mut Vec<Element>, text: &str, source_map: &SourceMap) {
    if let Some(Element::Copy(copy)) = content.last_mut() {
        push_paragraph(&mut copy.text, text);
        copy.source_map.append(source_map);
        return;
    }
    let mut copy = CopyText {
        text: String::new(),
        source_map: source_map.clone(),
    };
    push_paragraph(&mut copy.text, text);
    content.push(Element::Copy(copy));
}

/// Reports an action that is not inside any resource.
pub(crate) fn reject_orphan_action(source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
    ctx.error(
        DiagnosticCode::Logical,
        "action is defined outside of a resource, declare the resource it belongs to first",
        source_map,
    );
}

impl EntityProcessor for ResourceGroupProcessor {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        self.category.kind = CategoryKind::ResourceGroup;
        self.category.name = group_signature(&node.text).unwrap_or_default();
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        header_section_type(node) == SectionType::Undefined
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        push_copy(&mut self.category.content, &ctx.text_of(node), &ctx.source_map_of(node));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match header_section_type(node) {
            section @ (SectionType::Resource | SectionType::Action) => section,
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::Resource(resource) => self.category.content.push(Element::Resource(resource)),
            Entity::Action(_) => reject_orphan_action(source_map, ctx),
            _ => {}
        }
    }

    fn is_terminator(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        matches!(
            header_section_type(node),
            SectionType::ResourceGroup | SectionType::DataStructureGroup
        )
    }

    fn process_unexpected(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        push_copy(&mut self.category.content, &ctx.text_of(node), &ctx.source_map_of(node));
        Ok(Step::consume(cursor))
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        self.category.source_map = source_map.clone();
        Entity::ResourceGroup(self.category)
    }
}
