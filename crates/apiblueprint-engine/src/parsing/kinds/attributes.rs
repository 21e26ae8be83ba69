//! `+ Attributes (type)`: the anonymous data structure of a resource,
//! action or payload.

use crate::ast::DataStructure;
use crate::markdown::{MarkdownNode, first_line};
use crate::source_map::SourceMap;

use crate::parsing::classify::{MemberContext, SectionType};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult};
use crate::parsing::signature::attributes_signature;

use super::mson::{TypeBody, type_definition};

#[derive(Debug, Default)]
pub struct AttributesProcessor {
    structure: DataStructure,
    body: TypeBody,
}

impl EntityProcessor for AttributesProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let (line, remaining) = first_line(&node.text);
        let attributes = attributes_signature(line).unwrap_or_default();
        self.structure.type_definition = type_definition(&attributes, &node.source_map, ctx);
        self.body = TypeBody::new(MemberContext::for_type(&self.structure.type_definition));
        self.body.push_description(remaining, &ctx.source_map_of(node));
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_list_item()
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        self.body
            .push_description(&ctx.text_of(node), &ctx.source_map_of(node));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        self.body.nested_section_type(node)
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        self.body.parse_nested(section, cursor, ctx)
    }

    fn process_unexpected(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        Ok(self.body.keep_dangling(cursor, ctx))
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        let this = *self;
        Entity::Attributes(DataStructure {
            sections: this.body.into_sections(),
            source_map: source_map.clone(),
            ..this.structure
        })
    }
}
