//! `# Data Structures` and the named types under it.
//!
//! ```text
//! # Data Structures
//!
//! ## Note (object)
//!
//! + id: `1` (number)
//! + title (string)
//! ```

use crate::ast::mson::TypeName;
use crate::ast::{Category, CategoryKind, DataStructure, Element};
use crate::markdown::MarkdownNode;
use crate::report::{Diagnostic, DiagnosticCode};
use crate::source_map::SourceMap;

use crate::parsing::classify::{MemberContext, SectionType, header_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult};
use crate::parsing::signature::member_signature;

use super::mson::{TypeBody, type_definition, type_name};
use super::resource_group::push_copy;

#[derive(Debug, Default)]
pub struct DataStructureGroupProcessor {
    category: Category,
}

impl EntityProcessor for DataStructureGroupProcessor {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        self.category.kind = CategoryKind::DataStructures;
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_header()
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
        if node.is_header() && header_section_type(node) == SectionType::Undefined {
            SectionType::NamedType
        } else {
            SectionType::Undefined
        }
    }

    fn accept(&mut self, entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {
        if let Entity::NamedType(data_structure) = entity {
            self.category.content.push(Element::DataStructure(data_structure));
        }
    }

    fn is_terminator(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        header_section_type(node) != SectionType::Undefined
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        self.category.source_map = source_map.clone();
        Entity::DataStructureGroup(self.category)
    }
}

/// `## Name (type)` followed by the type's description and members.
#[derive(Debug, Default)]
pub struct NamedTypeProcessor {
    structure: DataStructure,
    body: TypeBody,
}

impl EntityProcessor for NamedTypeProcessor {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let signature = member_signature(&node.text);
        let name = type_name(&signature.identifier);
        if name.is_empty() {
            return Err(Diagnostic::error(
                DiagnosticCode::Mson,
                "expected a data structure name, e.g. '## Name (object)'",
                node.source_map.clone(),
            )
            .into());
        }
        if !matches!(name, TypeName::Symbol(_)) {
            ctx.warn(
                DiagnosticCode::Mson,
                format!(
                    "data structure name '{}' is a reserved type name",
                    signature.identifier
                ),
                &node.source_map,
            );
        }
        self.structure.name = name;
        self.structure.type_definition =
            type_definition(&signature.attributes, &node.source_map, ctx);
        self.body = TypeBody::new(MemberContext::for_type(&self.structure.type_definition));
        self.body
            .push_description(&signature.content, &ctx.source_map_of(node));
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_list_item() && !node.is_header()
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

    fn is_terminator(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        node.is_header()
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
        Entity::NamedType(DataStructure {
            sections: this.body.into_sections(),
            source_map: source_map.clone(),
            ..this.structure
        })
    }
}
