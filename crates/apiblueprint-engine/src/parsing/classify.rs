//! # Section Classification
//!
//! Maps a markdown node to the [`SectionType`] it opens. Which classifier
//! applies depends on where the node sits: each processor asks the
//! classifier that matches its own grammar.

use crate::ast::mson::{BaseType, TypeDefinition};
use crate::markdown::{MarkdownNode, first_line};

use super::signature::{self, AssetSignature, Keyword};

/// Tag of a grammar unit; selects the processor that parses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionType {
    /// Not a section opener in the asking context.
    Undefined,
    Blueprint,
    ResourceGroup,
    Resource,
    Action,
    DataStructureGroup,
    NamedType,
    Request,
    Response,
    Model,
    Body,
    Schema,
    Headers,
    Parameters,
    Parameter,
    Values,
    Attributes,
    MsonProperty,
    MsonValue,
    MsonMixin,
    MsonOneOf,
    MsonMemberGroup,
    MsonSample,
    MsonDefault,
}

/// Whether list items under an MSON container are properties or values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberContext {
    #[default]
    Object,
    Value,
}

impl MemberContext {
    pub fn for_type(type_definition: &TypeDefinition) -> Self {
        match type_definition.base_type() {
            Some(BaseType::Array | BaseType::Enum) => MemberContext::Value,
            _ => MemberContext::Object,
        }
    }
}

fn signature_line(node: &MarkdownNode) -> &str {
    first_line(node.signature_text()).0
}

/// `Body` or `Schema` for a list item with content whose first line is the
/// matching keyword.
pub fn asset_section_type(node: &MarkdownNode) -> SectionType {
    if !node.is_list_item() || node.children.is_empty() {
        return SectionType::Undefined;
    }
    match signature::asset_signature(signature_line(node)) {
        AssetSignature::Body => SectionType::Body,
        AssetSignature::Schema => SectionType::Schema,
        AssetSignature::NoSignature => SectionType::Undefined,
    }
}

/// Keyword list items, regardless of context.
pub fn keyword_section_type(node: &MarkdownNode) -> SectionType {
    if !node.is_list_item() {
        return SectionType::Undefined;
    }
    match signature::keyword(signature_line(node)) {
        Some(Keyword::Request) => SectionType::Request,
        Some(Keyword::Response) => SectionType::Response,
        Some(Keyword::Model) => SectionType::Model,
        Some(Keyword::Body) => SectionType::Body,
        Some(Keyword::Schema) => SectionType::Schema,
        Some(Keyword::Headers) => SectionType::Headers,
        Some(Keyword::Parameters) => SectionType::Parameters,
        Some(Keyword::Values) => SectionType::Values,
        Some(Keyword::Attributes) => SectionType::Attributes,
        Some(Keyword::OneOf) => SectionType::MsonOneOf,
        Some(Keyword::Include) => SectionType::MsonMixin,
        Some(Keyword::MemberGroup) => SectionType::MsonMemberGroup,
        Some(Keyword::Sample) => SectionType::MsonSample,
        Some(Keyword::Default) => SectionType::MsonDefault,
        None => SectionType::Undefined,
    }
}

/// Header sections: groups, resources, actions and data structures.
pub fn header_section_type(node: &MarkdownNode) -> SectionType {
    if !node.is_header() {
        return SectionType::Undefined;
    }
    let line = node.text.trim();
    if signature::group_signature(line).is_some() {
        SectionType::ResourceGroup
    } else if signature::is_data_structures_signature(line) {
        SectionType::DataStructureGroup
    } else if signature::resource_signature(line).is_some() {
        SectionType::Resource
    } else if signature::action_signature(line).is_some() {
        SectionType::Action
    } else {
        SectionType::Undefined
    }
}

/// List items nested in a type definition. Anything that is not an MSON
/// keyword is a member whose kind follows `context`.
pub fn mson_section_type(node: &MarkdownNode, context: MemberContext) -> SectionType {
    if !node.is_list_item() {
        return SectionType::Undefined;
    }
    match keyword_section_type(node) {
        section @ (SectionType::MsonOneOf
        | SectionType::MsonMixin
        | SectionType::MsonMemberGroup
        | SectionType::MsonSample
        | SectionType::MsonDefault) => section,
        _ => match context {
            MemberContext::Object => SectionType::MsonProperty,
            MemberContext::Value => SectionType::MsonValue,
        },
    }
}

/// List items nested in a URI parameter definition.
pub fn parameter_section_type(node: &MarkdownNode) -> SectionType {
    match keyword_section_type(node) {
        SectionType::Values => SectionType::Values,
        SectionType::MsonMemberGroup
            if signature::member_group_signature(signature_line(node)).as_deref()
                == Some("members") =>
        {
            SectionType::Values
        }
        section @ (SectionType::MsonDefault | SectionType::MsonSample) => section,
        _ => SectionType::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_map::Span;
    use rstest::rstest;

    fn item(first: &str) -> MarkdownNode {
        MarkdownNode::list_item(
            vec![MarkdownNode::paragraph(first, Span::new(2, 2 + first.len()))],
            Span::new(0, 2 + first.len()),
        )
    }

    fn header(text: &str) -> MarkdownNode {
        MarkdownNode::header(2, text, Span::new(0, text.len() + 3))
    }

    #[rstest]
    #[case("Body", SectionType::Body)]
    #[case("  SCHEMA  ", SectionType::Schema)]
    #[case("Body\nHello", SectionType::Body)]
    #[case("Foo", SectionType::Undefined)]
    fn asset_items(#[case] first: &str, #[case] expected: SectionType) {
        assert_eq!(asset_section_type(&item(first)), expected);
    }

    #[test]
    fn asset_requires_list_item_with_children() {
        assert_eq!(
            asset_section_type(&MarkdownNode::paragraph("Body", Span::new(0, 4))),
            SectionType::Undefined
        );
        assert_eq!(
            asset_section_type(&MarkdownNode::list_item(vec![], Span::new(0, 2))),
            SectionType::Undefined
        );
    }

    #[rstest]
    #[case("Group Notes", SectionType::ResourceGroup)]
    #[case("Data Structures", SectionType::DataStructureGroup)]
    #[case("Notes [/notes]", SectionType::Resource)]
    #[case("GET /notes", SectionType::Resource)]
    #[case("Create [POST]", SectionType::Action)]
    #[case("Introduction", SectionType::Undefined)]
    fn headers(#[case] text: &str, #[case] expected: SectionType) {
        assert_eq!(header_section_type(&header(text)), expected);
    }

    #[rstest]
    #[case("id: 1 (number)", MemberContext::Object, SectionType::MsonProperty)]
    #[case("red", MemberContext::Value, SectionType::MsonValue)]
    #[case("One Of", MemberContext::Object, SectionType::MsonOneOf)]
    #[case("Include User", MemberContext::Value, SectionType::MsonMixin)]
    #[case("Sample: 1", MemberContext::Object, SectionType::MsonSample)]
    fn mson_items(
        #[case] first: &str,
        #[case] context: MemberContext,
        #[case] expected: SectionType,
    ) {
        assert_eq!(mson_section_type(&item(first), context), expected);
    }

    #[test]
    fn parameter_members_are_values() {
        assert_eq!(parameter_section_type(&item("Members")), SectionType::Values);
        assert_eq!(parameter_section_type(&item("Values")), SectionType::Values);
        assert_eq!(parameter_section_type(&item("Items")), SectionType::Undefined);
        assert_eq!(
            parameter_section_type(&item("Default: `1`")),
            SectionType::MsonDefault
        );
    }
}
