//! Type definitions: property and value members, `One Of`, `Include`,
//! member groups, and `Sample` / `Default` sections.
//!
//! ```text
//! + id: `1` (number, required) - Identifier
//! + tags (array[string])
//!     + `home`
//!     + `work`
//! + One Of
//!     + email (string)
//!     + phone (string)
//! + Include Address
//! ```

use crate::ast::mson::{
    BaseType, Element, PropertyMember, PropertyName, Symbol, TypeAttribute, TypeDefinition,
    TypeName, TypeSection, TypeSectionClass, TypeSectionContent, TypeSpecification, Value,
    ValueDefinition, ValueMember,
};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{MemberContext, SectionType, mson_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::driver;
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult, excerpt, push_paragraph};
use crate::parsing::signature::{
    include_signature, member_group_signature, member_signature, sample_or_default_signature,
    split_outside, unescape,
};

/// Builds a type definition from the attributes in a signature's
/// parentheses: the first non-flag attribute is the type, every flag is kept.
pub fn type_definition(
    attributes: &[String],
    source_map: &SourceMap,
    ctx: &mut ParseContext<'_>,
) -> TypeDefinition {
    let mut definition = TypeDefinition::default();
    let mut typed = false;
    for attribute in attributes {
        if let Some(flag) = TypeAttribute::from_keyword(attribute) {
            definition.attributes.insert(flag);
        } else if typed {
            ctx.warn(
                DiagnosticCode::Mson,
                format!("ignoring '{attribute}', the type is already specified"),
                source_map,
            );
        } else {
            definition.type_specification = type_specification(attribute);
            typed = true;
        }
    }
    definition
}

/// `name` or `name[Nested, Types]`.
pub fn type_specification(text: &str) -> TypeSpecification {
    let text = text.trim();
    let (name, nested) = match text.find('[') {
        Some(open) if text.ends_with(']') => (
            &text[..open],
            split_outside(&text[open + 1..text.len() - 1], ','),
        ),
        _ => (text, Vec::new()),
    };
    TypeSpecification {
        name: type_name(name),
        nested_types: nested.iter().map(|nested| type_name(nested)).collect(),
    }
}

pub fn type_name(text: &str) -> TypeName {
    let text = unescape(text);
    if text.is_empty() {
        return TypeName::Undefined;
    }
    if let Some(base) = BaseType::from_keyword(&text) {
        return TypeName::Base(base);
    }
    match variable(&text) {
        Some(literal) => TypeName::Symbol(Symbol {
            literal,
            variable: true,
        }),
        None => TypeName::symbol(text),
    }
}

/// The name inside `*name*`.
fn variable(text: &str) -> Option<String> {
    text.strip_prefix('*')
        .and_then(|t| t.strip_suffix('*'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn value(text: &str) -> Value {
    match variable(text) {
        Some(literal) => Value {
            literal,
            variable: true,
        },
        None => Value {
            literal: text.to_string(),
            variable: false,
        },
    }
}

/// The type sections of a type being defined, and the member kind of its
/// nested list items.
#[derive(Debug, Default)]
pub struct TypeBody {
    pub context: MemberContext,
    sections: Vec<TypeSection>,
}

impl TypeBody {
    pub fn new(context: MemberContext) -> Self {
        Self {
            context,
            sections: Vec::new(),
        }
    }

    /// Adds prose to the block description, opening one if the last section
    /// is something else.
    pub fn push_description(&mut self, text: &str, source_map: &SourceMap) {
        if let Some(TypeSection {
            content: TypeSectionContent::Description(description),
            source_map: section_map,
            ..
        }) = self.sections.last_mut()
        {
            push_paragraph(description, text);
            section_map.append(source_map);
            return;
        }
        let mut description = String::new();
        push_paragraph(&mut description, text);
        if !description.is_empty() {
            self.sections.push(TypeSection {
                class: TypeSectionClass::BlockDescription,
                content: TypeSectionContent::Description(description),
                source_map: source_map.clone(),
            });
        }
    }

    /// Adds a member to the trailing member type section.
    pub fn push_member(&mut self, element: Element, source_map: &SourceMap) {
        if let Some(TypeSection {
            class: TypeSectionClass::MemberType,
            content: TypeSectionContent::Elements(elements),
            source_map: section_map,
        }) = self.sections.last_mut()
        {
            elements.push(element);
            section_map.append(source_map);
            return;
        }
        self.sections.push(TypeSection {
            class: TypeSectionClass::MemberType,
            content: TypeSectionContent::Elements(vec![element]),
            source_map: source_map.clone(),
        });
    }

    pub fn nested_section_type(&self, node: &MarkdownNode) -> SectionType {
        mson_section_type(node, self.context)
    }

    /// Parses a nested MSON section with this body's member context.
    pub fn parse_nested(
        &mut self,
        section: SectionType,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let context = self.context;
        let outcome =
            ctx.with_member_context(context, |ctx| driver::parse_section(section, cursor, ctx))?;
        Ok(outcome.into_step(|entity, source_map| self.accept(entity, source_map, ctx)))
    }

    pub fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::MsonElement(element) => self.push_member(element, source_map),
            Entity::MsonTypeSection(section) => {
                let duplicate = section.class != TypeSectionClass::MemberType
                    && self.sections.iter().any(|s| s.class == section.class);
                if duplicate {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        format!("{:?} section is defined more than once", section.class),
                        source_map,
                    );
                }
                self.sections.push(section);
            }
            _ => {}
        }
    }

    /// Keeps an out-of-place node as block description, with a warning.
    pub fn keep_dangling(&mut self, cursor: Cursor<'_>, ctx: &mut ParseContext<'_>) -> Step {
        let node = cursor.node();
        let text = ctx.text_of(node);
        ctx.warn(
            DiagnosticCode::Ignoring,
            format!(
                "dangling block '{}' appended to the type description",
                excerpt(&text)
            ),
            &node.source_map,
        );
        self.push_description(&text, &ctx.source_map_of(node));
        Step::consume(cursor)
    }

    pub fn into_sections(self) -> Vec<TypeSection> {
        self.sections
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Property,
    Value,
}

/// A property member (`name: value (type) - description`) or a value
/// member (`value (type) - description`).
#[derive(Debug)]
pub struct MemberProcessor {
    kind: MemberKind,
    name: PropertyName,
    description: String,
    value_definition: ValueDefinition,
    body: TypeBody,
}

impl MemberProcessor {
    fn new(kind: MemberKind) -> Self {
        Self {
            kind,
            name: PropertyName::default(),
            description: String::new(),
            value_definition: ValueDefinition::default(),
            body: TypeBody::default(),
        }
    }

    pub fn property() -> Self {
        Self::new(MemberKind::Property)
    }

    pub fn value() -> Self {
        Self::new(MemberKind::Value)
    }
}

impl EntityProcessor for MemberProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let signature = member_signature(&node.text);

        let literals = match self.kind {
            MemberKind::Property => {
                if signature.identifier.is_empty() {
                    ctx.warn(
                        DiagnosticCode::Mson,
                        "expected a property name, e.g. '+ name (string)'",
                        &node.source_map,
                    );
                }
                self.name = match variable(&signature.identifier) {
                    Some(literal) => PropertyName::Variable(ValueDefinition {
                        values: vec![Value {
                            literal,
                            variable: true,
                        }],
                        type_definition: TypeDefinition::default(),
                    }),
                    None => PropertyName::Literal(signature.identifier.clone()),
                };
                signature.values
            }
            MemberKind::Value => split_outside(&signature.raw_identifier, ',')
                .iter()
                .map(|value| unescape(value))
                .chain(signature.values)
                .collect(),
        };
        self.value_definition.values = literals.iter().map(|literal| value(literal)).collect();
        self.value_definition.type_definition =
            type_definition(&signature.attributes, &node.source_map, ctx);
        self.body.context = MemberContext::for_type(&self.value_definition.type_definition);

        push_paragraph(&mut self.description, &signature.content);
        push_paragraph(&mut self.description, &signature.remaining);
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

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        let this = *self;
        let sections = this.body.into_sections();
        let primitive = matches!(
            this.value_definition.type_definition.base_type(),
            Some(BaseType::String | BaseType::Number | BaseType::Boolean)
        );
        if primitive
            && sections
                .iter()
                .any(|section| !section.elements().is_empty())
        {
            ctx.warn(
                DiagnosticCode::Mson,
                "a primitive type can not have member types",
                source_map,
            );
        }
        let element = match this.kind {
            MemberKind::Property => Element::Property(PropertyMember {
                name: this.name,
                description: this.description,
                value_definition: this.value_definition,
                sections,
                source_map: source_map.clone(),
            }),
            MemberKind::Value => Element::Value(ValueMember {
                description: this.description,
                value_definition: this.value_definition,
                sections,
                source_map: source_map.clone(),
            }),
        };
        Entity::MsonElement(element)
    }
}

/// `+ Include Type`: members of `Type` are merged in downstream.
#[derive(Debug, Default)]
pub struct MixinProcessor {
    definition: TypeDefinition,
}

impl EntityProcessor for MixinProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let (line, _) = first_line(&cursor.node().text);
        if let Some(name) = include_signature(line) {
            let name = name.trim();
            let name = name
                .strip_prefix('(')
                .and_then(|n| n.strip_suffix(')'))
                .unwrap_or(name);
            self.definition.type_specification = type_specification(name);
        }
        Ok(Step::consume(cursor))
    }

    fn finish(self: Box<Self>, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        Entity::MsonElement(Element::Mixin(self.definition))
    }
}

/// `+ One Of`: mutually exclusive members.
#[derive(Debug, Default)]
pub struct OneOfProcessor {
    elements: Vec<Element>,
}

impl EntityProcessor for OneOfProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match mson_section_type(node, MemberContext::Object) {
            SectionType::MsonSample | SectionType::MsonDefault => SectionType::Undefined,
            section => section,
        }
    }

    fn accept(&mut self, entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::MsonElement(element) => self.elements.push(element),
            Entity::MsonTypeSection(TypeSection {
                content: TypeSectionContent::Elements(elements),
                ..
            }) => self.elements.push(Element::Group(elements)),
            _ => {}
        }
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        if self.elements.is_empty() {
            ctx.warn(
                DiagnosticCode::EmptyDefinition,
                "one of section has no members",
                source_map,
            );
        }
        Entity::MsonElement(Element::OneOf(self.elements))
    }
}

/// `+ Properties`, `+ Items` or `+ Members`: an explicit member section.
#[derive(Debug, Default)]
pub struct MemberGroupProcessor {
    context: MemberContext,
    elements: Vec<Element>,
}

impl EntityProcessor for MemberGroupProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let (line, _) = first_line(&cursor.node().text);
        self.context = match member_group_signature(line).as_deref() {
            Some("items" | "members") => MemberContext::Value,
            _ => MemberContext::Object,
        };
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match mson_section_type(node, self.context) {
            SectionType::MsonSample | SectionType::MsonDefault | SectionType::MsonMemberGroup => {
                SectionType::Undefined
            }
            section => section,
        }
    }

    fn accept(&mut self, entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {
        if let Entity::MsonElement(element) = entity {
            self.elements.push(element);
        }
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        Entity::MsonTypeSection(TypeSection {
            class: TypeSectionClass::MemberType,
            content: TypeSectionContent::Elements(self.elements),
            source_map: source_map.clone(),
        })
    }
}

/// `+ Sample` or `+ Default`: a literal value, or members for structured
/// types.
#[derive(Debug)]
pub struct TypeSectionProcessor {
    class: TypeSectionClass,
    context: MemberContext,
    value: String,
    elements: Vec<Element>,
}

impl TypeSectionProcessor {
    pub fn new(class: TypeSectionClass, context: MemberContext) -> Self {
        Self {
            class,
            context,
            value: String::new(),
            elements: Vec::new(),
        }
    }
}

impl EntityProcessor for TypeSectionProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let (line, remaining) = first_line(&cursor.node().text);
        if let Some(Some(inline)) = sample_or_default_signature(line) {
            self.value.push_str(&inline);
        }
        push_paragraph(&mut self.value, remaining);
        Ok(Step::consume(cursor))
    }

    fn is_content_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_list_item()
    }

    fn process_content(&mut self, cursor: Cursor<'_>, ctx: &mut ParseContext<'_>) -> SectionResult {
        let node = cursor.node();
        let text = if node.is_code() {
            node.text.clone()
        } else {
            ctx.text_of(node)
        };
        push_paragraph(&mut self.value, &text);
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match mson_section_type(node, self.context) {
            section @ (SectionType::MsonProperty | SectionType::MsonValue) => section,
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {
        if let Entity::MsonElement(element) = entity {
            self.elements.push(element);
        }
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        let content = if !self.elements.is_empty() {
            if !self.value.is_empty() {
                ctx.warn(
                    DiagnosticCode::Mson,
                    "a section with members can not also have a literal value",
                    source_map,
                );
            }
            TypeSectionContent::Elements(self.elements)
        } else {
            TypeSectionContent::Value(self.value)
        };
        Entity::MsonTypeSection(TypeSection {
            class: self.class,
            content,
            source_map: source_map.clone(),
        })
    }
}
