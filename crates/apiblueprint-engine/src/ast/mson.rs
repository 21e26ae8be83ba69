//! Type definitions (MSON) of data structures and attributes.
//!
//! An [`Element`] is a tagged union whose `OneOf` and `Group` variants own
//! their nested elements by value. Ownership makes the tree acyclic: an
//! element can only be placed into a container after it is fully built, and
//! moving it there gives up the handle, so no element can contain itself.

use std::collections::BTreeSet;

use crate::source_map::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Boolean,
    String,
    Number,
    Array,
    Enum,
    Object,
}

impl BaseType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "boolean" => Some(BaseType::Boolean),
            "string" => Some(BaseType::String),
            "number" => Some(BaseType::Number),
            "array" => Some(BaseType::Array),
            "enum" => Some(BaseType::Enum),
            "object" => Some(BaseType::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Boolean => "boolean",
            BaseType::String => "string",
            BaseType::Number => "number",
            BaseType::Array => "array",
            BaseType::Enum => "enum",
            BaseType::Object => "object",
        }
    }
}

/// A literal or `*variable*` name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Symbol {
    pub literal: String,
    pub variable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeName {
    #[default]
    Undefined,
    Base(BaseType),
    Symbol(Symbol),
}

impl TypeName {
    pub fn symbol(literal: impl Into<String>) -> Self {
        TypeName::Symbol(Symbol {
            literal: literal.into(),
            variable: false,
        })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TypeName::Undefined => true,
            TypeName::Base(_) => false,
            TypeName::Symbol(symbol) => symbol.literal.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSpecification {
    pub name: TypeName,
    /// Generic parameters, e.g. the item types of `array[Item]`.
    pub nested_types: Vec<TypeName>,
}

/// An independent type attribute flag.
///
/// The declaration order is the serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeAttribute {
    Required,
    Optional,
    Default,
    Sample,
    Fixed,
}

impl TypeAttribute {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "required" => Some(TypeAttribute::Required),
            "optional" => Some(TypeAttribute::Optional),
            "default" => Some(TypeAttribute::Default),
            "sample" => Some(TypeAttribute::Sample),
            "fixed" => Some(TypeAttribute::Fixed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeAttribute::Required => "required",
            TypeAttribute::Optional => "optional",
            TypeAttribute::Default => "default",
            TypeAttribute::Sample => "sample",
            TypeAttribute::Fixed => "fixed",
        }
    }
}

/// A set of type attribute flags; several may be present at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeAttributes(BTreeSet<TypeAttribute>);

impl TypeAttributes {
    pub fn insert(&mut self, attribute: TypeAttribute) -> bool {
        self.0.insert(attribute)
    }

    pub fn contains(&self, attribute: TypeAttribute) -> bool {
        self.0.contains(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = TypeAttribute> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TypeAttribute> for TypeAttributes {
    fn from_iter<I: IntoIterator<Item = TypeAttribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDefinition {
    pub type_specification: TypeSpecification,
    pub attributes: TypeAttributes,
}

impl TypeDefinition {
    pub fn is_empty(&self) -> bool {
        self.type_specification.name.is_empty()
            && self.type_specification.nested_types.is_empty()
            && self.attributes.is_empty()
    }

    pub fn base_type(&self) -> Option<BaseType> {
        match self.type_specification.name {
            TypeName::Base(base) => Some(base),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Value {
    pub literal: String,
    pub variable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueDefinition {
    pub values: Vec<Value>,
    pub type_definition: TypeDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Literal(String),
    Variable(ValueDefinition),
}

impl Default for PropertyName {
    fn default() -> Self {
        PropertyName::Literal(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMember {
    pub name: PropertyName,
    pub description: String,
    pub value_definition: ValueDefinition,
    pub sections: Vec<TypeSection>,
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMember {
    pub description: String,
    pub value_definition: ValueDefinition,
    pub sections: Vec<TypeSection>,
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    Property,
    Value,
    Mixin,
    OneOf,
    Group,
}

/// One member of a type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Property(PropertyMember),
    Value(ValueMember),
    /// A type whose members are merged into the container downstream.
    Mixin(TypeDefinition),
    OneOf(Vec<Element>),
    Group(Vec<Element>),
}

impl Element {
    pub fn class(&self) -> ElementClass {
        match self {
            Element::Property(_) => ElementClass::Property,
            Element::Value(_) => ElementClass::Value,
            Element::Mixin(_) => ElementClass::Mixin,
            Element::OneOf(_) => ElementClass::OneOf,
            Element::Group(_) => ElementClass::Group,
        }
    }

    /// Nested elements of a `OneOf` or `Group`.
    pub fn elements(&self) -> &[Element] {
        match self {
            Element::OneOf(elements) | Element::Group(elements) => elements,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSectionClass {
    BlockDescription,
    MemberType,
    Sample,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeSectionContent {
    Description(String),
    Value(String),
    Elements(Vec<Element>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSection {
    pub class: TypeSectionClass,
    pub content: TypeSectionContent,
    pub source_map: SourceMap,
}

impl TypeSection {
    /// Elements of a member type section, empty otherwise.
    pub fn elements(&self) -> &[Element] {
        match &self.content {
            TypeSectionContent::Elements(elements) => elements,
            _ => &[],
        }
    }
}

/// A named type or the anonymous type of an attributes section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataStructure {
    pub name: TypeName,
    pub type_definition: TypeDefinition,
    pub sections: Vec<TypeSection>,
    pub source_map: SourceMap,
}

impl DataStructure {
    /// All member elements of the structure's member type sections.
    pub fn members(&self) -> impl Iterator<Item = &Element> {
        self.sections
            .iter()
            .filter(|section| section.class == TypeSectionClass::MemberType)
            .flat_map(|section| section.elements().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_every_flag_in_declaration_order() {
        let attributes: TypeAttributes = [TypeAttribute::Sample, TypeAttribute::Required]
            .into_iter()
            .collect();
        assert_eq!(
            attributes.iter().collect::<Vec<_>>(),
            vec![TypeAttribute::Required, TypeAttribute::Sample]
        );
    }

    #[test]
    fn empty_symbol_type_name_is_empty() {
        assert!(TypeName::symbol("").is_empty());
        assert!(!TypeName::Base(BaseType::Object).is_empty());
    }

    #[test]
    fn one_of_exposes_nested_elements() {
        let member = Element::Value(ValueMember::default());
        let one_of = Element::OneOf(vec![member.clone(), member]);
        assert_eq!(one_of.class(), ElementClass::OneOf);
        assert_eq!(one_of.elements().len(), 2);
    }
}
