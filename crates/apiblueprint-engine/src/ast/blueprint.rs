use crate::source_map::SourceMap;

use super::mson::DataStructure;

/// A name/value pair: a metadata entry or an HTTP header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyValue {
    pub name: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The whole API description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blueprint {
    pub metadata: Vec<KeyValue>,
    pub name: String,
    pub description: String,
    pub content: Vec<Element>,
    pub source_map: SourceMap,
}

impl Blueprint {
    /// Resource groups in document order.
    pub fn resource_groups(&self) -> impl Iterator<Item = &Category> {
        self.content.iter().filter_map(|element| match element {
            Element::Category(category) if category.kind == CategoryKind::ResourceGroup => {
                Some(category)
            }
            _ => None,
        })
    }

    /// Every resource of every resource group, in document order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resource_groups()
            .flat_map(|group| group.content.iter())
            .filter_map(|element| match element {
                Element::Resource(resource) => Some(resource),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    Category,
    Copy,
    Resource,
    DataStructure,
    Asset,
}

/// A top-level node of the blueprint tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Category(Category),
    Copy(CopyText),
    Resource(Resource),
    DataStructure(DataStructure),
    Asset(Asset),
}

impl Element {
    pub fn class(&self) -> ElementClass {
        match self {
            Element::Category(_) => ElementClass::Category,
            Element::Copy(_) => ElementClass::Copy,
            Element::Resource(_) => ElementClass::Resource,
            Element::DataStructure(_) => ElementClass::DataStructure,
            Element::Asset(_) => ElementClass::Asset,
        }
    }

    pub fn source_map(&self) -> &SourceMap {
        match self {
            Element::Category(category) => &category.source_map,
            Element::Copy(copy) => &copy.source_map,
            Element::Resource(resource) => &resource.source_map,
            Element::DataStructure(data_structure) => &data_structure.source_map,
            Element::Asset(asset) => &asset.source_map,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryKind {
    #[default]
    ResourceGroup,
    DataStructures,
}

/// A grouping element: a resource group or the data structures section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Category {
    pub kind: CategoryKind,
    pub name: String,
    pub content: Vec<Element>,
    pub source_map: SourceMap,
}

/// Free-form description text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopyText {
    pub text: String,
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    pub name: String,
    pub description: String,
    pub uri_template: String,
    pub model: Option<Payload>,
    pub parameters: Vec<Parameter>,
    pub actions: Vec<Action>,
    pub attributes: Option<DataStructure>,
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Action {
    pub name: String,
    pub description: String,
    pub method: String,
    pub parameters: Vec<Parameter>,
    pub attributes: Option<DataStructure>,
    pub examples: Vec<TransactionExample>,
    pub source_map: SourceMap,
}

/// Requests and the responses they produce.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionExample {
    pub name: String,
    pub description: String,
    pub requests: Vec<Payload>,
    pub responses: Vec<Payload>,
    pub source_map: SourceMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadKind {
    #[default]
    Request,
    Response,
    Model,
}

/// A request, a response or a resource model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    pub kind: PayloadKind,
    /// Request name, response status code or model name.
    pub name: String,
    pub description: String,
    /// Ordered; duplicates allowed.
    pub headers: Vec<KeyValue>,
    pub body: Asset,
    pub schema: Asset,
    pub attributes: Option<DataStructure>,
    pub reference: Option<Reference>,
    pub source_map: SourceMap,
}

/// Reference to a resource model by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetRole {
    #[default]
    BodyExample,
    BodySchema,
}

/// Opaque body or schema text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Asset {
    pub role: AssetRole,
    pub content: String,
    pub source_map: SourceMap,
}

impl Asset {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterUse {
    #[default]
    Undefined,
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub type_name: String,
    pub usage: ParameterUse,
    pub default_value: String,
    pub example_value: String,
    pub values: Vec<String>,
    pub source_map: SourceMap,
}
