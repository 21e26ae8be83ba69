//! AST to [`Value`] conversion.
//!
//! Polymorphic nodes are written as an object with an `Element` (blueprint
//! elements) or `Class` (MSON elements and type sections) discriminator and
//! a `Content` whose shape depends on it.

use crate::ast::mson::{
    self, PropertyMember, PropertyName, Symbol, TypeAttributes, TypeDefinition, TypeName,
    TypeSection, TypeSectionClass, TypeSectionContent, TypeSpecification, ValueDefinition,
    ValueMember,
};
use crate::ast::{
    Action, Asset, AssetRole, Blueprint, Category, CategoryKind, DataStructure, Element,
    ElementClass, KeyValue, Parameter, ParameterUse, Payload, Reference, Resource,
    TransactionExample,
};

use super::keys;
use super::value::{Object, Value};

fn element_class_name(class: ElementClass) -> &'static str {
    match class {
        ElementClass::Category => "category",
        ElementClass::Copy => "copy",
        ElementClass::Resource => "resource",
        ElementClass::DataStructure => "dataStructure",
        ElementClass::Asset => "asset",
    }
}

fn mson_class_name(class: mson::ElementClass) -> &'static str {
    match class {
        mson::ElementClass::Property => "property",
        mson::ElementClass::Value => "value",
        mson::ElementClass::Mixin => "mixin",
        mson::ElementClass::OneOf => "oneOf",
        mson::ElementClass::Group => "group",
    }
}

fn type_section_class_name(class: TypeSectionClass) -> &'static str {
    match class {
        TypeSectionClass::BlockDescription => "blockDescription",
        TypeSectionClass::MemberType => "memberType",
        TypeSectionClass::Sample => "sample",
        TypeSectionClass::Default => "default",
    }
}

fn asset_role_name(role: AssetRole) -> &'static str {
    match role {
        AssetRole::BodyExample => "bodyExample",
        AssetRole::BodySchema => "bodySchema",
    }
}

fn wrap_all<T>(items: &[T], wrap: impl Fn(&T) -> Value) -> Value {
    items.iter().map(wrap).collect()
}

pub fn wrap_key_value(pair: &KeyValue) -> Value {
    Object::new()
        .with(keys::NAME, pair.name.as_str())
        .with(keys::VALUE, pair.value.as_str())
        .into()
}

pub fn wrap_reference(reference: &Reference) -> Value {
    Object::new().with(keys::ID, reference.id.as_str()).into()
}

fn wrap_literal(literal: &str, variable: bool) -> Value {
    Object::new()
        .with(keys::LITERAL, literal)
        .with(keys::VARIABLE, variable)
        .into()
}

fn wrap_symbol(symbol: &Symbol) -> Value {
    wrap_literal(&symbol.literal, symbol.variable)
}

/// A base type as its keyword, a named type as a symbol, nothing as null.
pub fn wrap_type_name(name: &TypeName) -> Value {
    if name.is_empty() {
        return Value::Null;
    }
    match name {
        TypeName::Base(base) => base.as_str().into(),
        TypeName::Symbol(symbol) => wrap_symbol(symbol),
        TypeName::Undefined => Value::Null,
    }
}

pub fn wrap_type_specification(specification: &TypeSpecification) -> Value {
    Object::new()
        .with(keys::NAME, wrap_type_name(&specification.name))
        .with(
            keys::NESTED_TYPES,
            wrap_all(&specification.nested_types, wrap_type_name),
        )
        .into()
}

/// Every attribute flag present, in declaration order.
pub fn wrap_type_attributes(attributes: &TypeAttributes) -> Value {
    attributes
        .iter()
        .map(|attribute| Value::from(attribute.as_str()))
        .collect()
}

pub fn wrap_type_definition(definition: &TypeDefinition) -> Value {
    Object::new()
        .with(
            keys::TYPE_SPECIFICATION,
            wrap_type_specification(&definition.type_specification),
        )
        .with(keys::ATTRIBUTES, wrap_type_attributes(&definition.attributes))
        .into()
}

pub fn wrap_value_definition(definition: &ValueDefinition) -> Value {
    Object::new()
        .with(
            keys::VALUES,
            wrap_all(&definition.values, |value| {
                wrap_literal(&value.literal, value.variable)
            }),
        )
        .with(
            keys::TYPE_DEFINITION,
            wrap_type_definition(&definition.type_definition),
        )
        .into()
}

fn wrap_property_name(name: &PropertyName) -> Value {
    let mut object = Object::new();
    match name {
        PropertyName::Literal(literal) if !literal.is_empty() => {
            object.set(keys::LITERAL, literal.as_str());
        }
        PropertyName::Variable(definition) => {
            object.set(keys::VARIABLE, wrap_value_definition(definition));
        }
        PropertyName::Literal(_) => {}
    }
    object.into()
}

fn wrap_property_member(member: &PropertyMember) -> Value {
    Object::new()
        .with(keys::NAME, wrap_property_name(&member.name))
        .with(keys::DESCRIPTION, member.description.as_str())
        .with(
            keys::VALUE_DEFINITION,
            wrap_value_definition(&member.value_definition),
        )
        .with(keys::SECTIONS, wrap_type_sections(&member.sections))
        .into()
}

fn wrap_value_member(member: &ValueMember) -> Value {
    Object::new()
        .with(keys::DESCRIPTION, member.description.as_str())
        .with(
            keys::VALUE_DEFINITION,
            wrap_value_definition(&member.value_definition),
        )
        .with(keys::SECTIONS, wrap_type_sections(&member.sections))
        .into()
}

/// One MSON element: `{ Class, Content }`.
pub fn wrap_mson_element(element: &mson::Element) -> Value {
    let content = match element {
        mson::Element::Property(member) => wrap_property_member(member),
        mson::Element::Value(member) => wrap_value_member(member),
        mson::Element::Mixin(definition) => wrap_type_definition(definition),
        mson::Element::OneOf(elements) | mson::Element::Group(elements) => {
            wrap_mson_elements(elements)
        }
    };
    Object::new()
        .with(keys::CONTENT, content)
        .with(keys::CLASS, mson_class_name(element.class()))
        .into()
}

pub fn wrap_mson_elements(elements: &[mson::Element]) -> Value {
    wrap_all(elements, wrap_mson_element)
}

fn wrap_type_section(section: &TypeSection) -> Value {
    let mut object = Object::new().with(keys::CLASS, type_section_class_name(section.class));
    match &section.content {
        TypeSectionContent::Description(text) | TypeSectionContent::Value(text) => {
            if !text.is_empty() {
                object.set(keys::CONTENT, text.as_str());
            }
        }
        TypeSectionContent::Elements(elements) => {
            if !elements.is_empty() {
                object.set(keys::CONTENT, wrap_mson_elements(elements));
            }
        }
    }
    object.into()
}

pub fn wrap_type_sections(sections: &[TypeSection]) -> Value {
    wrap_all(sections, wrap_type_section)
}

pub fn wrap_data_structure(structure: &DataStructure) -> Value {
    Object::new()
        .with(
            keys::ELEMENT,
            element_class_name(ElementClass::DataStructure),
        )
        .with(keys::NAME, wrap_type_name(&structure.name))
        .with(
            keys::TYPE_DEFINITION,
            wrap_type_definition(&structure.type_definition),
        )
        .with(keys::SECTIONS, wrap_type_sections(&structure.sections))
        .into()
}

/// `{ Element: "asset", Attributes: { Role }, Content }`.
pub fn wrap_asset(asset: &Asset) -> Value {
    Object::new()
        .with(keys::ELEMENT, element_class_name(ElementClass::Asset))
        .with(
            keys::ATTRIBUTES,
            Object::new().with(keys::ROLE, asset_role_name(asset.role)),
        )
        .with(keys::CONTENT, asset.content.as_str())
        .into()
}

pub fn wrap_payload(payload: &Payload) -> Value {
    let mut object = Object::new();
    if let Some(reference) = payload.reference.as_ref().filter(|r| !r.id.is_empty()) {
        object.set(keys::REFERENCE, wrap_reference(reference));
    }
    object.set(keys::NAME, payload.name.as_str());
    object.set(keys::DESCRIPTION, payload.description.as_str());
    object.set(keys::HEADERS, wrap_all(&payload.headers, wrap_key_value));
    object.set(keys::BODY, payload.body.content.as_str());
    object.set(keys::SCHEMA, payload.schema.content.as_str());

    let mut content = Vec::new();
    if let Some(attributes) = &payload.attributes {
        content.push(wrap_data_structure(attributes));
    }
    for asset in [&payload.body, &payload.schema] {
        if !asset.is_empty() {
            content.push(wrap_asset(asset));
        }
    }
    object.set(keys::CONTENT, content);
    object.into()
}

pub fn wrap_parameter(parameter: &Parameter) -> Value {
    Object::new()
        .with(keys::NAME, parameter.name.as_str())
        .with(keys::DESCRIPTION, parameter.description.as_str())
        .with(keys::TYPE, parameter.type_name.as_str())
        .with(keys::REQUIRED, parameter.usage != ParameterUse::Optional)
        .with(keys::DEFAULT, parameter.default_value.as_str())
        .with(keys::EXAMPLE, parameter.example_value.as_str())
        .with(
            keys::VALUES,
            wrap_all(&parameter.values, |value| {
                Object::new().with(keys::VALUE, value.as_str()).into()
            }),
        )
        .into()
}

fn wrap_attributes_content(attributes: Option<&DataStructure>) -> Value {
    attributes.map(wrap_data_structure).into_iter().collect()
}

pub fn wrap_transaction_example(example: &TransactionExample) -> Value {
    Object::new()
        .with(keys::NAME, example.name.as_str())
        .with(keys::DESCRIPTION, example.description.as_str())
        .with(keys::REQUESTS, wrap_all(&example.requests, wrap_payload))
        .with(keys::RESPONSES, wrap_all(&example.responses, wrap_payload))
        .into()
}

pub fn wrap_action(action: &Action) -> Value {
    Object::new()
        .with(keys::NAME, action.name.as_str())
        .with(keys::DESCRIPTION, action.description.as_str())
        .with(keys::METHOD, action.method.as_str())
        .with(keys::PARAMETERS, wrap_all(&action.parameters, wrap_parameter))
        .with(
            keys::CONTENT,
            wrap_attributes_content(action.attributes.as_ref()),
        )
        .with(
            keys::EXAMPLES,
            wrap_all(&action.examples, wrap_transaction_example),
        )
        .into()
}

pub fn wrap_resource(resource: &Resource) -> Value {
    let model = match &resource.model {
        Some(model) if !model.name.is_empty() => wrap_payload(model),
        _ => Object::new().into(),
    };
    Object::new()
        .with(keys::ELEMENT, element_class_name(ElementClass::Resource))
        .with(keys::NAME, resource.name.as_str())
        .with(keys::DESCRIPTION, resource.description.as_str())
        .with(keys::URI_TEMPLATE, resource.uri_template.as_str())
        .with(keys::MODEL, model)
        .with(
            keys::PARAMETERS,
            wrap_all(&resource.parameters, wrap_parameter),
        )
        .with(keys::ACTIONS, wrap_all(&resource.actions, wrap_action))
        .with(
            keys::CONTENT,
            wrap_attributes_content(resource.attributes.as_ref()),
        )
        .into()
}

/// The flattened `ResourceGroups` view of a group: its copy elements joined
/// into one description, its resources listed.
fn wrap_resource_group(group: &Category) -> Value {
    let mut description = String::new();
    let mut resources = Vec::new();
    for element in &group.content {
        match element {
            Element::Resource(resource) => resources.push(wrap_resource(resource)),
            Element::Copy(copy) => {
                if !description.is_empty() {
                    description.push_str("\n\n");
                }
                description.push_str(&copy.text);
            }
            _ => {}
        }
    }
    Object::new()
        .with(keys::NAME, group.name.as_str())
        .with(keys::DESCRIPTION, description)
        .with(keys::RESOURCES, resources)
        .into()
}

pub fn wrap_element(element: &Element) -> Value {
    match element {
        Element::Resource(resource) => wrap_resource(resource),
        Element::DataStructure(structure) => wrap_data_structure(structure),
        Element::Asset(asset) => wrap_asset(asset),
        Element::Copy(copy) => Object::new()
            .with(keys::ELEMENT, element_class_name(ElementClass::Copy))
            .with(keys::CONTENT, copy.text.as_str())
            .into(),
        Element::Category(category) => {
            let mut object =
                Object::new().with(keys::ELEMENT, element_class_name(ElementClass::Category));
            if !category.name.is_empty() {
                object.set(
                    keys::ATTRIBUTES,
                    Object::new().with(keys::NAME, category.name.as_str()),
                );
            }
            object.set(keys::CONTENT, wrap_all(&category.content, wrap_element));
            object.into()
        }
    }
}

/// The serialized document, rooted at `{ ASTVersion: "2.1", ... }`.
pub fn wrap_blueprint(blueprint: &Blueprint) -> Value {
    let resource_groups: Vec<Value> = blueprint
        .content
        .iter()
        .filter_map(|element| match element {
            Element::Category(group) if group.kind == CategoryKind::ResourceGroup => {
                Some(wrap_resource_group(group))
            }
            _ => None,
        })
        .collect();

    Object::new()
        .with(keys::AST_VERSION, keys::VERSION)
        .with(keys::METADATA, wrap_all(&blueprint.metadata, wrap_key_value))
        .with(keys::NAME, blueprint.name.as_str())
        .with(keys::DESCRIPTION, blueprint.description.as_str())
        .with(keys::ELEMENT, element_class_name(ElementClass::Category))
        .with(keys::RESOURCE_GROUPS, resource_groups)
        .with(keys::CONTENT, wrap_all(&blueprint.content, wrap_element))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CopyText;
    use crate::ast::mson::{BaseType, TypeAttribute, Value as MsonValue};
    use crate::parsing::{ParseOptions, parse_blueprint};
    use insta::assert_json_snapshot;
    use pretty_assertions::assert_eq;

    fn object_keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .map(|object| object.keys().collect())
            .unwrap_or_default()
    }

    #[test]
    fn body_asset_wraps_with_role() {
        let asset = Asset {
            role: AssetRole::BodyExample,
            content: "Hello".to_string(),
            ..Asset::default()
        };
        assert_json_snapshot!(wrap_asset(&asset), @r#"
        {
          "Element": "asset",
          "Attributes": {
            "Role": "bodyExample"
          },
          "Content": "Hello"
        }
        "#);
    }

    #[test]
    fn every_type_attribute_is_emitted() {
        let definition = TypeDefinition {
            type_specification: TypeSpecification {
                name: TypeName::Base(BaseType::String),
                nested_types: vec![],
            },
            attributes: [
                TypeAttribute::Fixed,
                TypeAttribute::Required,
                TypeAttribute::Sample,
            ]
            .into_iter()
            .collect(),
        };
        assert_json_snapshot!(wrap_type_definition(&definition), @r#"
        {
          "TypeSpecification": {
            "Name": "string",
            "NestedTypes": []
          },
          "Attributes": [
            "required",
            "sample",
            "fixed"
          ]
        }
        "#);
    }

    #[test]
    fn named_type_name_is_a_symbol() {
        assert_eq!(
            wrap_type_name(&TypeName::symbol("Note")),
            Value::from(Object::new().with("Literal", "Note").with("Variable", false))
        );
        assert_eq!(wrap_type_name(&TypeName::Undefined), Value::Null);
    }

    #[test]
    fn mson_discriminator_selects_content_shape() {
        let property = mson::Element::Property(PropertyMember {
            name: PropertyName::Literal("id".into()),
            value_definition: ValueDefinition {
                values: vec![MsonValue {
                    literal: "1".into(),
                    variable: false,
                }],
                ..ValueDefinition::default()
            },
            ..PropertyMember::default()
        });
        let one_of = mson::Element::OneOf(vec![property.clone(), property.clone()]);

        let wrapped = wrap_mson_element(&property);
        assert_eq!(wrapped.get("Class").and_then(Value::as_str), Some("property"));
        let content = wrapped.get("Content").expect("content");
        assert_eq!(
            object_keys(content),
            vec!["Name", "Description", "ValueDefinition", "Sections"]
        );

        let wrapped = wrap_mson_element(&one_of);
        assert_eq!(wrapped.get("Class").and_then(Value::as_str), Some("oneOf"));
        let content = wrapped.get("Content").and_then(Value::as_array).expect("array");
        assert_eq!(content.len(), 2);
        assert!(
            content
                .iter()
                .all(|item| item.get("Class").and_then(Value::as_str) == Some("property"))
        );
    }

    #[test]
    fn empty_type_section_has_no_content() {
        let section = TypeSection {
            class: TypeSectionClass::MemberType,
            content: TypeSectionContent::Elements(vec![]),
            source_map: Default::default(),
        };
        let wrapped = wrap_type_sections(std::slice::from_ref(&section));
        assert_eq!(object_keys(&wrapped.as_array().expect("array")[0]), vec!["Class"]);
    }

    #[test]
    fn payload_content_lists_attributes_then_assets() {
        let payload = Payload {
            name: "200".into(),
            body: Asset {
                role: AssetRole::BodyExample,
                content: "{}\n".into(),
                ..Asset::default()
            },
            schema: Asset {
                role: AssetRole::BodySchema,
                content: "{\"type\":\"object\"}\n".into(),
                ..Asset::default()
            },
            attributes: Some(DataStructure::default()),
            ..Payload::default()
        };
        let wrapped = wrap_payload(&payload);
        assert_eq!(
            object_keys(&wrapped),
            vec!["Name", "Description", "Headers", "Body", "Schema", "Content"]
        );
        let elements: Vec<_> = wrapped
            .get("Content")
            .and_then(Value::as_array)
            .expect("array")
            .iter()
            .map(|item| item.get("Element").and_then(Value::as_str))
            .collect();
        assert_eq!(
            elements,
            vec![Some("dataStructure"), Some("asset"), Some("asset")]
        );
    }

    #[test]
    fn resource_group_copy_joins_into_description() {
        let blueprint = Blueprint {
            name: "API".into(),
            content: vec![Element::Category(Category {
                kind: CategoryKind::ResourceGroup,
                name: "Notes".into(),
                content: vec![
                    Element::Copy(CopyText {
                        text: "First.".into(),
                        ..CopyText::default()
                    }),
                    Element::Copy(CopyText {
                        text: "Second.".into(),
                        ..CopyText::default()
                    }),
                ],
                ..Category::default()
            })],
            ..Blueprint::default()
        };
        let wrapped = wrap_blueprint(&blueprint);
        assert_eq!(
            object_keys(&wrapped),
            vec![
                "ASTVersion",
                "Metadata",
                "Name",
                "Description",
                "Element",
                "ResourceGroups",
                "Content"
            ]
        );
        assert_eq!(wrapped.get("ASTVersion").and_then(Value::as_str), Some("2.1"));
        let group = &wrapped
            .get("ResourceGroups")
            .and_then(Value::as_array)
            .expect("array")[0];
        assert_eq!(
            group.get("Description").and_then(Value::as_str),
            Some("First.\n\nSecond.")
        );
    }

    #[test]
    fn wrapping_twice_is_identical() {
        let source = "FORMAT: 1A\n\n# Notes\n\n## Note [/notes/{id}]\n\n+ Parameters\n    + id (number) - Note id\n\n### Get [GET]\n\n+ Response 200 (application/json)\n\n        {}\n";
        let blueprint = parse_blueprint(source, &ParseOptions::default()).node;
        let first = wrap_blueprint(&blueprint);
        let second = wrap_blueprint(&blueprint);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
