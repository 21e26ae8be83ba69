//! URI parameters.
//!
//! ```text
//! + Parameters
//!     + id: `42` (number, required) - Note id
//!
//!         Additional description.
//!
//!         + Default: `1`
//!         + Values
//!             + `1`
//!             + `42`
//! ```

use crate::ast::mson::{TypeSection, TypeSectionClass, TypeSectionContent};
use crate::ast::{Parameter, ParameterUse};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::{Diagnostic, DiagnosticCode};
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, parameter_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{
    Entity, EntityProcessor, SectionResult, push_paragraph,
};
use crate::parsing::signature::{is_valid_parameter_name, member_signature, unescape};

/// `+ Parameters` and its list of parameter definitions.
#[derive(Debug, Default)]
pub struct ParametersProcessor {
    parameters: Vec<Parameter>,
}

impl EntityProcessor for ParametersProcessor {
    fn layout(&self) -> Layout {
        Layout::List
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let (_, remaining) = first_line(&node.text);
        if !remaining.trim().is_empty() {
            ctx.warn(
                DiagnosticCode::Ignoring,
                "ignoring text after the parameters keyword, define parameters as nested list items",
                &node.source_map,
            );
        }
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        if node.is_list_item() {
            SectionType::Parameter
        } else {
            SectionType::Undefined
        }
    }

    fn accept(&mut self, entity: Entity, _source_map: &SourceMap, _ctx: &mut ParseContext<'_>) {
        if let Entity::Parameter(parameter) = entity {
            self.parameters.push(parameter);
        }
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        if self.parameters.is_empty() {
            ctx.warn(
                DiagnosticCode::EmptyDefinition,
                "no parameters specified",
                source_map,
            );
        }
        Entity::Parameters(self.parameters)
    }
}

/// One parameter definition.
#[derive(Debug, Default)]
pub struct ParameterProcessor {
    parameter: Parameter,
    values_defined: bool,
}

impl ParameterProcessor {
    fn apply_attributes(&mut self, attributes: &[String], source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        for attribute in attributes {
            match attribute.to_ascii_lowercase().as_str() {
                "required" => self.parameter.usage = ParameterUse::Required,
                "optional" => self.parameter.usage = ParameterUse::Optional,
                _ if self.parameter.type_name.is_empty() => {
                    self.parameter.type_name = unescape(attribute);
                }
                _ => ctx.warn(
                    DiagnosticCode::Format,
                    format!(
                        "ignoring parameter attribute '{attribute}', type is already '{}'",
                        self.parameter.type_name
                    ),
                    source_map,
                ),
            }
        }
    }

    fn validate(&self, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        let parameter = &self.parameter;
        if parameter.usage == ParameterUse::Required && !parameter.default_value.is_empty() {
            ctx.warn(
                DiagnosticCode::Parameter,
                format!(
                    "specifying parameter '{}' as required supersedes its default value, declare it as 'optional' to specify its default value",
                    parameter.name
                ),
                source_map,
            );
        }
        if parameter.values.is_empty() {
            return;
        }
        for (what, value) in [
            ("default", &parameter.default_value),
            ("example", &parameter.example_value),
        ] {
            if !value.is_empty() && !parameter.values.contains(value) {
                ctx.warn(
                    DiagnosticCode::Parameter,
                    format!(
                        "the {what} value '{value}' of parameter '{}' is not in its list of expected values",
                        parameter.name
                    ),
                    source_map,
                );
            }
        }
    }
}

impl EntityProcessor for ParameterProcessor {
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
        if signature.identifier.is_empty() || !is_valid_parameter_name(&signature.identifier) {
            return Err(Diagnostic::error(
                DiagnosticCode::Parameter,
                format!(
                    "unable to parse parameter specification '{}'",
                    first_line(&node.text).0.trim()
                ),
                node.source_map.clone(),
            )
            .into());
        }

        self.parameter.name = signature.identifier;
        let mut values = signature.values.into_iter();
        if let Some(example) = values.next() {
            self.parameter.example_value = example;
        }
        if values.next().is_some() {
            ctx.warn(
                DiagnosticCode::Format,
                format!(
                    "parameter '{}' lists several example values, using the first",
                    self.parameter.name
                ),
                &node.source_map,
            );
        }
        self.apply_attributes(&signature.attributes, &node.source_map, ctx);
        push_paragraph(&mut self.parameter.description, &signature.content);
        push_paragraph(&mut self.parameter.description, &signature.remaining);
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
        push_paragraph(&mut self.parameter.description, &ctx.text_of(cursor.node()));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        parameter_section_type(node)
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::Values(values) => {
                if self.values_defined {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        format!(
                            "multiple value lists for parameter '{}', using the last one",
                            self.parameter.name
                        ),
                        source_map,
                    );
                }
                self.values_defined = true;
                self.parameter.values = values;
            }
            Entity::MsonTypeSection(TypeSection {
                class,
                content: TypeSectionContent::Value(value),
                ..
            }) => match class {
                TypeSectionClass::Default => self.parameter.default_value = unescape(&value),
                TypeSectionClass::Sample => self.parameter.example_value = unescape(&value),
                _ => {}
            },
            Entity::MsonTypeSection(_) => ctx.warn(
                DiagnosticCode::Format,
                format!(
                    "expected a single value for parameter '{}'",
                    self.parameter.name
                ),
                source_map,
            ),
            _ => {}
        }
    }

    fn dangling_text(&mut self) -> Option<&mut String> {
        Some(&mut self.parameter.description)
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        self.validate(source_map, ctx);
        self.parameter.source_map = source_map.clone();
        Entity::Parameter(self.parameter)
    }
}

/// `+ Values` (or `+ Members`) under a parameter: one value per item.
#[derive(Debug, Default)]
pub struct ValuesProcessor {
    values: Vec<String>,
}

impl EntityProcessor for ValuesProcessor {
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

    fn is_content_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        node.is_list_item()
    }

    fn process_content(&mut self, cursor: Cursor<'_>, _ctx: &mut ParseContext<'_>) -> SectionResult {
        let (line, _) = first_line(cursor.node().signature_text());
        let value = unescape(line);
        if !value.is_empty() {
            self.values.push(value);
        }
        Ok(Step::consume(cursor))
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        if self.values.is_empty() {
            ctx.warn(
                DiagnosticCode::EmptyDefinition,
                "no parameter values specified",
                source_map,
            );
        }
        Entity::Values(self.values)
    }
}
