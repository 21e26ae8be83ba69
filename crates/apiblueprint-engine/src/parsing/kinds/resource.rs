//! `## Name [/uri]` with its parameters, model and actions.
//!
//! A `## METHOD /uri` header declares the resource and its only action at
//! once; the action then owns everything up to the next terminator.

use crate::ast::{Parameter, Resource};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, header_section_type, keyword_section_type};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::driver;
use crate::parsing::layout::Layout;
use crate::parsing::processor::{
    Entity, EntityProcessor, SectionResult, push_paragraph,
};
use crate::parsing::signature::resource_signature;

#[derive(Debug, Default)]
pub struct ResourceProcessor {
    resource: Resource,
}

impl ResourceProcessor {
    fn check_uri_template(&self, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        for problem in uri_template_problems(&self.resource.uri_template) {
            ctx.warn(
                DiagnosticCode::UriTemplate,
                format!("URI template '{}': {problem}", self.resource.uri_template),
                source_map,
            );
        }
    }

    fn check_parameters(&self, ctx: &mut ParseContext<'_>) {
        let variables = uri_template_variables(&self.resource.uri_template);
        let parameters = self.resource.parameters.iter().chain(
            self.resource
                .actions
                .iter()
                .flat_map(|action| action.parameters.iter()),
        );
        for Parameter {
            name, source_map, ..
        } in parameters
        {
            if !variables.iter().any(|variable| variable == name) {
                ctx.warn(
                    DiagnosticCode::Logical,
                    format!(
                        "parameter '{name}' is not found within the URI template '{}'",
                        self.resource.uri_template
                    ),
                    source_map,
                );
            }
        }
    }
}

impl EntityProcessor for ResourceProcessor {
    fn layout(&self) -> Layout {
        Layout::Flat
    }

    fn process_signature(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        let (line, _) = first_line(&node.text);
        let Some(signature) = resource_signature(line) else {
            self.resource.name = line.trim().to_string();
            return Ok(Step::consume(cursor));
        };
        self.resource.name = signature.name;
        self.resource.uri_template = signature.uri_template;
        if signature.method.is_none() {
            return Ok(Step::consume(cursor));
        }

        let outcome = driver::parse_section(SectionType::Action, cursor, ctx)?;
        Ok(outcome.into_step(|entity, source_map| self.accept(entity, source_map, ctx)))
    }

    fn is_description_node(&self, node: &MarkdownNode, ctx: &ParseContext<'_>) -> bool {
        self.nested_section_type(node, ctx) == SectionType::Undefined
            && !self.is_terminator(node, ctx)
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        push_paragraph(&mut self.resource.description, &ctx.text_of(cursor.node()));
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        if node.is_header() {
            return match header_section_type(node) {
                SectionType::Action => SectionType::Action,
                _ => SectionType::Undefined,
            };
        }
        match keyword_section_type(node) {
            section @ (SectionType::Parameters | SectionType::Attributes | SectionType::Model) => {
                section
            }
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        match entity {
            Entity::Action(action) => self.resource.actions.push(action),
            Entity::Parameters(parameters) => self.resource.parameters.extend(parameters),
            Entity::Attributes(attributes) => {
                if self.resource.attributes.is_some() {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        "resource attributes are defined more than once",
                        source_map,
                    );
                }
                self.resource.attributes = Some(attributes);
            }
            Entity::Payload(mut model) => {
                if self.resource.model.is_some() {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        format!(
                            "resource '{}' model is defined more than once",
                            self.resource.name
                        ),
                        source_map,
                    );
                }
                if model.name.is_empty() {
                    model.name = self.resource.name.clone();
                }
                self.resource.model = Some(model);
            }
            _ => {}
        }
    }

    fn is_terminator(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        matches!(
            header_section_type(node),
            SectionType::Resource | SectionType::ResourceGroup | SectionType::DataStructureGroup
        )
    }

    fn dangling_text(&mut self) -> Option<&mut String> {
        Some(&mut self.resource.description)
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        self.check_uri_template(source_map, ctx);
        self.check_parameters(ctx);
        self.resource.source_map = source_map.clone();
        Entity::Resource(self.resource)
    }
}

/// Variable names of every `{...}` expression, without operators or
/// modifiers.
pub fn uri_template_variables(uri_template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = uri_template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let expression = &rest[open + 1..open + close];
        let expression = expression.trim_start_matches(['+', '#', '.', '/', ';', '?', '&']);
        for variable in expression.split(',') {
            let variable = variable.trim_end_matches('*');
            let variable = variable.split(':').next().unwrap_or_default();
            if !variable.is_empty() {
                variables.push(variable.to_string());
            }
        }
        rest = &rest[open + close + 1..];
    }
    variables
}

/// Human-readable problems with the syntax of `uri_template`.
pub fn uri_template_problems(uri_template: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    let mut depth = 0usize;
    let mut expression = String::new();
    for c in uri_template.chars() {
        match c {
            '{' => {
                if depth > 0 {
                    problems.push("nested expressions are not allowed");
                }
                depth += 1;
                expression.clear();
            }
            '}' => {
                if depth == 0 {
                    problems.push("unbalanced closing brace");
                    continue;
                }
                depth -= 1;
                if expression.is_empty() {
                    problems.push("empty expression");
                } else if !expression
                    .trim_start_matches(['+', '#', '.', '/', ';', '?', '&'])
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "_.%,*:".contains(c))
                {
                    problems.push("expression contains invalid characters");
                }
            }
            _ if depth > 0 => expression.push(c),
            c if c.is_whitespace() => problems.push("contains whitespace"),
            _ => {}
        }
    }
    if depth > 0 {
        problems.push("unbalanced opening brace");
    }
    problems.dedup();
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn variables_strip_operators_and_modifiers() {
        assert_eq!(
            uri_template_variables("/notes/{id}{?page,limit:3,tags*}"),
            vec!["id", "page", "limit", "tags"]
        );
        assert!(uri_template_variables("/notes").is_empty());
    }

    #[test]
    fn template_problems() {
        assert!(uri_template_problems("/notes/{id}{?q}").is_empty());
        assert_eq!(uri_template_problems("/notes/{id"), vec!["unbalanced opening brace"]);
        assert_eq!(
            uri_template_problems("/notes/{i-d}"),
            vec!["expression contains invalid characters"]
        );
        assert_eq!(uri_template_problems("/notes/{}"), vec!["empty expression"]);
    }
}
