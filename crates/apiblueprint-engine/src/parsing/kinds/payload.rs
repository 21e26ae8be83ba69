//! `+ Request`, `+ Response` and `+ Model`.
//!
//! A payload either nests explicit `Headers`/`Body`/`Schema`/`Attributes`
//! sections or carries its body directly as a code block (abbreviated
//! form). A paragraph of the form `[Name][]` references a resource model.

use crate::ast::{Asset, AssetRole, KeyValue, Payload, PayloadKind, Reference};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, keyword_section_type};
use crate::parsing::code_block::content_as_code_block;
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{
    Entity, EntityProcessor, SectionResult, keep_dangling, push_paragraph,
};
use crate::parsing::signature::{payload_signature, reference_signature};

const CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug)]
pub struct PayloadProcessor {
    payload: Payload,
    body_defined: bool,
    schema_defined: bool,
    nested_seen: bool,
}

impl PayloadProcessor {
    pub fn new(kind: PayloadKind) -> Self {
        Self {
            payload: Payload {
                kind,
                body: Asset {
                    role: AssetRole::BodyExample,
                    ..Asset::default()
                },
                schema: Asset {
                    role: AssetRole::BodySchema,
                    ..Asset::default()
                },
                ..Payload::default()
            },
            body_defined: false,
            schema_defined: false,
            nested_seen: false,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.payload.kind {
            PayloadKind::Request => "request",
            PayloadKind::Response => "response",
            PayloadKind::Model => "model",
        }
    }

    fn set_asset(&mut self, asset: Asset, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        let (defined, slot, what) = match asset.role {
            AssetRole::BodyExample => (&mut self.body_defined, &mut self.payload.body, "body"),
            AssetRole::BodySchema => (&mut self.schema_defined, &mut self.payload.schema, "schema"),
        };
        if *defined || !slot.is_empty() {
            ctx.warn(
                DiagnosticCode::Redefinition,
                format!("{what} is defined more than once, using the last definition"),
                source_map,
            );
        }
        *defined = true;
        *slot = asset;
    }

    fn append_implicit_body(&mut self, node: &MarkdownNode, ctx: &mut ParseContext<'_>) {
        let text = content_as_code_block(node, ctx);
        self.payload.body.content.push_str(&text);
        self.payload.body.source_map.append(&ctx.source_map_of(node));
    }
}

impl EntityProcessor for PayloadProcessor {
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
        if let Some(signature) = payload_signature(line) {
            self.payload.name = signature.name;
            if let Some(media_type) = signature.media_type {
                self.payload.headers.push(KeyValue::new(CONTENT_TYPE, media_type));
            }
        }

        if self.payload.kind == PayloadKind::Response {
            if self.payload.name.is_empty() {
                ctx.warn(
                    DiagnosticCode::Format,
                    "missing response HTTP status code, assuming 'Response 200'",
                    &node.source_map,
                );
                self.payload.name = "200".to_string();
            } else if !self.payload.name.chars().all(|c| c.is_ascii_digit()) {
                ctx.warn(
                    DiagnosticCode::Format,
                    format!(
                        "invalid response HTTP status code '{}', expected a number",
                        self.payload.name
                    ),
                    &node.source_map,
                );
            }
        }

        push_paragraph(&mut self.payload.description, remaining);
        Ok(Step::consume(cursor))
    }

    fn is_description_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_list_item() && !node.is_code()
    }

    fn process_description(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        match reference_signature(&node.text) {
            Some(id) if self.payload.reference.is_none() => {
                self.payload.reference = Some(Reference { id });
            }
            _ => push_paragraph(&mut self.payload.description, &ctx.text_of(node)),
        }
        Ok(Step::consume(cursor))
    }

    fn is_content_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        !node.is_list_item()
    }

    fn process_content(&mut self, cursor: Cursor<'_>, ctx: &mut ParseContext<'_>) -> SectionResult {
        self.append_implicit_body(cursor.node(), ctx);
        Ok(Step::consume(cursor))
    }

    fn nested_section_type(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> SectionType {
        match keyword_section_type(node) {
            section @ (SectionType::Headers
            | SectionType::Body
            | SectionType::Schema
            | SectionType::Attributes) => section,
            _ => SectionType::Undefined,
        }
    }

    fn accept(&mut self, entity: Entity, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        self.nested_seen = true;
        match entity {
            Entity::Headers(headers) => self.payload.headers.extend(headers),
            Entity::Asset(asset) => self.set_asset(asset, source_map, ctx),
            Entity::Attributes(attributes) => {
                if self.payload.attributes.is_some() {
                    ctx.warn(
                        DiagnosticCode::Redefinition,
                        format!("{} attributes are defined more than once", self.kind_name()),
                        source_map,
                    );
                }
                self.payload.attributes = Some(attributes);
            }
            _ => {}
        }
    }

    fn process_unexpected(
        &mut self,
        cursor: Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> SectionResult {
        let node = cursor.node();
        if node.is_code() && !self.nested_seen && self.payload.body.is_empty() {
            self.append_implicit_body(node, ctx);
            return Ok(Step::consume(cursor));
        }
        Ok(keep_dangling(cursor, ctx, &mut self.payload.description))
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        self.payload.source_map = source_map.clone();
        Entity::Payload(self.payload)
    }
}
