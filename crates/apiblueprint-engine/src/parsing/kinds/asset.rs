//! `+ Body` and `+ Schema`.
//!
//! The keyword line is the signature; the rest of the item is opaque text.
//! A list item with no keyword is parsed as an implicit asset whose content
//! is the whole item.

use crate::ast::{Asset, AssetRole};
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, keyword_section_type};
use crate::parsing::code_block::{content_as_code_block, signature_remainder_as_code_block};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult};
use crate::parsing::signature::{AssetSignature, asset_signature};

#[derive(Debug)]
pub struct AssetProcessor {
    asset: Asset,
    implicit: bool,
}

impl AssetProcessor {
    pub fn new(role: AssetRole) -> Self {
        Self {
            asset: Asset {
                role,
                ..Asset::default()
            },
            implicit: false,
        }
    }
}

/// Text of one block of a keyword-less item.
fn verbatim(node: &MarkdownNode, ctx: &ParseContext<'_>) -> String {
    if node.is_code() {
        node.text.clone()
    } else {
        ctx.text_of(node)
    }
}

impl EntityProcessor for AssetProcessor {
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
        self.asset.content = match asset_signature(line) {
            AssetSignature::Body | AssetSignature::Schema => {
                signature_remainder_as_code_block(remaining, &node.source_map, ctx)
            }
            AssetSignature::NoSignature => {
                ctx.warn(
                    DiagnosticCode::AmbiguousSection,
                    format!(
                        "'{}' is neither 'Body' nor 'Schema', taking the whole item as asset content",
                        line.trim()
                    ),
                    &node.source_map,
                );
                self.implicit = true;
                verbatim(node, ctx)
            }
        };
        Ok(Step::consume(cursor))
    }

    fn is_content_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        keyword_section_type(node) == SectionType::Undefined
    }

    fn process_content(&mut self, cursor: Cursor<'_>, ctx: &mut ParseContext<'_>) -> SectionResult {
        let node = cursor.node();
        if self.implicit {
            let content = &mut self.asset.content;
            if !content.is_empty() {
                content.push_str(if content.ends_with('\n') { "\n" } else { "\n\n" });
            }
            content.push_str(&verbatim(node, ctx));
            return Ok(Step::consume(cursor));
        }
        let text = content_as_code_block(node, ctx);
        self.asset.content.push_str(&text);
        Ok(Step::consume(cursor))
    }

    fn finish(mut self: Box<Self>, source_map: &SourceMap, _ctx: &mut ParseContext<'_>) -> Entity {
        self.asset.source_map = source_map.clone();
        Entity::Asset(self.asset)
    }
}
