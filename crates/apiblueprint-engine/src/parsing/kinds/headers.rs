//! `+ Headers`: one `Name: value` HTTP header per line.

use crate::ast::KeyValue;
use crate::markdown::{MarkdownNode, first_line};
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use crate::parsing::classify::{SectionType, keyword_section_type};
use crate::parsing::code_block::{content_as_code_block, signature_remainder_as_code_block};
use crate::parsing::context::ParseContext;
use crate::parsing::cursor::{Cursor, Step};
use crate::parsing::layout::Layout;
use crate::parsing::processor::{Entity, EntityProcessor, SectionResult};
use crate::parsing::signature::header_line;

#[derive(Debug, Default)]
pub struct HeadersProcessor {
    headers: Vec<KeyValue>,
}

impl HeadersProcessor {
    fn read_lines(&mut self, text: &str, source_map: &SourceMap, ctx: &mut ParseContext<'_>) {
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            match header_line(line) {
                Some(header) => self.headers.push(header),
                None => ctx.warn(
                    DiagnosticCode::Format,
                    format!("unable to parse HTTP header '{}', expected 'Name: value'", line.trim()),
                    source_map,
                ),
            }
        }
    }
}

impl EntityProcessor for HeadersProcessor {
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
        let text = signature_remainder_as_code_block(remaining, &node.source_map, ctx);
        self.read_lines(&text, &node.source_map, ctx);
        Ok(Step::consume(cursor))
    }

    fn is_content_node(&self, node: &MarkdownNode, _ctx: &ParseContext<'_>) -> bool {
        keyword_section_type(node) == SectionType::Undefined
    }

    fn process_content(&mut self, cursor: Cursor<'_>, ctx: &mut ParseContext<'_>) -> SectionResult {
        let node = cursor.node();
        let text = content_as_code_block(node, ctx);
        self.read_lines(&text, &node.source_map, ctx);
        Ok(Step::consume(cursor))
    }

    fn finish(self: Box<Self>, source_map: &SourceMap, ctx: &mut ParseContext<'_>) -> Entity {
        if self.headers.is_empty() {
            ctx.warn(
                DiagnosticCode::EmptyDefinition,
                "no HTTP headers specified",
                source_map,
            );
        }
        Entity::Headers(self.headers)
    }
}
