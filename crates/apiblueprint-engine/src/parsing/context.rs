use crate::markdown::MarkdownNode;
use crate::report::{Diagnostic, DiagnosticCode, Report};
use crate::source_map::SourceMap;

use super::ParseOptions;
use super::classify::{MemberContext, SectionType};
use super::processor::{SectionError, SectionResult};

/// Mutable state threaded through one parse.
#[derive(Debug)]
pub struct ParseContext<'a> {
    source: &'a str,
    pub options: ParseOptions,
    pub report: Report,
    depth: usize,
    member_contexts: Vec<MemberContext>,
}

impl<'a> ParseContext<'a> {
    pub fn new(source: &'a str, options: &ParseOptions) -> Self {
        Self {
            source,
            options: options.clone(),
            report: Report::new(),
            depth: 0,
            member_contexts: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Raw source text of `node`, falling back to the node's own text when
    /// its spans do not map onto the source.
    pub fn text_of(&self, node: &MarkdownNode) -> String {
        if let Some(text) = node.source_map.slice(self.source) {
            return text.into_owned();
        }
        if node.text.is_empty() && !node.children.is_empty() {
            return node
                .children
                .iter()
                .map(|child| self.text_of(child))
                .collect::<Vec<_>>()
                .join("\n\n");
        }
        node.text.clone()
    }

    /// Spans of `node` to record on an entity; empty when source maps are
    /// not exported.
    pub fn source_map_of(&self, node: &MarkdownNode) -> SourceMap {
        if self.options.export_source_maps {
            node.source_map.clone()
        } else {
            SourceMap::new()
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Opens a nested section; aborts the parse past the nesting limit.
    pub fn enter(&mut self, section: SectionType, source_map: &SourceMap) -> SectionResult<()> {
        if self.depth >= self.options.max_nesting_depth {
            self.report.push(Diagnostic::error(
                DiagnosticCode::NestingDepth,
                format!(
                    "sections nested deeper than {} levels, giving up on {section:?}",
                    self.options.max_nesting_depth
                ),
                source_map.clone(),
            ));
            return Err(SectionError::Aborted);
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, source_map: &SourceMap) {
        self.report.warn(code, message, source_map.clone());
    }

    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, source_map: &SourceMap) {
        self.report
            .push(Diagnostic::error(code, message, source_map.clone()));
    }

    /// Member kind of the innermost open type definition.
    pub fn member_context(&self) -> MemberContext {
        self.member_contexts.last().copied().unwrap_or_default()
    }

    /// Runs `f` with `context` as the innermost member context.
    pub fn with_member_context<T>(
        &mut self,
        context: MemberContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.member_contexts.push(context);
        let result = f(self);
        self.member_contexts.pop();
        result
    }

    pub fn into_report(self) -> Report {
        self.report
    }
}
