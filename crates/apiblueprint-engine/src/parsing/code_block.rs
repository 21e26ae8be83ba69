//! Reading content that is expected to be a pre-formatted code block.

use crate::markdown::MarkdownNode;
use crate::report::DiagnosticCode;
use crate::source_map::SourceMap;

use super::context::ParseContext;

/// Literal text of a content node. Anything other than a code block is taken
/// verbatim from the source, with an indentation warning.
pub fn content_as_code_block(node: &MarkdownNode, ctx: &mut ParseContext<'_>) -> String {
    if node.is_code() {
        return node.text.clone();
    }
    ctx.warn(
        DiagnosticCode::Indentation,
        "content is expected to be a pre-formatted code block, indent every line by 8 spaces or 2 tabs",
        &node.source_map,
    );
    ctx.text_of(node)
}

/// Text that followed a signature line inside the same paragraph.
pub fn signature_remainder_as_code_block(
    remaining: &str,
    source_map: &SourceMap,
    ctx: &mut ParseContext<'_>,
) -> String {
    if remaining.trim().is_empty() {
        return String::new();
    }
    ctx.warn(
        DiagnosticCode::Indentation,
        "content is expected to be a pre-formatted code block, separate it from the signature by a newline and indentation",
        source_map,
    );
    remaining.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ParseOptions;
    use crate::source_map::Span;

    #[test]
    fn code_is_taken_as_is() {
        let mut ctx = ParseContext::new("", &ParseOptions::default());
        let node = MarkdownNode::code("{}\n", Span::new(0, 11));
        assert_eq!(content_as_code_block(&node, &mut ctx), "{}\n");
        assert!(ctx.report.is_empty());
    }

    #[test]
    fn paragraph_content_warns() {
        let source = "Hello there\n";
        let mut ctx = ParseContext::new(source, &ParseOptions::default());
        let node = MarkdownNode::paragraph("Hello there", Span::new(0, 11));
        assert_eq!(content_as_code_block(&node, &mut ctx), "Hello there");
        assert_eq!(ctx.report.warning_codes(), vec![DiagnosticCode::Indentation]);
    }

    #[test]
    fn empty_remainder_is_silent() {
        let mut ctx = ParseContext::new("", &ParseOptions::default());
        assert_eq!(
            signature_remainder_as_code_block("  ", &SourceMap::new(), &mut ctx),
            ""
        );
        assert!(ctx.report.is_empty());
    }
}
