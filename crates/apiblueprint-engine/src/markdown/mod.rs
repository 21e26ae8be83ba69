//! # Markdown Node Tree
//!
//! The read-only input of the section parser: an ordered tree of typed blocks,
//! each carrying its literal text and the byte ranges it was built from.
//!
//! ## Conventions
//!
//! - Lists are flattened: list items are direct children of the block that
//!   contains the list, so a run of items is a run of siblings.
//! - A list item has no text of its own; its content is its children.
//! - Paragraph and header text is the raw inline source (header text excludes
//!   the `#` markers). Code text is the literal content including its final
//!   newline.
//!
//! The [`builder`] module is a reference tokenizer producing this tree from
//! raw text with `pulldown-cmark`. Any other tokenizer honoring the
//! conventions above can feed the parser directly.

pub mod builder;

pub use builder::parse_markdown;

use crate::source_map::{SourceMap, Span};

/// The kind of a markdown block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownNodeKind {
    /// The document itself.
    Root,
    /// An ATX or setext header with its level (1-6).
    Header(u8),
    Paragraph,
    /// An indented or fenced code block.
    Code,
    ListItem,
    Quote,
    Html,
    HorizontalRule,
}

/// One block of the markdown tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownNode {
    pub kind: MarkdownNodeKind,
    pub text: String,
    pub children: Vec<MarkdownNode>,
    pub source_map: SourceMap,
}

impl MarkdownNode {
    pub fn new(kind: MarkdownNodeKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            source_map: SourceMap::from_spans([span]),
        }
    }

    pub fn root(children: Vec<MarkdownNode>) -> Self {
        let source_map = children
            .iter()
            .fold(SourceMap::new(), |map, child| map.union(&child.source_map));
        Self {
            kind: MarkdownNodeKind::Root,
            text: String::new(),
            children,
            source_map,
        }
    }

    pub fn paragraph(text: impl Into<String>, span: Span) -> Self {
        Self::new(MarkdownNodeKind::Paragraph, text, span)
    }

    pub fn header(level: u8, text: impl Into<String>, span: Span) -> Self {
        Self::new(MarkdownNodeKind::Header(level), text, span)
    }

    pub fn code(text: impl Into<String>, span: Span) -> Self {
        Self::new(MarkdownNodeKind::Code, text, span)
    }

    pub fn list_item(children: Vec<MarkdownNode>, span: Span) -> Self {
        Self {
            kind: MarkdownNodeKind::ListItem,
            text: String::new(),
            children,
            source_map: SourceMap::from_spans([span]),
        }
    }

    pub fn is_list_item(&self) -> bool {
        self.kind == MarkdownNodeKind::ListItem
    }

    pub fn is_header(&self) -> bool {
        matches!(self.kind, MarkdownNodeKind::Header(_))
    }

    pub fn is_code(&self) -> bool {
        self.kind == MarkdownNodeKind::Code
    }

    /// The text that identifies this node's section: the node's own text, or
    /// for a list item the text of its first child.
    pub fn signature_text(&self) -> &str {
        match self.kind {
            MarkdownNodeKind::ListItem => self
                .children
                .first()
                .map(|child| child.text.as_str())
                .unwrap_or_default(),
            _ => &self.text,
        }
    }
}

/// Splits `text` into its first line and the remainder after the line break.
pub fn first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(idx) => {
            let line = text[..idx].strip_suffix('\r').unwrap_or(&text[..idx]);
            (line, &text[idx + 1..])
        }
        None => (text, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_splits_on_newline() {
        assert_eq!(first_line("Body\nHello"), ("Body", "Hello"));
        assert_eq!(first_line("Body\r\nHello\n"), ("Body", "Hello\n"));
        assert_eq!(first_line("Body"), ("Body", ""));
    }

    #[test]
    fn list_item_signature_comes_from_first_child() {
        let item = MarkdownNode::list_item(
            vec![
                MarkdownNode::paragraph("Body", Span::new(2, 6)),
                MarkdownNode::code("Hello\n", Span::new(8, 22)),
            ],
            Span::new(0, 22),
        );
        assert_eq!(item.signature_text(), "Body");
        assert_eq!(
            MarkdownNode::list_item(vec![], Span::new(0, 2)).signature_text(),
            ""
        );
    }

    #[test]
    fn root_unions_child_spans() {
        let root = MarkdownNode::root(vec![
            MarkdownNode::paragraph("a", Span::new(0, 1)),
            MarkdownNode::paragraph("b", Span::new(3, 4)),
        ]);
        assert_eq!(root.source_map.spans(), &[Span::new(0, 1), Span::new(3, 4)]);
    }
}
