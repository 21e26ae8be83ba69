use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{MarkdownNode, MarkdownNodeKind};
use crate::source_map::{SourceMap, Span};

/// Builds the markdown node tree for `source`.
///
/// Lists are flattened into their parent and bare inline content of tight
/// list items is wrapped in a synthesized paragraph.
pub fn parse_markdown(source: &str) -> MarkdownNode {
    let mut builder = NodeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, Options::empty()).into_offset_iter() {
        builder.push(event, range);
    }
    builder.finish()
}

#[derive(Debug)]
struct Frame {
    kind: MarkdownNodeKind,
    span: Span,
    /// Extent of the inline events seen inside this frame.
    inline: Option<Span>,
    /// Literal text for code and html blocks.
    literal: String,
    children: Vec<MarkdownNode>,
    /// Paragraph synthesized around bare inline content.
    implicit: bool,
}

impl Frame {
    fn new(kind: MarkdownNodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            inline: None,
            literal: String::new(),
            children: Vec::new(),
            implicit: false,
        }
    }

    fn is_container(&self) -> bool {
        matches!(
            self.kind,
            MarkdownNodeKind::Root | MarkdownNodeKind::ListItem | MarkdownNodeKind::Quote
        )
    }

    fn extend_inline(&mut self, range: &Range<usize>) {
        self.inline = Some(match self.inline {
            Some(span) => Span::new(span.start.min(range.start), span.end.max(range.end)),
            None => Span::from(range.clone()),
        });
    }
}

struct NodeBuilder<'a> {
    source: &'a str,
    stack: Vec<Frame>,
}

impl<'a> NodeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: vec![Frame::new(
                MarkdownNodeKind::Root,
                Span::new(0, source.len()),
            )],
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag, range),
            Event::Text(text) | Event::Html(text) if self.in_literal() => {
                if let Some(top) = self.stack.last_mut() {
                    top.literal.push_str(&text);
                }
            }
            Event::Rule => {
                self.close_implicit();
                self.attach(MarkdownNode::new(
                    MarkdownNodeKind::HorizontalRule,
                    "",
                    Span::from(range),
                ));
            }
            _ => self.inline(range),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Paragraph => MarkdownNodeKind::Paragraph,
            Tag::Heading { level, .. } => MarkdownNodeKind::Header(heading_level(level)),
            Tag::CodeBlock(_) => MarkdownNodeKind::Code,
            Tag::Item => MarkdownNodeKind::ListItem,
            Tag::BlockQuote(_) => MarkdownNodeKind::Quote,
            Tag::HtmlBlock => MarkdownNodeKind::Html,
            Tag::List(_) => {
                self.close_implicit();
                return;
            }
            _ => {
                self.inline(range);
                return;
            }
        };
        self.close_implicit();
        self.stack.push(Frame::new(kind, Span::from(range)));
    }

    fn end(&mut self, tag: TagEnd, range: Range<usize>) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::CodeBlock
            | TagEnd::Item
            | TagEnd::BlockQuote(_)
            | TagEnd::HtmlBlock => {
                self.close_implicit();
                self.pop();
            }
            TagEnd::List(_) => self.close_implicit(),
            _ => self.inline(range),
        }
    }

    fn in_literal(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|top| matches!(top.kind, MarkdownNodeKind::Code | MarkdownNodeKind::Html))
    }

    fn inline(&mut self, range: Range<usize>) {
        if self.stack.last().is_some_and(Frame::is_container) {
            let mut frame = Frame::new(MarkdownNodeKind::Paragraph, Span::from(range.clone()));
            frame.implicit = true;
            self.stack.push(frame);
        }
        if let Some(top) = self.stack.last_mut() {
            top.extend_inline(&range);
        }
    }

    fn close_implicit(&mut self) {
        if self.stack.last().is_some_and(|top| top.implicit) {
            self.pop();
        }
    }

    fn pop(&mut self) {
        // The root frame is only taken by `finish`.
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = self.finish_frame(frame);
            self.attach(node);
        }
    }

    fn attach(&mut self, node: MarkdownNode) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn finish_frame(&self, frame: Frame) -> MarkdownNode {
        let span = match (frame.implicit, frame.inline) {
            (true, Some(inline)) => inline,
            _ => frame.span,
        };
        let text = match frame.kind {
            MarkdownNodeKind::Code | MarkdownNodeKind::Html => frame.literal,
            MarkdownNodeKind::Paragraph | MarkdownNodeKind::Header(_) => frame
                .inline
                .and_then(|inline| self.source.get(inline.start..inline.end))
                .map(|text| text.trim_end().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        MarkdownNode {
            kind: frame.kind,
            text,
            children: frame.children,
            source_map: SourceMap::from_spans([span]),
        }
    }

    fn finish(mut self) -> MarkdownNode {
        while self.stack.len() > 1 {
            self.pop();
        }
        let root = self
            .stack
            .pop()
            .unwrap_or_else(|| Frame::new(MarkdownNodeKind::Root, Span::new(0, 0)));
        MarkdownNode::root(root.children)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(nodes: &[MarkdownNode]) -> Vec<MarkdownNodeKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn empty_document_has_no_children() {
        let root = parse_markdown("");
        assert_eq!(root.kind, MarkdownNodeKind::Root);
        assert!(root.children.is_empty());
    }

    #[test]
    fn header_text_excludes_markers() {
        let root = parse_markdown("## Notes [/notes/{id}]\n");
        assert_eq!(kinds(&root.children), vec![MarkdownNodeKind::Header(2)]);
        assert_eq!(root.children[0].text, "Notes [/notes/{id}]");
    }

    #[test]
    fn lists_are_flattened_into_parent() {
        let root = parse_markdown("Intro\n\n+ One\n+ Two\n");
        assert_eq!(
            kinds(&root.children),
            vec![
                MarkdownNodeKind::Paragraph,
                MarkdownNodeKind::ListItem,
                MarkdownNodeKind::ListItem
            ]
        );
        assert_eq!(root.children[1].signature_text(), "One");
        assert_eq!(root.children[2].signature_text(), "Two");
    }

    #[test]
    fn tight_item_content_becomes_paragraph() {
        let root = parse_markdown("+ Parameters\n    + id (number)\n");
        let item = &root.children[0];
        assert_eq!(
            kinds(&item.children),
            vec![MarkdownNodeKind::Paragraph, MarkdownNodeKind::ListItem]
        );
        assert_eq!(item.children[0].text, "Parameters");
        assert_eq!(item.children[1].signature_text(), "id (number)");
    }

    #[test]
    fn code_block_text_is_literal() {
        let source = "+ Body\n\n      Hello\n";
        let root = parse_markdown(source);
        let item = &root.children[0];
        assert_eq!(
            kinds(&item.children),
            vec![MarkdownNodeKind::Paragraph, MarkdownNodeKind::Code]
        );
        assert_eq!(item.children[1].text, "Hello\n");
    }

    #[test]
    fn spans_slice_back_to_source() {
        let source = "# API\n\nSome text.\n";
        let root = parse_markdown(source);
        let paragraph = &root.children[1];
        let text = paragraph.source_map.slice(source).unwrap_or_default();
        assert_eq!(text.trim_end(), "Some text.");
    }
}
