use crate::markdown::MarkdownNode;
use crate::source_map::SourceMap;

/// Position inside a run of sibling nodes.
///
/// Processors receive a cursor on the node they are asked to handle and
/// answer with a [`Step`] telling the driver where to continue.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    siblings: &'a [MarkdownNode],
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(siblings: &'a [MarkdownNode], index: usize) -> Self {
        Self { siblings, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn siblings(&self) -> &'a [MarkdownNode] {
        self.siblings
    }

    pub fn get(&self) -> Option<&'a MarkdownNode> {
        self.siblings.get(self.index)
    }

    /// The node under the cursor.
    ///
    /// The driver only hands out cursors positioned on a node; calling this
    /// on an exhausted cursor is a bug.
    pub fn node(&self) -> &'a MarkdownNode {
        &self.siblings[self.index]
    }

    pub fn is_end(&self) -> bool {
        self.index >= self.siblings.len()
    }

    pub fn at(&self, index: usize) -> Self {
        Self::new(self.siblings, index)
    }

    /// Cursor on the first child of the current node.
    pub fn children(&self) -> Cursor<'a> {
        Cursor::new(&self.node().children, 0)
    }
}

/// What a processor consumed: the index of the first unconsumed sibling and
/// the spans of everything consumed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    pub next: usize,
    pub source_map: SourceMap,
}

impl Step {
    pub fn new(next: usize, source_map: SourceMap) -> Self {
        Self { next, source_map }
    }

    /// Consumes exactly the node under `cursor`.
    pub fn consume(cursor: Cursor<'_>) -> Self {
        Self::new(cursor.index() + 1, cursor.node().source_map.clone())
    }
}
