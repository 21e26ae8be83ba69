/// A byte range `[start, end)` into the original document.
///
/// Every markdown node and every parsed entity refers back to its source
/// through spans, so diagnostics can point at the exact bytes involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Ordered byte-range provenance of one entity.
///
/// A source map is the union of the spans of every node consumed while
/// building the entity, kept in consumption order. Empty spans are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceMap {
    spans: Vec<Span>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut map = Self::new();
        for span in spans {
            map.push(span);
        }
        map
    }

    pub fn push(&mut self, span: Span) {
        if !span.is_empty() {
            self.spans.push(span);
        }
    }

    /// Appends every span of `other`, preserving order.
    pub fn append(&mut self, other: &SourceMap) {
        for span in &other.spans {
            self.push(*span);
        }
    }

    /// Returns a new map holding `self` followed by `other`.
    #[must_use]
    pub fn union(mut self, other: &SourceMap) -> Self {
        self.append(other);
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Smallest span covering every range of the map.
    pub fn extent(&self) -> Option<Span> {
        let start = self.spans.iter().map(|s| s.start).min()?;
        let end = self.spans.iter().map(|s| s.end).max()?;
        Some(Span::new(start, end))
    }

    /// Maps the ranges back onto `source`, concatenated.
    ///
    /// Returns `None` when any range falls outside `source` or splits a
    /// UTF-8 sequence.
    pub fn slice<'s>(&self, source: &'s str) -> Option<std::borrow::Cow<'s, str>> {
        match self.spans.as_slice() {
            [] => None,
            [only] => source.get(only.start..only.end).map(Into::into),
            spans => {
                let mut out = String::new();
                for span in spans {
                    out.push_str(source.get(span.start..span.end)?);
                }
                Some(out.into())
            }
        }
    }
}
