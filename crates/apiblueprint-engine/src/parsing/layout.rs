//! Where a section's nodes live relative to the cursor it is started on.

use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Header-opened sections: the section continues over the following
    /// siblings until a terminator.
    Flat,
    /// List-item sections: the section is the item's children; the first
    /// child carries the signature. Parsing resumes after the item.
    List,
}

impl Layout {
    /// Cursor on the first node the section's processor sees.
    pub fn enter<'a>(self, outer: Cursor<'a>) -> Cursor<'a> {
        match self {
            Layout::Flat => outer,
            Layout::List => outer.children(),
        }
    }

    /// Index in the outer siblings to resume at, given the inner index the
    /// section stopped at.
    pub fn exit(self, outer: Cursor<'_>, inner: usize) -> usize {
        match self {
            Layout::Flat => inner,
            Layout::List => outer.index() + 1,
        }
    }
}
