/// Byte range `[start, end)` of the parsed source.
///
/// Nodes own their text. Spans only live while a page is parsed, to tell
/// whether two pieces of inline text sat next to each other in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Whether `next` starts where this span ends.
    pub fn touches(self, next: Span) -> bool {
        self.end == next.start
    }

    /// The range from this span's start to the end of `next`.
    #[must_use]
    pub fn join(self, next: Span) -> Span {
        Span {
            start: self.start,
            end: next.end,
        }
    }
}
