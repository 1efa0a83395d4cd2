/// Replace `start..end` (byte offsets) with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Ordered set of non-overlapping edits against one source buffer.
///
/// Offsets always refer to the original buffer; [`EditList::apply`] works
/// back to front so earlier offsets stay valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditList {
    edits: Vec<Edit>,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        debug_assert!(edit.start <= edit.end);
        self.edits.push(edit);
    }

    /// Remove a range of bytes
    pub fn delete(&mut self, start: usize, end: usize) {
        self.replace(start, end, String::new());
    }

    /// Replace a range of bytes
    pub fn replace(&mut self, start: usize, end: usize, replacement: impl Into<String>) {
        self.push(Edit {
            start,
            end,
            replacement: replacement.into(),
        });
    }

    /// Insert text before the byte at `at`
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at, at, text);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Rewrite `source`, last edit first
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        // At the same start, the wider edit goes first so an insertion is
        // not swallowed by a deletion beginning at the same offset
        ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let mut output = source.to_string();
        for edit in ordered {
            debug_assert!(
                edit.end <= output.len(),
                "edit {}..{} past the end of a {} byte buffer",
                edit.start,
                edit.end,
                output.len()
            );
            output.replace_range(edit.start..edit.end, &edit.replacement);
        }
        output
    }
}
