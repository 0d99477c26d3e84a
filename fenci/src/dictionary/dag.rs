/// An edge of the word graph: the span `[start, end]` (inclusive) and the
/// entry id if the span is a dictionary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DagEdge {
    pub end: usize,
    pub word_id: Option<u32>,
}

/// Word graph of a character run.
///
/// For every start offset `i`, it holds the ascending end offsets `j` such
/// that the characters `[i, j]` form a dictionary word, plus `j = i` even if
/// the single character is not a word.
#[derive(Default, Debug)]
pub struct Dag {
    edges: Vec<Vec<DagEdge>>,
    len_char: usize,
}

impl Dag {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self, new_len_char: usize) {
        for v in self.edges.iter_mut() {
            v.clear();
        }
        if self.edges.len() < new_len_char {
            self.edges
                .resize_with(new_len_char, || Vec::with_capacity(4));
        }
        self.len_char = new_len_char;
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, start: usize, edge: DagEdge) {
        debug_assert!(start <= edge.end);
        debug_assert!(edge.end < self.len_char);
        self.edges[start].push(edge);
    }

    #[inline(always)]
    pub(crate) fn edges(&self, start: usize) -> &[DagEdge] {
        &self.edges[start]
    }

    /// Gets the number of characters of the run.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len_char
    }

    /// Checks if the run is empty.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len_char == 0
    }

    /// Gets the inclusive end offsets of the words starting at `start`.
    ///
    /// # Panics
    ///
    /// It will panic when `start` is not less than [`Self::len()`].
    pub fn ends(&self, start: usize) -> impl Iterator<Item = usize> + '_ {
        assert!(start < self.len_char);
        self.edges[start].iter().map(|e| e.end)
    }
}
