//! Script-run splitting of input text.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_BLOCK: Regex = Regex::new(
        r"(?P<han>[\x{4E00}-\x{9FA5}]+)|(?P<alnum>[A-Za-z0-9+#&._]+)|(?P<space>\s+)|(?s:.)"
    )
    .unwrap();
}

/// A maximal span of input that the segmenters handle as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    /// Run of Chinese characters, to be segmented.
    Han(&'a str),
    /// Token emitted verbatim: a latin/digit run, a collapsed whitespace
    /// run `" "`, or any other single character.
    Word(&'a str),
}

/// Iterator over the blocks of a text, created by [`blocks()`].
pub struct Blocks<'a> {
    input: &'a str,
    pos: usize,
}

/// Splits `input` into Chinese runs and verbatim tokens, in input order.
pub fn blocks(input: &str) -> Blocks {
    Blocks { input, pos: 0 }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = RE_BLOCK.captures_at(self.input, self.pos)?;
        let m = caps.get(0)?;
        self.pos = m.end();
        let block = if caps.name("han").is_some() {
            Block::Han(m.as_str())
        } else if caps.name("space").is_some() {
            Block::Word(" ")
        } else {
            Block::Word(m.as_str())
        };
        Some(block)
    }
}

/// Characters of one Chinese run with their byte offsets, kept in reusable
/// buffers.
#[derive(Default, Clone, Debug)]
pub(crate) struct Sentence<'a> {
    input: &'a str,
    chars: Vec<char>,
    c2b: Vec<usize>,
}

impl<'a> Sentence<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sentence(&mut self, input: &'a str) {
        self.input = input;
        self.chars.clear();
        self.c2b.clear();
        for (bi, ch) in input.char_indices() {
            self.chars.push(ch);
            self.c2b.push(bi);
        }
        self.c2b.push(input.len());
    }

    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Gets the substring of the characters `[start, end)`.
    #[inline(always)]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[self.c2b[start]..self.c2b[end]]
    }
}
