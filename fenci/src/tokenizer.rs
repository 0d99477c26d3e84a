//! Segmentation and tagging of raw text.
use std::collections::VecDeque;
use std::iter::Zip;
use std::ops::Range;
use std::vec;

use crate::common::MAX_WORD_LENGTH;
use crate::model::Model;
use crate::segmenter::{HmmSegmenter, MaxProbSegmenter};
use crate::sentence::{self, Block, Blocks, Sentence};

/// Tokenizer.
pub struct Tokenizer {
    model: Model,
    max_word_len: usize,
}

impl Tokenizer {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    ///  - `model`: Model to be used.
    pub const fn new(model: Model) -> Self {
        Self {
            model,
            max_word_len: MAX_WORD_LENGTH,
        }
    }

    /// Specifies the maximum number of characters of a dictionary word.
    ///
    /// # Arguments
    ///
    ///  - `max_word_len`: The maximum length. The default value is
    ///    [`MAX_WORD_LENGTH`], which is also restored by `0`.
    pub const fn max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = if max_word_len == 0 {
            MAX_WORD_LENGTH
        } else {
            max_word_len
        };
        self
    }

    /// Gets the reference to the model.
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Segments `text` into words by the maximum-probability path over the
    /// dictionary, resolving unknown runs with the character-tagging model.
    ///
    /// The returned iterator is lazy and single-pass; call this again to
    /// segment the same text twice.
    pub fn segment<'a>(&'a self, text: &'a str) -> Words<'a> {
        let segmenter = MaxProbSegmenter::new(
            self.model.dictionary(),
            self.model.hmm_segmenter(),
        )
        .max_word_len(self.max_word_len);
        Words::new(text, Engine::MaxProb(segmenter))
    }

    /// Segments `text` into words by character tagging alone, without the
    /// dictionary.
    pub fn segment_hmm<'a>(&'a self, text: &'a str) -> Words<'a> {
        Words::new(text, Engine::Hmm(self.model.hmm_segmenter()))
    }

    /// Segments `text` as [`Tokenizer::segment()`] and tags each word.
    ///
    /// The whole word sequence of `text`, verbatim tokens included, is
    /// decoded at once, so the text is segmented before the first pair is
    /// returned.
    pub fn segment_and_tag<'a>(&'a self, text: &'a str) -> TaggedWords<'a> {
        let words: Vec<_> = self.segment(text).collect();
        let tags = self.model.pos_tagger().tag(&words);
        TaggedWords {
            pairs: words.into_iter().zip(tags),
        }
    }
}

enum Engine<'a> {
    MaxProb(MaxProbSegmenter<'a>),
    Hmm(HmmSegmenter<'a>),
}

impl<'a> Engine<'a> {
    fn cut<F>(&mut self, chars: &[char], f: F)
    where
        F: FnMut(Range<usize>),
    {
        match self {
            Self::MaxProb(s) => s.cut(chars, f),
            Self::Hmm(s) => s.cut(chars, f),
        }
    }
}

/// Iterator over segmented words, created by [`Tokenizer::segment()`] and
/// [`Tokenizer::segment_hmm()`].
pub struct Words<'a> {
    blocks: Blocks<'a>,
    engine: Engine<'a>,
    sent: Sentence<'a>,
    pending: VecDeque<&'a str>,
}

impl<'a> Words<'a> {
    fn new(text: &'a str, engine: Engine<'a>) -> Self {
        Self {
            blocks: sentence::blocks(text),
            engine,
            sent: Sentence::new(),
            pending: VecDeque::new(),
        }
    }

    /// Segments the next block into the pending words.
    fn next_block(&mut self) -> Option<()> {
        debug_assert!(self.pending.is_empty());
        match self.blocks.next()? {
            Block::Han(run) => {
                self.sent.set_sentence(run);
                let Self {
                    engine,
                    sent,
                    pending,
                    ..
                } = self;
                engine.cut(sent.chars(), |r| pending.push_back(sent.slice(r.start, r.end)));
            }
            Block::Word(word) => self.pending.push_back(word),
        }
        Some(())
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            self.next_block()?;
        }
        self.pending.pop_front()
    }
}

/// Iterator over pairs of a word and its POS tag, created by
/// [`Tokenizer::segment_and_tag()`].
pub struct TaggedWords<'a> {
    pairs: Zip<vec::IntoIter<&'a str>, vec::IntoIter<&'a str>>,
}

impl<'a> Iterator for TaggedWords<'a> {
    type Item = (&'a str, &'a str);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}
