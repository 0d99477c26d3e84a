//! Part-of-speech tagging of word sequences.
use crate::hmm::{Hmm, Observation, Terminals};

/// Tagger assigning one POS tag per word with an HMM whose states are tags
/// and whose emissions are whole words.
#[derive(Clone, Copy)]
pub struct PosTagger<'a> {
    hmm: &'a Hmm,
}

impl<'a> PosTagger<'a> {
    /// Creates a new tagger.
    pub const fn new(hmm: &'a Hmm) -> Self {
        Self { hmm }
    }

    /// Tags `words`, returning one tag per word in input order.
    /// An empty input gives no tags.
    pub fn tag<W>(&self, words: &[W]) -> Vec<&'a str>
    where
        W: Observation,
    {
        self.hmm
            .decode(words, Terminals::Any)
            .map(|path| {
                path.states()
                    .iter()
                    .map(|&k| self.hmm.state_name(k))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pairs each word with its tag.
    pub fn pos_tag<'w>(&self, words: &[&'w str]) -> impl Iterator<Item = (&'w str, &'a str)> {
        let tags = self.tag(words);
        words.to_vec().into_iter().zip(tags)
    }
}
