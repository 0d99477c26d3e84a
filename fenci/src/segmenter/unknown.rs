use std::ops::Range;

use bincode::{Decode, Encode};

use crate::errors::{FenciError, Result};
use crate::hmm::{Hmm, Terminals};

/// Position of a character in a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bmes {
    /// First character of a multi-character word.
    Begin,
    /// Inner character of a multi-character word.
    Middle,
    /// Last character of a multi-character word.
    End,
    /// Single-character word.
    Single,
}

impl Bmes {
    /// Gets the state name used in model tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "B",
            Self::Middle => "M",
            Self::End => "E",
            Self::Single => "S",
        }
    }
}

/// State ids of the four tags in a character-tagging model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode, Encode)]
pub(crate) struct BmesIds {
    begin: usize,
    middle: usize,
    end: usize,
    single: usize,
}

impl BmesIds {
    pub fn from_hmm(hmm: &Hmm) -> Result<Self> {
        if hmm.num_states() != 4 {
            return Err(FenciError::invalid_argument(
                "hmm",
                format!(
                    "a segmentation model must have exactly the states B, M, E, and S, \
                     but has {}.",
                    hmm.num_states()
                ),
            ));
        }
        let id = |tag: Bmes| {
            hmm.state_id(tag.as_str()).ok_or_else(|| {
                FenciError::invalid_argument(
                    "hmm",
                    format!("a segmentation model must define the state {}.", tag.as_str()),
                )
            })
        };
        Ok(Self {
            begin: id(Bmes::Begin)?,
            middle: id(Bmes::Middle)?,
            end: id(Bmes::End)?,
            single: id(Bmes::Single)?,
        })
    }

    fn tag(&self, k: usize) -> Bmes {
        if k == self.begin {
            Bmes::Begin
        } else if k == self.middle {
            Bmes::Middle
        } else if k == self.end {
            Bmes::End
        } else {
            Bmes::Single
        }
    }
}

/// Segmenter of unknown words by B/M/E/S character tagging.
#[derive(Clone, Copy)]
pub struct HmmSegmenter<'a> {
    hmm: &'a Hmm,
    ids: BmesIds,
}

impl<'a> HmmSegmenter<'a> {
    /// Creates a new segmenter on a character-tagging model.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the model lacks any of the states
    /// `B`, `M`, `E`, and `S`.
    pub fn new(hmm: &'a Hmm) -> Result<Self> {
        let ids = BmesIds::from_hmm(hmm)?;
        Ok(Self::from_parts(hmm, ids))
    }

    pub(crate) const fn from_parts(hmm: &'a Hmm, ids: BmesIds) -> Self {
        Self { hmm, ids }
    }

    /// Tags each character. The last tag is always [`Bmes::End`] or
    /// [`Bmes::Single`]; an empty input gives no tags.
    pub fn tags(&self, chars: &[char]) -> Vec<Bmes> {
        let terminals = [self.ids.end, self.ids.single];
        self.hmm
            .decode(chars, Terminals::Only(&terminals))
            .map(|path| path.states().iter().map(|&k| self.ids.tag(k)).collect())
            .unwrap_or_default()
    }

    /// Segments `chars`, calling `f` with the character range of each word
    /// in order.
    pub fn cut<F>(&self, chars: &[char], f: F)
    where
        F: FnMut(Range<usize>),
    {
        spans(&self.tags(chars), f);
    }

    /// Segments `chars` into character ranges.
    pub fn segment(&self, chars: &[char]) -> Vec<Range<usize>> {
        let mut words = vec![];
        self.cut(chars, |r| words.push(r));
        words
    }
}

/// Maps tags to word ranges.
///
/// A word starts at the first character not yet emitted. `B` and `S` close
/// an open span before them, `E` closes the span it ends, and any span still
/// open at the end is emitted as one word. The ranges always cover
/// `0..tags.len()` exactly.
pub(crate) fn spans<F>(tags: &[Bmes], mut f: F)
where
    F: FnMut(Range<usize>),
{
    let mut start = 0;
    for (i, &tag) in tags.iter().enumerate() {
        match tag {
            Bmes::Begin => {
                if start < i {
                    f(start..i);
                }
                start = i;
            }
            Bmes::Middle => {}
            Bmes::End => {
                f(start..i + 1);
                start = i + 1;
            }
            Bmes::Single => {
                if start < i {
                    f(start..i);
                }
                f(i..i + 1);
                start = i + 1;
            }
        }
    }
    if start < tags.len() {
        f(start..tags.len());
    }
}
