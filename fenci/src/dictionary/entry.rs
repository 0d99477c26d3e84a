use bincode::{Decode, Encode};

/// A word of the dictionary.
#[derive(Debug, Clone, PartialEq, Decode, Encode)]
pub struct DictionaryEntry {
    word: String,
    freq: f64,
    log_prob: f64,
    pos: String,
}

impl DictionaryEntry {
    #[inline(always)]
    pub(crate) const fn new(word: String, freq: f64, log_prob: f64, pos: String) -> Self {
        Self {
            word,
            freq,
            log_prob,
            pos,
        }
    }

    /// Gets the surface string.
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Gets the raw frequency read from the source.
    #[inline(always)]
    pub const fn freq(&self) -> f64 {
        self.freq
    }

    /// Gets `ln(freq / total_freq)` over the whole dictionary.
    #[inline(always)]
    pub const fn log_prob(&self) -> f64 {
        self.log_prob
    }

    /// Gets the part-of-speech tag.
    #[inline(always)]
    pub fn pos(&self) -> &str {
        &self.pos
    }
}

/// A parsed line of a dictionary source before probabilities are known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawWordEntry {
    pub word: String,
    pub freq: f64,
    pub pos: String,
}
