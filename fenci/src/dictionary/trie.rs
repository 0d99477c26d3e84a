use std::collections::BTreeSet;

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};

use crate::errors::{FenciError, Result};

/// Double-array trie over dictionary words.
///
/// A value stored for a word is its index in the sorted word list given at
/// construction, so it can be used directly as an entry id.
pub struct Trie {
    da: crawdad::Trie,
}

impl Encode for Trie {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.da.serialize_to_vec(), encoder)?;
        Ok(())
    }
}

impl Decode for Trie {
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let data: Vec<u8> = Decode::decode(decoder)?;
        // crawdad panics on truncated input, so the layout is checked first.
        if serialized_len(&data) != Some(data.len()) {
            return Err(DecodeError::Other("broken double-array data"));
        }
        let (da, _) = crawdad::Trie::deserialize_from_slice(&data);
        Ok(Self { da })
    }
}

bincode::impl_borrow_decode!(Trie);

/// Bytes of one double-array node in crawdad's serialized form.
const NODE_BYTES: usize = 8;

/// Computes the length of crawdad's serialized trie at the head of `data`:
/// the code table, the alphabet size, and the nodes, each prefixed by a
/// little-endian `u32` count.
fn serialized_len(data: &[u8]) -> Option<usize> {
    let read_u32 = |pos: usize| {
        let bytes = data.get(pos..pos.checked_add(4)?)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?) as usize)
    };
    let table_len = read_u32(0)?;
    let pos = table_len.checked_mul(4)?.checked_add(4)?;
    read_u32(pos)?; // alphabet size
    let pos = pos + 4;
    let num_nodes = read_u32(pos)?;
    num_nodes.checked_mul(NODE_BYTES)?.checked_add(pos + 4)
}

impl Trie {
    /// Builds the trie from sorted unique words.
    pub fn from_words<I, K>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut records = vec![];
        for (i, w) in words.into_iter().enumerate() {
            records.push((w, u32::try_from(i)?));
        }
        Ok(Self {
            da: crawdad::Trie::from_records(records.iter().map(|(k, v)| (k, *v)))
                .map_err(|e| FenciError::invalid_argument("words", e.to_string()))?,
        })
    }

    /// Gets the id of the word spelled by `input`, if it is a complete word.
    #[inline(always)]
    pub fn exact_match<I>(&self, input: I) -> Option<u32>
    where
        I: IntoIterator<Item = char>,
    {
        self.da.exact_match(input)
    }

    /// Walks the trie along `input` from its first character and reports
    /// every complete word passed on the way.
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = TrieMatch> + 'a {
        self.da
            .common_prefix_search(input.iter().cloned())
            .map(move |(value, end_char)| TrieMatch::new(value, end_char))
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    pub value: u32,
    pub end_char: usize,
}

impl TrieMatch {
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}

/// Collector of trie keys before the double array is built.
#[derive(Default)]
pub struct TrieBuilder {
    words: BTreeSet<String>,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a word. Reinserting an existing word has no effect.
    ///
    /// Returns `true` if the word was not present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.words.contains(word) {
            return false;
        }
        self.words.insert(word.to_string())
    }

    /// Builds the trie together with the words ordered by their ids.
    pub fn build(self) -> Result<(Trie, Vec<String>)> {
        let words: Vec<String> = self.words.into_iter().collect();
        let trie = Trie::from_words(&words)?;
        Ok((trie, words))
    }
}
