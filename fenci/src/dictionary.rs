//! Dictionary for segmentation.
mod builder;
mod dag;
mod entry;
mod trie;

use bincode::{Decode, Encode};

use crate::common::UNKNOWN_POS;
use trie::Trie;

pub use builder::DictionaryBuilder;
pub use dag::Dag;
pub(crate) use dag::DagEdge;
pub use entry::DictionaryEntry;
pub(crate) use entry::RawWordEntry;
pub(crate) use trie::TrieBuilder;

/// Dictionary of words with their unigram log-probabilities and POS tags.
///
/// The dictionary is immutable once built; use [`DictionaryBuilder`] to merge
/// the base and custom sources.
#[derive(Decode, Encode)]
pub struct Dictionary {
    trie: Trie,
    entries: Vec<DictionaryEntry>, // indexed by trie values
    total_freq: f64,
    min_log_prob: f64,
}

impl Dictionary {
    pub(crate) fn new(
        trie: Trie,
        entries: Vec<DictionaryEntry>,
        total_freq: f64,
        min_log_prob: f64,
    ) -> Self {
        Self {
            trie,
            entries,
            total_freq,
            min_log_prob,
        }
    }

    /// Gets the number of words.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the dictionary has no words.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the sum of frequencies over all merged sources.
    #[inline(always)]
    pub const fn total_freq(&self) -> f64 {
        self.total_freq
    }

    /// Gets the smallest log-probability of the dictionary, which is also the
    /// value given to unknown words.
    #[inline(always)]
    pub const fn min_log_prob(&self) -> f64 {
        self.min_log_prob
    }

    /// Gets the entry of `word`.
    pub fn entry(&self, word: &str) -> Option<&DictionaryEntry> {
        self.trie
            .exact_match(word.chars())
            .map(|id| &self.entries[id as usize])
    }

    /// Checks if `word` is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.trie.exact_match(word.chars()).is_some()
    }

    /// Gets the log-probability of `word`.
    ///
    /// Unknown words get [`Self::min_log_prob()`] rather than negative
    /// infinity, so that spans of them remain comparable.
    pub fn probability(&self, word: &str) -> f64 {
        self.entry(word)
            .map_or(self.min_log_prob, DictionaryEntry::log_prob)
    }

    /// Gets the POS tag of `word`, or `"UNK"` if it is unknown.
    pub fn pos(&self, word: &str) -> &str {
        self.entry(word).map_or(UNKNOWN_POS, DictionaryEntry::pos)
    }

    /// Iterates over entries in the lexicographic order of words.
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    #[inline(always)]
    pub(crate) fn edge_log_prob(&self, edge: DagEdge) -> f64 {
        edge.word_id
            .map_or(self.min_log_prob, |id| self.entries[id as usize].log_prob())
    }

    /// Builds the word graph of `chars`.
    ///
    /// Every start offset gets the single-character span and all dictionary
    /// words starting there with at most `max_word_len` characters.
    pub fn build_dag(&self, chars: &[char], max_word_len: usize) -> Dag {
        let mut dag = Dag::new();
        self.fill_dag(chars, max_word_len, &mut dag);
        dag
    }

    pub(crate) fn fill_dag(&self, chars: &[char], max_word_len: usize, dag: &mut Dag) {
        dag.reset(chars.len());
        let max_word_len = max_word_len.max(1);

        for start in 0..chars.len() {
            let end = chars.len().min(start + max_word_len);
            let mut matches = self
                .trie
                .common_prefix_iterator(&chars[start..end])
                .peekable();

            // Matches come in ascending length, so a one-character word is first.
            if matches.peek().map_or(true, |m| m.end_char != 1) {
                dag.push(
                    start,
                    DagEdge {
                        end: start,
                        word_id: None,
                    },
                );
            }
            for m in matches {
                debug_assert!(start + m.end_char <= chars.len());
                dag.push(
                    start,
                    DagEdge {
                        end: start + m.end_char - 1,
                        word_id: Some(m.value),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::MAX_WORD_LENGTH;

    fn shanghai() -> Dictionary {
        DictionaryBuilder::new()
            .base_from_reader("上海\t10\tns\n海\t5\tn".as_bytes())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_probability() {
        let dict = shanghai();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.total_freq(), 15.0);
        assert!((dict.probability("上海") - (10f64 / 15.0).ln()).abs() < 1e-12);
        assert!((dict.probability("海") - (5f64 / 15.0).ln()).abs() < 1e-12);
        assert_eq!(dict.min_log_prob(), (5f64 / 15.0).ln());
        assert_eq!(dict.probability("上"), dict.min_log_prob());
        assert_eq!(dict.probability("上海市"), dict.min_log_prob());
    }

    #[test]
    fn test_pos() {
        let dict = shanghai();
        assert_eq!(dict.pos("上海"), "ns");
        assert_eq!(dict.pos("海"), "n");
        assert_eq!(dict.pos("上"), "UNK");
        assert!(dict.contains("上海"));
        assert!(!dict.contains("上"));
    }

    #[test]
    fn test_dag_shanghai() {
        let dict = shanghai();
        let chars: Vec<_> = "上海".chars().collect();
        let dag = dict.build_dag(&chars, MAX_WORD_LENGTH);
        assert_eq!(dag.len(), 2);
        assert_eq!(dag.ends(0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(dag.ends(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_dag_single_word_not_duplicated() {
        let dict = DictionaryBuilder::new()
            .base_from_reader("上\t3\tf\n上海\t10\tns\n上海市\t2\tns".as_bytes())
            .unwrap()
            .build()
            .unwrap();
        let chars: Vec<_> = "上海市".chars().collect();
        let dag = dict.build_dag(&chars, MAX_WORD_LENGTH);
        assert_eq!(dag.ends(0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(dag.edges(0)[0].word_id, dict.trie.exact_match("上".chars()));
        assert_eq!(dag.ends(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(dag.edges(1)[0].word_id, None);
        assert_eq!(dag.ends(2).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_dag_max_word_len() {
        let dict = DictionaryBuilder::new()
            .base_from_reader("中华人民共和国\t3\tns\n中华\t5\tnz".as_bytes())
            .unwrap()
            .build()
            .unwrap();
        let chars: Vec<_> = "中华人民共和国".chars().collect();
        let dag = dict.build_dag(&chars, 6);
        assert_eq!(dag.ends(0).collect::<Vec<_>>(), vec![0, 1]);
        let dag = dict.build_dag(&chars, 7);
        assert_eq!(dag.ends(0).collect::<Vec<_>>(), vec![0, 1, 6]);
    }

    #[test]
    fn test_dag_empty() {
        let dict = shanghai();
        let dag = dict.build_dag(&[], MAX_WORD_LENGTH);
        assert!(dag.is_empty());
    }
}
