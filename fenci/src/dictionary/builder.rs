use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tracing::{info, warn};

use super::{Dictionary, DictionaryEntry, RawWordEntry, TrieBuilder};
use crate::errors::{FenciError, Result};
use crate::utils;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Merge {
    /// Keeps the first occurrence of a word.
    KeepFirst,
    /// Replaces an existing word.
    Overwrite,
}

/// Builder of [`Dictionary`] from a base source and custom sources.
///
/// Log-probabilities depend on the total frequency of every merged source,
/// so they are computed only in [`DictionaryBuilder::build()`].
#[derive(Default)]
pub struct DictionaryBuilder {
    words: HashMap<String, (f64, String)>,
    trie: TrieBuilder,
    total_freq: f64,
}

impl DictionaryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the base dictionary from a reader.
    ///
    /// Each line is `word<TAB>frequency<TAB>pos`. Malformed lines and words
    /// that already exist are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the reader fails.
    pub fn base_from_reader<R>(mut self, rdr: R) -> Result<Self>
    where
        R: Read,
    {
        self.load(rdr, "vocabulary", Merge::KeepFirst)?;
        Ok(self)
    }

    /// Merges a custom dictionary from a reader.
    ///
    /// The format is the same as the base one, but a word already present is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the reader fails.
    pub fn custom_from_reader<R>(mut self, rdr: R) -> Result<Self>
    where
        R: Read,
    {
        self.load(rdr, "custom_words", Merge::Overwrite)?;
        Ok(self)
    }

    /// Merges every file under `dir`, recursively, in the lexicographic order
    /// of their paths.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the directory or a file cannot be read.
    pub fn custom_from_dir<P>(mut self, dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut files = vec![];
        collect_files(dir.as_ref(), &mut files)?;
        files.sort();
        for path in files {
            let source = path.display().to_string();
            self.load(File::open(&path)?, &source, Merge::Overwrite)?;
        }
        Ok(self)
    }

    /// Inserts a word, overwriting an existing one.
    ///
    /// The frequency is added to the total even if the word existed.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the word is empty or the frequency is
    /// not a finite positive number.
    pub fn insert(&mut self, word: &str, freq: f64, pos: &str) -> Result<()> {
        let entry = RawWordEntry {
            word: word.to_string(),
            freq,
            pos: pos.to_string(),
        };
        validate(&entry)?;
        self.merge(entry, Merge::Overwrite);
        Ok(())
    }

    /// Gets the number of distinct words merged so far.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Checks if no word has been merged.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Builds the dictionary, fixing every log-probability against the final
    /// total frequency.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when no valid word was loaded.
    pub fn build(self) -> Result<Dictionary> {
        if self.words.is_empty() {
            return Err(FenciError::invalid_argument(
                "dictionary",
                "no valid word was loaded.",
            ));
        }

        let Self {
            mut words,
            trie,
            total_freq,
        } = self;
        let (trie, sorted) = trie.build()?;

        let mut min_log_prob = 0f64;
        let mut entries = Vec::with_capacity(sorted.len());
        for word in sorted {
            let (freq, pos) = words.remove(&word).ok_or_else(|| {
                FenciError::invalid_argument("dictionary", "inconsistent word set.")
            })?;
            let log_prob = (freq / total_freq).ln();
            min_log_prob = min_log_prob.min(log_prob);
            entries.push(DictionaryEntry::new(word, freq, log_prob, pos));
        }

        info!(
            words = entries.len(),
            total_freq, min_log_prob, "built the dictionary"
        );
        Ok(Dictionary::new(trie, entries, total_freq, min_log_prob))
    }

    fn load<R>(&mut self, rdr: R, source: &str, merge: Merge) -> Result<()>
    where
        R: Read,
    {
        let mut num_loaded = 0;
        for line in utils::read_lines(rdr) {
            let (lineno, line) = line?;
            let entry = match parse_row(&line) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(source, line = lineno, "skipped a malformed line: {e}");
                    continue;
                }
            };
            if merge == Merge::KeepFirst && self.words.contains_key(&entry.word) {
                warn!(source, line = lineno, word = %entry.word, "skipped a duplicate word");
                continue;
            }
            self.merge(entry, merge);
            num_loaded += 1;
        }
        info!(source, words = num_loaded, "loaded dictionary words");
        Ok(())
    }

    fn merge(&mut self, entry: RawWordEntry, merge: Merge) {
        self.total_freq += entry.freq;
        self.trie.insert(&entry.word);
        match merge {
            Merge::KeepFirst => {
                self.words
                    .entry(entry.word)
                    .or_insert((entry.freq, entry.pos));
            }
            Merge::Overwrite => {
                self.words.insert(entry.word, (entry.freq, entry.pos));
            }
        }
    }
}

fn parse_row(line: &str) -> Result<RawWordEntry> {
    let cols = utils::parse_tsv_row(line);
    if cols.len() < 3 {
        let msg = format!("A row must have three tab-separated fields at least, {line}");
        return Err(FenciError::invalid_format("dictionary", msg));
    }
    let mut cols = cols.into_iter();
    let word = cols.next().unwrap_or_default();
    let freq: f64 = cols.next().unwrap_or_default().trim().parse()?;
    let pos = cols.next().unwrap_or_default().trim().to_string();
    let entry = RawWordEntry { word, freq, pos };
    validate(&entry)?;
    Ok(entry)
}

fn validate(entry: &RawWordEntry) -> Result<()> {
    if entry.word.is_empty() {
        return Err(FenciError::invalid_format("dictionary", "empty word"));
    }
    if !entry.freq.is_finite() || entry.freq <= 0.0 {
        let msg = format!("frequency must be positive, {}", entry.freq);
        return Err(FenciError::invalid_format("dictionary", msg));
    }
    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
