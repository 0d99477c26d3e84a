//! # Fenci
//!
//! Fenci is a Chinese word segmenter and part-of-speech tagger.
//!
//! Chinese runs of the input are segmented by the most probable path through
//! a word graph built from a unigram dictionary. Runs of characters that the
//! dictionary cannot resolve are re-segmented by a hidden Markov model over
//! B/M/E/S character positions, and words can be tagged by a second hidden
//! Markov model over POS tags.
//!
//! ## Examples
//!
//! ```no_run
//! use fenci::{Model, Tokenizer};
//!
//! let model = Model::from_dir("data").unwrap();
//! let tokenizer = Tokenizer::new(model);
//!
//! let words: Vec<_> = tokenizer.segment("我来到北京清华大学").collect();
//! println!("{}", words.join(" / "));
//!
//! for (word, tag) in tokenizer.segment_and_tag("我爱北京天安门") {
//!     println!("{word}\t{tag}");
//! }
//! ```
#![deny(missing_docs)]

pub mod common;
pub mod dictionary;
pub mod errors;
pub mod hmm;
pub mod model;
pub mod segmenter;
pub mod sentence;
pub mod tagger;
pub mod tokenizer;
mod utils;

#[cfg(test)]
mod tests;

pub use dictionary::{Dictionary, DictionaryBuilder};
pub use hmm::Hmm;
pub use model::Model;
pub use tokenizer::Tokenizer;
