//! Bundle of the resources used for segmentation and tagging.
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bincode::{Decode, Encode};
use tracing::info;

use crate::common::{self, MODEL_MAGIC};
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::errors::{FenciError, Result};
use crate::hmm::Hmm;
use crate::segmenter::{BmesIds, HmmSegmenter};
use crate::tagger::PosTagger;

/// File name of the base dictionary in a data directory.
pub const VOCABULARY_FILENAME: &str = "vocabulary.dat";
/// Name of the optional directory of custom dictionaries in a data directory.
pub const CUSTOM_WORDS_DIRNAME: &str = "custom_words";
/// Name of the character-tagging model directory in a data directory.
pub const HMM_SEGMENT_MODEL_DIRNAME: &str = "hmm_segment_model";
/// Name of the POS-tagging model directory in a data directory.
pub const HMM_POS_MODEL_DIRNAME: &str = "hmm_pos_model";

#[derive(Decode, Encode)]
struct ModelInner {
    dict: Dictionary,
    segment_hmm: Hmm,
    pos_hmm: Hmm,
}

/// Dictionary, character-tagging model, and POS-tagging model.
///
/// A model is immutable and can be shared by any number of tokenizers.
pub struct Model {
    inner: ModelInner,
    bmes: BmesIds,
}

impl Model {
    /// Creates a new instance.
    ///
    /// # Arguments
    ///
    ///  - `dict`: Dictionary for the maximum-probability segmentation.
    ///  - `segment_hmm`: Character-tagging model with the states `B`, `M`,
    ///    `E`, and `S`.
    ///  - `pos_hmm`: POS-tagging model whose states are tags.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when `segment_hmm` lacks any of the B/M/E/S
    /// states.
    pub fn new(dict: Dictionary, segment_hmm: Hmm, pos_hmm: Hmm) -> Result<Self> {
        let bmes = BmesIds::from_hmm(&segment_hmm)?;
        Ok(Self {
            inner: ModelInner {
                dict,
                segment_hmm,
                pos_hmm,
            },
            bmes,
        })
    }

    /// Loads a model from a data directory laid out as follows.
    ///
    /// ```text
    /// data_dir/
    /// ├── vocabulary.dat
    /// ├── custom_words/        (optional, read recursively)
    /// ├── hmm_segment_model/
    /// └── hmm_pos_model/
    /// ```
    ///
    /// Each model directory holds the four tables read by [`Hmm::from_dir()`].
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when a file cannot be read or a resource is
    /// unusable.
    pub fn from_dir<P>(data_dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref();
        info!(dir = %data_dir.display(), "loading a model");

        let vocabulary = File::open(data_dir.join(VOCABULARY_FILENAME))?;
        let mut builder = DictionaryBuilder::new().base_from_reader(vocabulary)?;
        let custom_dir = data_dir.join(CUSTOM_WORDS_DIRNAME);
        if custom_dir.is_dir() {
            builder = builder.custom_from_dir(custom_dir)?;
        }
        let dict = builder.build()?;

        let segment_hmm = Hmm::from_dir(data_dir.join(HMM_SEGMENT_MODEL_DIRNAME))?;
        let pos_hmm = Hmm::from_dir(data_dir.join(HMM_POS_MODEL_DIRNAME))?;
        Self::new(dict, segment_hmm, pos_hmm)
    }

    /// Gets the dictionary.
    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.inner.dict
    }

    /// Gets the character-tagging model.
    #[inline(always)]
    pub fn segment_hmm(&self) -> &Hmm {
        &self.inner.segment_hmm
    }

    /// Gets the POS-tagging model.
    #[inline(always)]
    pub fn pos_hmm(&self) -> &Hmm {
        &self.inner.pos_hmm
    }

    /// Creates the unknown-word segmenter on the character-tagging model.
    pub fn hmm_segmenter(&self) -> HmmSegmenter<'_> {
        HmmSegmenter::from_parts(&self.inner.segment_hmm, self.bmes)
    }

    /// Creates the tagger on the POS-tagging model.
    pub fn pos_tagger(&self) -> PosTagger<'_> {
        PosTagger::new(&self.inner.pos_hmm)
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    ///  - `wtr`: Data sink.
    ///
    /// # Returns
    ///
    /// Number of bytes written.
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when serialization fails.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;
        let num_bytes =
            bincode::encode_into_std_write(&self.inner, &mut wtr, common::bincode_config())?;
        Ok(MODEL_MAGIC.len() + num_bytes)
    }

    /// Creates a model from a reader of data exported by [`Model::write()`].
    ///
    /// # Errors
    ///
    /// [`FenciError`] is returned when the magic header mismatches or
    /// deserialization fails.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; MODEL_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if !magic.starts_with(MODEL_MAGIC) {
            return Err(FenciError::invalid_argument(
                "rdr",
                "The magic number of the input model mismatches.",
            ));
        }
        let inner: ModelInner = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        Self::new(inner.dict, inner.segment_hmm, inner.pos_hmm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    const BMES_STATES: &str = "B M E S";
    const BMES_START: &str = "B\t-0.26\nS\t-1.46";
    const BMES_TRANS: &str = "B\tE\t-0.51\nB\tM\t-0.91\nE\tB\t-0.59\nE\tS\t-0.80\n\
                              M\tE\t-0.33\nM\tM\t-1.26\nS\tB\t-0.72\nS\tS\t-0.66";
    const BMES_EMIT: &str = "B\t上\t-5.0\nE\t海\t-4.0\nS\t的\t-3.0";

    fn write_hmm(dir: &Path, states: &str, start: &str, trans: &str, emit: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("states.dat"), states).unwrap();
        fs::write(dir.join("start_log_prob.dat"), start).unwrap();
        fs::write(dir.join("trans_log_prob.dat"), trans).unwrap();
        fs::write(dir.join("emit_log_prob.dat"), emit).unwrap();
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(VOCABULARY_FILENAME), "上海\t10\tns\n海\t5\tn\n").unwrap();
        fs::create_dir(root.join(CUSTOM_WORDS_DIRNAME)).unwrap();
        fs::write(
            root.join(CUSTOM_WORDS_DIRNAME).join("names.txt"),
            "魔鬼代言人\t3\tnr\n",
        )
        .unwrap();
        write_hmm(
            &root.join(HMM_SEGMENT_MODEL_DIRNAME),
            BMES_STATES,
            BMES_START,
            BMES_TRANS,
            BMES_EMIT,
        );
        write_hmm(
            &root.join(HMM_POS_MODEL_DIRNAME),
            "n ns",
            "n\t-0.7\nns\t-0.7",
            "n\tns\t-0.7\nns\tn\t-0.7",
            "ns\t上海\t-1.0",
        );
        dir
    }

    #[test]
    fn test_from_dir() {
        let dir = data_dir();
        let model = Model::from_dir(dir.path()).unwrap();
        assert_eq!(model.dictionary().len(), 3);
        assert_eq!(model.dictionary().pos("魔鬼代言人"), "nr");
        assert_eq!(model.segment_hmm().num_states(), 4);
        assert_eq!(model.pos_hmm().states(), &["n", "ns"]);
    }

    #[test]
    fn test_from_dir_without_custom_words() {
        let dir = data_dir();
        fs::remove_dir_all(dir.path().join(CUSTOM_WORDS_DIRNAME)).unwrap();
        let model = Model::from_dir(dir.path()).unwrap();
        assert_eq!(model.dictionary().len(), 2);
    }

    #[test]
    fn test_missing_bmes_state() {
        let dict = DictionaryBuilder::new()
            .base_from_reader("上海\t10\tns".as_bytes())
            .unwrap()
            .build()
            .unwrap();
        let seg = Hmm::from_readers(
            "B E S".as_bytes(),
            BMES_START.as_bytes(),
            "B\tE\t-0.5".as_bytes(),
            BMES_EMIT.as_bytes(),
        )
        .unwrap();
        let pos = Hmm::from_readers(
            "n".as_bytes(),
            "n\t-0.1".as_bytes(),
            "n\tn\t-0.1".as_bytes(),
            "n\t上海\t-0.1".as_bytes(),
        )
        .unwrap();
        assert!(Model::new(dict, seg, pos).is_err());
    }

    #[test]
    fn test_write_read() {
        let dir = data_dir();
        let model = Model::from_dir(dir.path()).unwrap();

        let mut data = vec![];
        let num_bytes = model.write(&mut data).unwrap();
        assert_eq!(num_bytes, data.len());
        assert!(data.starts_with(MODEL_MAGIC));

        let other = Model::read(data.as_slice()).unwrap();
        assert_eq!(other.dictionary().len(), 3);
        assert_eq!(
            other.dictionary().probability("上海"),
            model.dictionary().probability("上海")
        );
        assert_eq!(other.dictionary().pos("海"), "n");
        assert_eq!(other.segment_hmm().emit_log_prob(2, "海"), -4.0);
        assert_eq!(other.pos_hmm().emit_log_prob(1, "上海"), -1.0);
    }

    #[test]
    fn test_read_truncated() {
        let mut data = MODEL_MAGIC.to_vec();
        data.extend_from_slice(&0u64.to_le_bytes());
        assert!(Model::read(data.as_slice()).is_err());

        let model = Model::from_dir(data_dir().path()).unwrap();
        let mut data = vec![];
        model.write(&mut data).unwrap();
        data.truncate(data.len() / 2);
        assert!(Model::read(data.as_slice()).is_err());
    }

    #[test]
    fn test_read_bad_magic() {
        let data = b"NotAFenciModel\n and then some bytes";
        assert!(Model::read(&data[..]).is_err());
    }
}
