
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::hmm::Hmm;
use crate::model::Model;

const VOCABULARY: &str = include_str!("./tests/resources/vocabulary.dat");

const SEG_STATES: &str = include_str!("./tests/resources/hmm_segment_model/states.dat");
const SEG_START: &str = include_str!("./tests/resources/hmm_segment_model/start_log_prob.dat");
const SEG_TRANS: &str = include_str!("./tests/resources/hmm_segment_model/trans_log_prob.dat");
const SEG_EMIT: &str = include_str!("./tests/resources/hmm_segment_model/emit_log_prob.dat");

const POS_STATES: &str = include_str!("./tests/resources/hmm_pos_model/states.dat");
const POS_START: &str = include_str!("./tests/resources/hmm_pos_model/start_log_prob.dat");
const POS_TRANS: &str = include_str!("./tests/resources/hmm_pos_model/trans_log_prob.dat");
const POS_EMIT: &str = include_str!("./tests/resources/hmm_pos_model/emit_log_prob.dat");

fn dictionary() -> Dictionary {
    DictionaryBuilder::new()
        .base_from_reader(VOCABULARY.as_bytes())
        .unwrap()
        .build()
        .unwrap()
}

fn segment_hmm() -> Hmm {
    Hmm::from_readers(
        SEG_STATES.as_bytes(),
        SEG_START.as_bytes(),
        SEG_TRANS.as_bytes(),
        SEG_EMIT.as_bytes(),
    )
    .unwrap()
}

fn pos_hmm() -> Hmm {
    Hmm::from_readers(
        POS_STATES.as_bytes(),
        POS_START.as_bytes(),
        POS_TRANS.as_bytes(),
        POS_EMIT.as_bytes(),
    )
    .unwrap()
}

fn model() -> Model {
    Model::new(dictionary(), segment_hmm(), pos_hmm()).unwrap()
}
