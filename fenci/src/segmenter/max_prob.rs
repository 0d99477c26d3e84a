use std::ops::Range;

use tracing::debug;

use crate::common::MAX_WORD_LENGTH;
use crate::dictionary::{Dag, Dictionary};
use crate::segmenter::HmmSegmenter;

/// Best continuation from an offset: the cumulative log-probability to the
/// end of the run and the inclusive end of the first word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Route {
    pub score: f64,
    pub end: usize,
}

/// Segmenter choosing the most probable word sequence under the unigram
/// model, with runs of unresolved single characters handed to an
/// [`HmmSegmenter`].
///
/// The DAG and the route table are scratch buffers reused across calls.
pub struct MaxProbSegmenter<'a> {
    dict: &'a Dictionary,
    unknown: HmmSegmenter<'a>,
    max_word_len: usize,
    dag: Dag,
    routes: Vec<Route>,
}

impl<'a> MaxProbSegmenter<'a> {
    /// Creates a new segmenter.
    pub fn new(dict: &'a Dictionary, unknown: HmmSegmenter<'a>) -> Self {
        Self {
            dict,
            unknown,
            max_word_len: MAX_WORD_LENGTH,
            dag: Dag::new(),
            routes: vec![],
        }
    }

    /// Sets the maximum number of characters in a dictionary word.
    /// `0` restores the default [`MAX_WORD_LENGTH`].
    pub fn max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = if max_word_len == 0 {
            MAX_WORD_LENGTH
        } else {
            max_word_len
        };
        self
    }

    /// Segments `chars`, calling `f` with the character range of each word
    /// in order.
    pub fn cut<F>(&mut self, chars: &[char], mut f: F)
    where
        F: FnMut(Range<usize>),
    {
        self.compute_routes(chars);

        let mut buffered: Option<usize> = None;
        let mut i = 0;
        while i < chars.len() {
            let j = self.routes[i].end;
            if i == j {
                buffered.get_or_insert(i);
            } else {
                if let Some(start) = buffered.take() {
                    self.flush(chars, start..i, &mut f);
                }
                f(i..j + 1);
            }
            i = j + 1;
        }
        if let Some(start) = buffered {
            self.flush(chars, start..chars.len(), &mut f);
        }
    }

    /// Segments `chars` into character ranges.
    pub fn segment(&mut self, chars: &[char]) -> Vec<Range<usize>> {
        let mut words = vec![];
        self.cut(chars, |r| words.push(r));
        words
    }

    fn flush<F>(&self, chars: &[char], run: Range<usize>, f: &mut F)
    where
        F: FnMut(Range<usize>),
    {
        if run.len() == 1 {
            f(run);
            return;
        }
        debug!(len = run.len(), "handing a run of single characters to the hmm");
        let offset = run.start;
        self.unknown
            .cut(&chars[run], |r| f(r.start + offset..r.end + offset));
    }

    /// Fills the route table right to left. `routes[chars.len()]` is the
    /// sentinel with score zero.
    ///
    /// On equal scores, the longer word wins.
    pub(crate) fn compute_routes(&mut self, chars: &[char]) -> &[Route] {
        let len = chars.len();
        self.dict.fill_dag(chars, self.max_word_len, &mut self.dag);

        self.routes.clear();
        self.routes.resize(
            len + 1,
            Route {
                score: 0.0,
                end: len,
            },
        );
        for i in (0..len).rev() {
            let mut best: Option<Route> = None;
            for &edge in self.dag.edges(i) {
                let score = self.dict.edge_log_prob(edge) + self.routes[edge.end + 1].score;
                if best.map_or(true, |b| score >= b.score) {
                    best = Some(Route {
                        score,
                        end: edge.end,
                    });
                }
            }
            // Every start has at least the single-character edge.
            if let Some(best) = best {
                self.routes[i] = best;
            }
        }
        &self.routes
    }

    #[cfg(test)]
    pub(crate) fn dag(&self) -> &Dag {
        &self.dag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::DictionaryBuilder;
    use crate::hmm::Hmm;

    fn bmes() -> Hmm {
        Hmm::from_readers(
            "B M E S".as_bytes(),
            "B\t-0.26\nS\t-1.46".as_bytes(),
            "B\tE\t-0.51\nB\tM\t-0.91\nE\tB\t-0.59\nE\tS\t-0.80\n\
             M\tE\t-0.33\nM\tM\t-1.26\nS\tB\t-0.72\nS\tS\t-0.66"
                .as_bytes(),
            "B\t魔\t-2.0\nM\t鬼\t-2.0\nM\t代\t-2.0\nE\t言\t-2.0\nS\t的\t-1.0".as_bytes(),
        )
        .unwrap()
    }

    fn dict(data: &str) -> Dictionary {
        DictionaryBuilder::new()
            .base_from_reader(data.as_bytes())
            .unwrap()
            .build()
            .unwrap()
    }

    fn words(text: &str, ranges: &[Range<usize>]) -> Vec<String> {
        let chars: Vec<_> = text.chars().collect();
        ranges
            .iter()
            .map(|r| chars[r.clone()].iter().collect())
            .collect()
    }

    #[test]
    fn test_shanghai_prefers_word() {
        let dict = dict("上海\t10\tns\n海\t5\tn");
        let hmm = bmes();
        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        let chars: Vec<_> = "上海".chars().collect();
        let routes = seg.compute_routes(&chars).to_vec();
        assert_eq!(routes[0].end, 1);
        assert_eq!(routes[2].score, 0.0);
        assert!((routes[0].score - dict.probability("上海")).abs() < 1e-12);
        assert_eq!(seg.segment(&chars), vec![0..2]);
    }

    #[test]
    fn test_tie_prefers_longer_word() {
        // The only word has probability one, so the floor is zero as well and
        // "上海" ties with "上"+"海".
        let dict = dict("上海\t1\tns");
        assert_eq!(dict.min_log_prob(), 0.0);
        let hmm = bmes();
        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        let chars: Vec<_> = "上海".chars().collect();
        let routes = seg.compute_routes(&chars).to_vec();
        assert_eq!(routes[0].score, 0.0);
        assert_eq!(routes[0].end, 1);
    }

    #[test]
    fn test_unknown_run_goes_to_hmm() {
        let dict = dict("上海\t10\tns\n的\t50\tuj");
        let hmm = bmes();
        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        let text = "魔鬼代言上海";
        let chars: Vec<_> = text.chars().collect();
        let got = seg.segment(&chars);
        assert_eq!(words(text, &got), vec!["魔鬼代言", "上海"]);
    }

    #[test]
    fn test_single_buffered_char_is_kept() {
        let dict = dict("上海\t10\tns\n的\t50\tuj");
        let hmm = bmes();
        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        let text = "的上海的";
        let chars: Vec<_> = text.chars().collect();
        assert_eq!(words(text, &seg.segment(&chars)), vec!["的", "上海", "的"]);
    }

    #[test]
    fn test_max_word_len() {
        let dict = dict("中华人民共和国\t100\tns\n中华\t1\tnz");
        let hmm = bmes();
        let chars: Vec<_> = "中华人民共和国".chars().collect();

        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        assert_eq!(seg.segment(&chars), vec![0..7]);

        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap())
            .max_word_len(6);
        let got = seg.segment(&chars);
        assert_eq!(got.first(), Some(&(0..2)));
        assert!(got.iter().all(|r| r.len() <= 6));
        assert_eq!(got.last().map(|r| r.end), Some(7));
        assert!(seg.dag().ends(0).all(|j| j < 6));
    }

    #[test]
    fn test_empty() {
        let dict = dict("上海\t10\tns");
        let hmm = bmes();
        let mut seg = MaxProbSegmenter::new(&dict, HmmSegmenter::new(&hmm).unwrap());
        assert!(seg.segment(&[]).is_empty());
        assert_eq!(seg.compute_routes(&[]).len(), 1);
    }
}
