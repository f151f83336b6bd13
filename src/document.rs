//! Re-assigning every word of one document.

use rand::Rng;

use crate::error::{Result, SamplerError, one_based};
use crate::sampler::UniformSampler;
use crate::topic::{TopicSampler, TopicStats};

/// New topics for a document together with their histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// 1-based topic of each word, in document order.
    pub topics: Vec<u32>,
    /// Number of words assigned to each topic.
    pub histogram: Vec<u32>,
}

impl Reassignment {
    fn with_capacity(len: usize, num_topics: usize) -> Self {
        Reassignment {
            topics: Vec::with_capacity(len),
            histogram: vec![0; num_topics],
        }
    }

    fn push(&mut self, topic: u32) {
        self.topics.push(topic);
        self.histogram[topic as usize - 1] += 1;
    }

    /// The packed layout: the topics followed by the histogram.
    pub fn into_packed(self) -> Vec<u32> {
        let mut packed = self.topics;
        packed.extend(self.histogram);
        packed
    }
}

/// Draw one topic per word uniformly at random, the usual starting point
/// of a chain.
pub fn random_topics<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    num_topics: usize,
) -> Result<Reassignment> {
    let uniform = UniformSampler::new(num_topics)?;
    let mut out = Reassignment::with_capacity(len, num_topics);
    for _ in 0..len {
        out.push(uniform.sample_label(rng));
    }
    Ok(out)
}

/// Resample the topic of every word in `document`.
///
/// `document` holds 1-based word indices and `topics` their current
/// 1-based topics. Each word is drawn against `stats` with its own
/// current topic excluded. Nothing passed in is mutated: the new topics
/// and histogram are returned. All indices are validated before the
/// first draw.
pub fn reassign<R: Rng + ?Sized>(
    sampler: &mut TopicSampler,
    rng: &mut R,
    document: &[u32],
    topics: &[u32],
    stats: &TopicStats<'_>,
) -> Result<Reassignment> {
    if document.len() != topics.len() {
        return Err(SamplerError::config(format!(
            "document has {} words but {} topic assignments",
            document.len(),
            topics.len()
        )));
    }
    let config = *sampler.config();
    stats.validate(&config)?;
    for (&w, &t) in document.iter().zip(topics) {
        one_based("word", w, config.vocab_size)?;
        one_based("topic", t, config.num_topics)?;
    }

    let mut out = Reassignment::with_capacity(document.len(), config.num_topics);
    for (&w, &t) in document.iter().zip(topics) {
        let topic = sampler.sample_unchecked(rng, w, t, stats)?;
        out.push(topic);
    }
    Ok(out)
}
