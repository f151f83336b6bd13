//! Multi-pass LDA over an in-memory corpus.
//!
//! Each sweep resamples every document against the previous sweep's
//! statistics, then replaces the word-topic matrix and topic totals with
//! counts rebuilt from the new assignments. Documents within a sweep are
//! independent of each other, which is what lets a driver split them into
//! batches and [`merge`](CountMatrix::merge) the per-batch counts.

use rand::Rng;
use tracing::{debug, info};

use crate::config::LdaConfig;
use crate::counts::CountMatrix;
use crate::document::{random_topics, reassign};
use crate::error::{Result, SamplerError, one_based};
use crate::topic::{TopicSampler, TopicStats};

/// One document and its current topic assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub words: Vec<u32>,
    pub topics: Vec<u32>,
    pub histogram: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct LdaTrainer {
    sampler: TopicSampler,
    documents: Vec<Document>,
    counts: CountMatrix,
    totals: Vec<u32>,
    iteration: usize,
}

impl LdaTrainer {
    /// Assign random topics to every word of `corpus` and build the
    /// initial statistics.
    pub fn new<R: Rng + ?Sized>(
        config: LdaConfig,
        corpus: Vec<Vec<u32>>,
        rng: &mut R,
    ) -> Result<Self> {
        let sampler = TopicSampler::new(config)?;
        let mut counts = CountMatrix::zero(config.vocab_size, config.num_topics)?;
        let mut documents = Vec::with_capacity(corpus.len());
        for words in corpus {
            let init = random_topics(rng, words.len(), config.num_topics)?;
            counts.batch_increment(&words, &init.topics)?;
            documents.push(Document {
                words,
                topics: init.topics,
                histogram: init.histogram,
            });
        }
        let totals = counts.column_totals();
        debug!(
            documents = documents.len(),
            tokens = counts.total(),
            "initialized topic assignments"
        );
        Ok(LdaTrainer {
            sampler,
            documents,
            counts,
            totals,
            iteration: 0,
        })
    }

    /// Run one Gibbs sweep over every document.
    ///
    /// Returns the number of words whose topic changed. If any document
    /// fails, the trainer keeps the statistics of the previous sweep.
    pub fn sweep<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        let config = *self.sampler.config();
        let mut next_counts = CountMatrix::zero(config.vocab_size, config.num_topics)?;
        let mut next_docs = Vec::with_capacity(self.documents.len());
        let mut changed = 0;

        for doc in &self.documents {
            let stats = TopicStats {
                words: &self.counts,
                document: &doc.histogram,
                totals: &self.totals,
            };
            let r = reassign(&mut self.sampler, rng, &doc.words, &doc.topics, &stats)?;
            changed += doc.topics.iter().zip(&r.topics).filter(|(a, b)| a != b).count();
            next_counts.batch_increment(&doc.words, &r.topics)?;
            next_docs.push(Document {
                words: doc.words.clone(),
                topics: r.topics,
                histogram: r.histogram,
            });
        }

        self.totals = next_counts.column_totals();
        self.counts = next_counts;
        self.documents = next_docs;
        self.iteration += 1;
        info!(iteration = self.iteration, changed, "finished sweep");
        Ok(changed)
    }

    /// Run `iterations` sweeps.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R, iterations: usize) -> Result<()> {
        for _ in 0..iterations {
            self.sweep(rng)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &LdaConfig {
        self.sampler.config()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn word_topic_counts(&self) -> &CountMatrix {
        &self.counts
    }

    pub fn topic_totals(&self) -> &[u32] {
        &self.totals
    }

    /// Number of completed sweeps.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Smoothed estimate of `p(word | topic)`, both 1-based:
    /// `(n_wt + eta) / (n_t + V * eta)`.
    pub fn topic_word_probability(&self, word: u32, topic: u32) -> Result<f64> {
        let LdaConfig {
            num_topics,
            vocab_size,
            eta,
            ..
        } = *self.config();
        let w = one_based("word", word, vocab_size)?;
        let t = one_based("topic", topic, num_topics)?;
        let denom = self.totals[t] as f64 + vocab_size as f64 * eta;
        if denom <= 0.0 {
            return Err(SamplerError::NumericInvariant(format!(
                "topic {topic} has no words and eta is zero"
            )));
        }
        Ok((self.counts.get(w, t)? as f64 + eta) / denom)
    }

    /// The `k` most probable words of a topic as `(word, probability)`,
    /// most probable first. Ties keep the lower word index first.
    pub fn top_words(&self, topic: u32, k: usize) -> Result<Vec<(u32, f64)>> {
        let vocab_size = self.config().vocab_size as u32;
        let mut ranked = (1..=vocab_size)
            .map(|w| self.topic_word_probability(w, topic).map(|p| (w, p)))
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        Ok(ranked)
    }
}
