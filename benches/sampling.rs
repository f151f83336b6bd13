use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gibbstables::{
    CountMatrix, FactorTable, GibbsLabelSampler, LabelChain, LdaConfig, MetropolisHastings,
    SamplerState, TopicSampler, TopicStats, random_topics, reassign,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const VOCAB: usize = 2_000;
const DOC_LEN: usize = 256;

fn gen_document(rng: &mut Pcg32) -> Vec<u32> {
    (0..DOC_LEN).map(|_| rng.random_range(1..=VOCAB as u32)).collect()
}

fn bench_reassign(c: &mut Criterion) {
    let mut group = c.benchmark_group("lda_reassign");
    group.throughput(Throughput::Elements(DOC_LEN as u64));

    for &k in &[8usize, 64, 256] {
        let mut rng = Pcg32::seed_from_u64(777);
        let config = LdaConfig {
            num_topics: k,
            vocab_size: VOCAB,
            alpha: 0.1,
            eta: 0.01,
        };
        let doc = gen_document(&mut rng);
        let init = random_topics(&mut rng, doc.len(), k).unwrap();
        let mut words = CountMatrix::zero(VOCAB, k).unwrap();
        words.batch_increment(&doc, &init.topics).unwrap();
        let totals = words.column_totals();
        let mut sampler = TopicSampler::new(config).unwrap();

        group.bench_function(format!("topics_k={k}"), |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(999),
                |rng| {
                    let stats = TopicStats {
                        words: &words,
                        document: &init.histogram,
                        totals: &totals,
                    };
                    black_box(reassign(&mut sampler, rng, &doc, &init.topics, &stats).unwrap())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn gen_chain(n: usize, labels: u32, rng: &mut Pcg32) -> (LabelChain, FactorTable) {
    let l = labels as usize;
    let lens: Vec<usize> = (0..n).map(|p| if p == 0 { l } else { l * l }).collect();
    let factors = (0..lens.iter().sum::<usize>())
        .map(|_| rng.random_range(-2_000..2_000))
        .collect();
    let chain = (0..n).map(|_| rng.random_range(1..=labels)).collect();
    (
        LabelChain::new(chain, labels).unwrap(),
        FactorTable::new(factors, lens, labels).unwrap(),
    )
}

fn bench_chain_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_step");
    const STEPS_PER_ITER: usize = 1024;
    group.throughput(Throughput::Elements(STEPS_PER_ITER as u64));

    for &labels in &[4u32, 10, 32] {
        let mut rng = Pcg32::seed_from_u64(1234);
        let (chain, factors) = gen_chain(64, labels, &mut rng);
        let mh = MetropolisHastings::uniform(labels).unwrap();
        let mut gibbs = GibbsLabelSampler::new();

        group.bench_function(format!("mh_labels={labels}"), |b| {
            b.iter_batched_ref(
                || (Pcg32::seed_from_u64(1001), chain.clone()),
                |(rng, chain)| {
                    let mut state = SamplerState::new();
                    for i in 0..STEPS_PER_ITER {
                        state = mh.step(state, chain, &factors, i % 64, rng).unwrap().0;
                    }
                    black_box(state)
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("gibbs_labels={labels}"), |b| {
            b.iter_batched_ref(
                || (Pcg32::seed_from_u64(1002), chain.clone()),
                |(rng, chain)| {
                    let mut state = SamplerState::new();
                    for i in 0..STEPS_PER_ITER {
                        state = gibbs.step(state, chain, &factors, i % 64, rng).unwrap().0;
                    }
                    black_box(state)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(sampling, bench_reassign, bench_chain_steps);
criterion_main!(sampling);
