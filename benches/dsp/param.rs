//! Benchmarks for parameter automation.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use studio_synth::graph::envelope::Adsr;
use studio_synth::graph::node::RenderCtx;
use studio_synth::graph::param::AudioParam;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn piano_envelope() -> AudioParam {
    let mut param = AudioParam::new(0.001);
    Adsr::new(0.01, 0.3, 0.3, 0.5)
        .schedule(&mut param, 0.8, 0.0, 2.0)
        .unwrap();
    param
}

pub fn bench_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/param");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Constant value: the common case for filter Q and unautomated gains
        let mut flat = AudioParam::new(0.5);
        let ctx = RenderCtx::new(SAMPLE_RATE, 0);
        group.bench_with_input(BenchmarkId::new("constant", size), &size, |b, _| {
            b.iter(|| flat.fill(black_box(&ctx), black_box(&mut buffer)))
        });

        // Walk a full ADSR curve block by block
        let blocks = (2.0 * SAMPLE_RATE as f64 / size as f64) as u64;
        group.bench_with_input(BenchmarkId::new("adsr_2s", size), &size, |b, _| {
            b.iter_batched(
                piano_envelope,
                |mut param| {
                    for block in 0..blocks {
                        let ctx = RenderCtx::new(SAMPLE_RATE, block * size as u64);
                        param.fill(&ctx, &mut buffer);
                    }
                    param
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
