//! Benchmarks for the partitioned convolution reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use studio_synth::dsp::convolution::PartitionedConvolver;
use studio_synth::dsp::noise::ImpulseResponse;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");
    let mut rng = StdRng::seed_from_u64(1);

    for seconds in [0.5f32, 2.0] {
        let impulse = ImpulseResponse::synthetic(seconds, SAMPLE_RATE, &mut rng);

        for &size in BLOCK_SIZES {
            let input: Vec<f32> = (0..size).map(|_| rng.gen_range(-0.5..0.5)).collect();
            let (mut left, mut right) = (vec![0.0f32; size], vec![0.0f32; size]);

            // Wet bus carrying signal: full FFT work every block
            let mut convolver =
                PartitionedConvolver::new(&impulse.left, &impulse.right, size, SAMPLE_RATE, true);
            group.bench_with_input(
                BenchmarkId::new(format!("{seconds}s_active"), size),
                &size,
                |b, _| b.iter(|| convolver.process(black_box(&input), &mut left, &mut right)),
            );

            // Silent bus after the tail has died out
            let silence = vec![0.0f32; size];
            let mut convolver =
                PartitionedConvolver::new(&impulse.left, &impulse.right, size, SAMPLE_RATE, true);
            for _ in 0..=convolver.partition_count() + 1 {
                convolver.process(&silence, &mut left, &mut right);
            }
            group.bench_with_input(
                BenchmarkId::new(format!("{seconds}s_idle"), size),
                &size,
                |b, _| b.iter(|| convolver.process(black_box(&silence), &mut left, &mut right)),
            );
        }
    }

    group.finish();
}
