//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use studio_synth::dsp::filter::{FilterType, SvFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for filter_type in [FilterType::LowPass, FilterType::HighPass, FilterType::BandPass] {
            let name = format!("{filter_type:?}").to_lowercase();

            // Fixed coefficients
            let mut filter = SvFilter::new(filter_type);
            filter.set(1_000.0, 0.7, SAMPLE_RATE);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(&name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    for sample in buffer.iter_mut() {
                        *sample = filter.process(black_box(*sample));
                    }
                })
            });

            // Coefficients recomputed every sample, as a swept FilterNode does
            let mut filter = SvFilter::new(filter_type);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(format!("{name}_swept"), size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    for (i, sample) in buffer.iter_mut().enumerate() {
                        filter.set(500.0 + i as f32 * 4.0, 0.7, SAMPLE_RATE);
                        *sample = filter.process(black_box(*sample));
                    }
                })
            });
        }
    }

    group.finish();
}
