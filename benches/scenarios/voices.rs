//! Benchmarks for complete instrument and drum voices.
//!
//! `build/*` is the control-thread cost of one play_note/play_drum call.
//! `render/*` is the audio-thread cost of one voice for its whole life.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use studio_synth::graph::builder::VoiceBuilder;
use studio_synth::graph::node::RenderCtx;
use studio_synth::graph::voice_graph::VoiceGraph;
use studio_synth::voices::{self, DrumHit, DrumKind, Instrument, Note};
use studio_synth::RENDER_QUANTUM;

use crate::SAMPLE_RATE;

fn builder() -> VoiceBuilder {
    VoiceBuilder::new(SAMPLE_RATE).with_rng(StdRng::seed_from_u64(5))
}

fn note() -> Note {
    // A3, half a second
    Note::new(220.0, 0.5, 0.8, 0.0, true).unwrap()
}

fn render_to_end(mut graph: VoiceGraph, dry: &mut [f32], wet: &mut [f32]) -> VoiceGraph {
    let mut frame = 0;
    while !graph.is_finished() {
        dry.fill(0.0);
        wet.fill(0.0);
        graph.render(&RenderCtx::new(SAMPLE_RATE, frame), dry, wet);
        frame += RENDER_QUANTUM as u64;
    }
    graph
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let mut dry = vec![0.0f32; RENDER_QUANTUM];
    let mut wet = vec![0.0f32; RENDER_QUANTUM];

    for instrument in [Instrument::Piano, Instrument::GrandPiano, Instrument::Organ, Instrument::Violin] {
        let name = instrument.to_string();

        group.bench_with_input(BenchmarkId::new("build", &name), &instrument, |b, &instrument| {
            b.iter(|| voices::build_instrument(black_box(instrument), &note(), builder()).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("render", &name), &instrument, |b, &instrument| {
            b.iter_batched(
                || voices::build_instrument(instrument, &note(), builder()).unwrap(),
                |graph| render_to_end(graph, &mut dry, &mut wet),
                BatchSize::SmallInput,
            )
        });
    }

    for drum in [DrumKind::Kick, DrumKind::Snare, DrumKind::Clap, DrumKind::Crash] {
        let name = drum.to_string();
        let hit = DrumHit::new(0.8, 0.0);

        group.bench_with_input(BenchmarkId::new("render", &name), &drum, |b, &drum| {
            b.iter_batched(
                || voices::build_drum(drum, &hit, builder()).unwrap(),
                |graph| render_to_end(graph, &mut dry, &mut wet),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
