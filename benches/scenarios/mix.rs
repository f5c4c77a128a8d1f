//! Benchmarks for the renderer mixing many voices.
//!
//! These simulate a busy arrangement: a drum kit plus held chords, all
//! summed with the shared reverb into an interleaved stereo device buffer.

use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use studio_synth::graph::builder::VoiceBuilder;
use studio_synth::graph::reverb::ReverbBus;
use studio_synth::synth::message::{Command, CommandSender};
use studio_synth::synth::renderer::{RenderShared, Renderer};
use studio_synth::synth::voice::Voice;
use studio_synth::voices::{self, DrumHit, DrumKind, Instrument, Note};
use studio_synth::RENDER_QUANTUM;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: [f32; 4] = [261.63, 329.63, 392.0, 493.88];

/// A renderer already holding `chords` four-note organ chords and a kit.
fn busy_renderer(chords: usize) -> Renderer {
    let mut rng = StdRng::seed_from_u64(8);
    let reverb = ReverbBus::synthetic(2.0, SAMPLE_RATE, RENDER_QUANTUM, &mut rng);
    let shared = Arc::new(RenderShared::new(0.3));
    let (renderer, mut handle) = Renderer::new(SAMPLE_RATE, 256, 512, reverb, shared);

    let builder = || VoiceBuilder::new(SAMPLE_RATE).with_rng(StdRng::seed_from_u64(2));
    for _ in 0..chords {
        for &freq in &CHORD {
            let note = Note::new(freq, 4.0, 0.6, 0.0, true).unwrap();
            let graph = voices::build_instrument(Instrument::Organ, &note, builder()).unwrap();
            handle
                .commands
                .send(Command::Start(Box::new(Voice::new("organ", Some(freq), graph))))
                .unwrap();
        }
    }
    for drum in [DrumKind::Kick, DrumKind::Snare, DrumKind::HiHat, DrumKind::Crash] {
        let graph = voices::build_drum(drum, &DrumHit::new(0.8, 0.0), builder()).unwrap();
        handle
            .commands
            .send(Command::Start(Box::new(Voice::new("drum", None, graph))))
            .unwrap();
    }
    renderer
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === MINIMAL: drum kit only ===
        group.bench_with_input(BenchmarkId::new("kit", size), &size, |b, _| {
            b.iter_batched(
                || busy_renderer(0),
                |mut renderer| {
                    renderer.render_interleaved(&mut buffer, 2);
                    renderer
                },
                BatchSize::LargeInput,
            )
        });

        // === FULL: kit plus 4 chords (20 voices) ===
        group.bench_with_input(BenchmarkId::new("kit_and_chords", size), &size, |b, _| {
            b.iter_batched(
                || busy_renderer(4),
                |mut renderer| {
                    renderer.render_interleaved(&mut buffer, 2);
                    renderer
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}
