//! Organ voice.
//!
//! Additive drawbar organ: pure sines at the classic footage ratios, keyed on
//! almost instantly and held flat while the key is down (a pipe does not
//! decay), plus a faint looping noise bed for the wind in the pipes.
//!
//! ```text
//! ratio   0.5   1     1.498  2     2.997  4
//!         16'   8'    5⅓'    4'    2⅔'    2'
//!         sub   unison fifth octave twelfth two octaves
//! ```

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;

use super::parts::{adsr_gain, bus, level, noise_bed, partial};
use super::Note;

const REVERB_SEND: f32 = 0.6;
const DRAWBARS: [(f32, f32); 6] = [
    (0.5, 0.35),
    (1.0, 0.5),
    (1.498, 0.25),
    (2.0, 0.3),
    (2.997, 0.15),
    (4.0, 0.12),
];
const WIND_LEVEL: f32 = 0.02;

/// Holds at full level whether or not sustain is enabled; only the release
/// shortens without the pedal.
pub fn organ(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;
    let out = bus(b);

    // Sustain pedal only shortens the key release; pipes never decay.
    let key = Adsr::new(0.01, 0.0, 1.0, 0.1).pedal(note.sustain, 1.0, 0.05);

    for &(ratio, relative) in &DRAWBARS {
        partial(b, out, Waveform::Sine, freq * ratio, key, level(relative, vel), note)?;
    }

    let wind = noise_bed(b, 0.5);
    let pipe = b.add(FilterNode::bandpass((freq * 2.0).clamp(400.0, 6_000.0), 0.6));
    let breath = adsr_gain(b, key, level(WIND_LEVEL, vel), note)?;
    b.connect(wind, pipe)?;
    b.connect(pipe, breath)?;
    b.connect(breath, out)?;
    b.schedule(wind, note.start, note.end())?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::param::AutomationKind;
    use crate::voices::tests::builder;
    use crate::voices::{build_instrument, Instrument};

    #[test]
    fn six_sine_drawbars_and_a_noise_bed() {
        let note = Note::new(200.0, 1.0, 1.0, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Organ, &note, builder()).unwrap();
        assert_eq!(graph.generator_count(), 7);

        let mut ratios: Vec<f32> = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_oscillator())
            .map(|osc| {
                assert_eq!(osc.waveform(), Waveform::Sine);
                osc.frequency_param().default_value() / 200.0
            })
            .collect();
        ratios.sort_by(f32::total_cmp);
        let expected = [0.5, 1.0, 1.498, 2.0, 2.997, 4.0];
        for (r, e) in ratios.iter().zip(expected) {
            assert!((r - e).abs() < 1e-5);
        }
    }

    #[test]
    fn holds_flat_while_the_key_is_down() {
        let note = Note::new(200.0, 2.0, 1.0, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Organ, &note, builder()).unwrap();
        let gain = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_gain())
            .find(|g| g.gain_param().events().len() > 1)
            .unwrap()
            .gain_param();

        let kinds: Vec<_> = gain.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds.last(), Some(&AutomationKind::ExponentialRamp));
        let held = gain.value_at(0.5);
        assert!((gain.value_at(1.5) - held).abs() < 1e-6);
    }
}
