//! Instrument and drum recipes.
//!
//! Each recipe is a pure function from a note (or drum hit) to a wired and
//! scheduled voice graph. Recipes allocate fresh nodes and noise every call
//! and share nothing but the two engine sinks (master and reverb).
//!
//! # Example
//!
//! ```ignore
//! use studio_synth::voices::{self, Instrument, Note, DrumKind, DrumHit};
//! use studio_synth::graph::builder::VoiceBuilder;
//!
//! let note = Note::new(440.0, 1.0, 0.7, now, true)?;
//! let piano = voices::build_instrument(Instrument::Piano, &note, VoiceBuilder::new(48_000.0))?;
//!
//! let hit = DrumHit::new(0.8, now);
//! let kick = voices::build_drum(DrumKind::Kick, &hit, VoiceBuilder::new(48_000.0))?;
//! ```

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::voice_graph::VoiceGraph;

mod parts;

mod bass_drum;
mod clap;
mod crash;
mod flute;
mod generic;
mod grand_piano;
mod guitar;
mod hihat;
mod kick;
mod openhat;
mod organ;
mod pan_flute;
mod piano;
mod recorder;
mod ride;
mod snare;
mod tom;
mod ukulele;
mod violin;

pub use bass_drum::bass_drum;
pub use clap::clap;
pub use crash::crash;
pub use flute::flute;
pub use generic::generic;
pub use grand_piano::grand_piano;
pub use guitar::guitar;
pub use hihat::hihat;
pub use kick::kick;
pub use openhat::openhat;
pub use organ::organ;
pub use pan_flute::pan_flute;
pub use piano::piano;
pub use recorder::recorder;
pub use ride::ride;
pub use snare::snare;
pub use tom::tom;
pub use ukulele::ukulele;
pub use violin::violin;

/// Bass drum decay bounds, in seconds.
pub const BASS_DRUM_DURATION_RANGE: (f64, f64) = (0.3, 2.0);

/// Melodic instruments with a procedural recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum Instrument {
    #[strum(to_string = "piano", serialize = "upright-piano", serialize = "acoustic-piano")]
    Piano,
    #[strum(to_string = "grand-piano", serialize = "grand", serialize = "grandpiano")]
    GrandPiano,
    #[strum(to_string = "organ", serialize = "church-organ", serialize = "pipe-organ")]
    Organ,
    #[strum(to_string = "guitar", serialize = "acoustic-guitar", serialize = "nylon-guitar")]
    Guitar,
    #[strum(to_string = "violin", serialize = "fiddle", serialize = "strings")]
    Violin,
    #[strum(to_string = "ukulele", serialize = "uke")]
    Ukulele,
    #[strum(to_string = "flute")]
    Flute,
    #[strum(to_string = "pan-flute", serialize = "panflute", serialize = "pan-pipes")]
    PanFlute,
    #[strum(to_string = "recorder")]
    Recorder,
    /// Plain triangle tone used for any name that matches nothing else.
    #[strum(to_string = "generic", serialize = "synth", serialize = "default")]
    Generic,
}

impl Instrument {
    /// Look up an instrument by name, falling back to [`Instrument::Generic`].
    ///
    /// Case-insensitive; spaces and underscores count as hyphens. Names that
    /// are not an exact match resolve by keyword, so "electric piano" plays
    /// the piano and "bass guitar" the guitar.
    pub fn from_name(name: &str) -> Self {
        let name = normalize(name);
        if let Ok(instrument) = Self::from_str(&name) {
            return instrument;
        }
        INSTRUMENT_KEYWORDS
            .iter()
            .find(|(keyword, _)| name.contains(keyword))
            .map_or(Instrument::Generic, |&(_, instrument)| instrument)
    }
}

/// Keyword fallback, most specific first.
const INSTRUMENT_KEYWORDS: &[(&str, Instrument)] = &[
    ("grand-piano", Instrument::GrandPiano),
    ("grandpiano", Instrument::GrandPiano),
    ("pan-flute", Instrument::PanFlute),
    ("panflute", Instrument::PanFlute),
    ("pan-pipe", Instrument::PanFlute),
    ("piano", Instrument::Piano),
    ("organ", Instrument::Organ),
    ("guitar", Instrument::Guitar),
    ("violin", Instrument::Violin),
    ("fiddle", Instrument::Violin),
    ("ukulele", Instrument::Ukulele),
    ("flute", Instrument::Flute),
    ("recorder", Instrument::Recorder),
];

/// Drum sounds triggered by `play_drum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum DrumKind {
    #[strum(to_string = "kick", serialize = "kick-drum")]
    Kick,
    #[strum(to_string = "bass", serialize = "bass-drum", serialize = "bassdrum")]
    Bass,
    #[strum(to_string = "snare", serialize = "snare-drum")]
    Snare,
    #[strum(to_string = "hihat", serialize = "hi-hat", serialize = "closed-hat", serialize = "closed-hihat")]
    HiHat,
    #[strum(to_string = "openhat", serialize = "open-hat", serialize = "open-hihat", serialize = "open-hi-hat")]
    OpenHat,
    #[strum(to_string = "crash", serialize = "crash-cymbal")]
    Crash,
    #[strum(to_string = "ride", serialize = "ride-cymbal")]
    Ride,
    #[strum(to_string = "clap", serialize = "handclap", serialize = "hand-clap")]
    Clap,
    #[strum(to_string = "tom", serialize = "tom-tom")]
    Tom,
}

impl DrumKind {
    /// Look up a drum by name. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(&normalize(name)).ok()
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Everything a melodic recipe needs to know about one note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Hz.
    pub frequency: f32,
    /// Seconds from `start` to the end of the release.
    pub duration: f64,
    /// 0..=1.
    pub velocity: f32,
    /// Absolute start time on the engine clock.
    pub start: f64,
    /// Sustain pedal down: longer, fuller tail.
    pub sustain: bool,
}

impl Note {
    /// Validate and build a note. Velocity is clamped into 0..=1.
    pub fn new(
        frequency: f32,
        duration: f64,
        velocity: f32,
        start: f64,
        sustain: bool,
    ) -> Result<Self, EngineError> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(EngineError::InvalidNote(format!("frequency {frequency} Hz")));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(EngineError::InvalidNote(format!("duration {duration} s")));
        }
        if velocity.is_nan() {
            return Err(EngineError::InvalidNote("velocity is NaN".into()));
        }
        if !start.is_finite() || start < 0.0 {
            return Err(EngineError::InvalidNote(format!("start time {start} s")));
        }
        Ok(Self {
            frequency,
            duration,
            velocity: velocity.clamp(0.0, 1.0),
            start,
            sustain,
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// One drum trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    /// 0..=1.
    pub velocity: f32,
    /// Absolute start time on the engine clock.
    pub start: f64,
    /// Decay length of the bass drum, seconds.
    pub bass_drum_duration: f64,
}

impl DrumHit {
    pub fn new(velocity: f32, start: f64) -> Self {
        Self {
            velocity: if velocity.is_nan() { 0.0 } else { velocity.clamp(0.0, 1.0) },
            start,
            bass_drum_duration: 0.8,
        }
    }

    pub fn with_bass_drum_duration(mut self, seconds: f64) -> Self {
        self.bass_drum_duration = seconds;
        self
    }
}

/// Run the recipe for `instrument` and validate the resulting graph.
pub fn build_instrument(
    instrument: Instrument,
    note: &Note,
    mut builder: VoiceBuilder,
) -> Result<VoiceGraph, EngineError> {
    let b = &mut builder;
    match instrument {
        Instrument::Piano => piano(b, note)?,
        Instrument::GrandPiano => grand_piano(b, note)?,
        Instrument::Organ => organ(b, note)?,
        Instrument::Guitar => guitar(b, note)?,
        Instrument::Violin => violin(b, note)?,
        Instrument::Ukulele => ukulele(b, note)?,
        Instrument::Flute => flute(b, note)?,
        Instrument::PanFlute => pan_flute(b, note)?,
        Instrument::Recorder => recorder(b, note)?,
        Instrument::Generic => generic(b, note)?,
    }
    Ok(builder.build()?)
}

/// Run the recipe for `kind` and validate the resulting graph.
pub fn build_drum(
    kind: DrumKind,
    hit: &DrumHit,
    mut builder: VoiceBuilder,
) -> Result<VoiceGraph, EngineError> {
    let b = &mut builder;
    match kind {
        DrumKind::Kick => kick(b, hit)?,
        DrumKind::Bass => bass_drum(b, hit)?,
        DrumKind::Snare => snare(b, hit)?,
        DrumKind::HiHat => hihat(b, hit)?,
        DrumKind::OpenHat => openhat(b, hit)?,
        DrumKind::Crash => crash(b, hit)?,
        DrumKind::Ride => ride(b, hit)?,
        DrumKind::Clap => clap(b, hit)?,
        DrumKind::Tom => tom(b, hit)?,
    }
    Ok(builder.build()?)
}
