use crate::note::{parse_note_name, NoteNameError};
use anyhow::{bail, Context, Result};
use midly::{
    num::{u24, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::Path;

/// A note of a melody: `key` held for `quarters` quarter notes, played
/// `repeats` times in a row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreNote {
    pub key: u7,
    pub quarters: u8,
    pub repeats: u8,
}

macro_rules! notes {
    (
        $( ($k: expr, $q: expr, $r: expr) ),+
    ) => {
        vec![ $( ScoreNote {key: u7::from($k), quarters: $q, repeats: $r} ),+ ]
    }
}

/// Slowest tempo whose quarter note still fits the 24-bit tempo event.
pub const MIN_BPM: u32 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub ticks_per_quarter: u16,
    pub bpm: u32,
    pub velocity: u7,
    pub channel: u4,
}

impl Default for ExportOptions {
    /// 150 bpm is one quarter note every 400 ms
    fn default() -> Self {
        Self {
            ticks_per_quarter: 480,
            bpm: 150,
            velocity: u7::from(64),
            channel: u4::from(0),
        }
    }
}

impl ExportOptions {
    /// Microseconds per quarter note.
    pub fn tempo(&self) -> Result<u24> {
        if self.bpm < MIN_BPM {
            bail!("tempo must be at least {} bpm, got {}", MIN_BPM, self.bpm);
        }
        Ok(u24::from(60_000_000 / self.bpm))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Score {
    pub notes: Vec<ScoreNote>,
}

impl Score {
    /// "Alle meine Entchen"
    pub fn alle_meine_entchen() -> Self {
        Self {
            notes: notes![
                (60, 1, 1), // C
                (62, 1, 1), // D
                (64, 1, 1), // E
                (65, 1, 1), // F
                (67, 2, 2), // G G
                (69, 1, 4), // A A A A
                (67, 4, 1), // G
                (69, 1, 4), // A A A A
                (67, 4, 1), // G
                (65, 1, 4), // F F F F
                (64, 2, 2), // E E
                (62, 1, 4), // D D D D
                (60, 4, 1)  // C
            ],
        }
    }

    /// One quarter note per whitespace-separated note name.
    pub fn from_note_names(text: &str) -> Result<Self, NoteNameError> {
        let notes = text
            .split_whitespace()
            .map(|name| {
                Ok(ScoreNote {
                    key: parse_note_name(name)?,
                    quarters: 1,
                    repeats: 1,
                })
            })
            .collect::<Result<Vec<_>, NoteNameError>>()?;
        Ok(Self { notes })
    }

    /// One quarter note per key.
    pub fn from_keys(keys: impl IntoIterator<Item = u7>) -> Self {
        Self {
            notes: keys
                .into_iter()
                .map(|key| ScoreNote {
                    key,
                    quarters: 1,
                    repeats: 1,
                })
                .collect(),
        }
    }

    /// Keys in playing order with repeats expanded.
    pub fn keys(&self) -> impl Iterator<Item = u7> + '_ {
        self.notes
            .iter()
            .flat_map(|note| std::iter::repeat(note.key).take(note.repeats as usize))
    }

    pub fn to_smf(&self, options: &ExportOptions) -> Result<Smf<'static>> {
        let mut smf = Smf::new(Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(options.ticks_per_quarter.into()),
        });
        let mut track = Track::new();
        track.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(options.tempo()?)),
        });
        let midi = |message| TrackEventKind::Midi {
            channel: options.channel,
            message,
        };
        for note in &self.notes {
            let length = u32::from(note.quarters) * u32::from(options.ticks_per_quarter);
            for _ in 0..note.repeats {
                track.push(TrackEvent {
                    delta: 0.into(),
                    kind: midi(MidiMessage::NoteOn {
                        key: note.key,
                        vel: options.velocity,
                    }),
                });
                track.push(TrackEvent {
                    delta: length.into(),
                    kind: midi(MidiMessage::NoteOff {
                        key: note.key,
                        vel: 0.into(),
                    }),
                });
            }
        }
        track.push(TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        Ok(smf)
    }

    pub fn save(&self, path: &Path, options: &ExportOptions) -> Result<()> {
        self.to_smf(options)?
            .save(path)
            .with_context(|| format!("Failed to write MIDI file {}", path.display()))?;
        log::info!(
            "wrote {} notes to {}",
            self.keys().count(),
            path.display()
        );
        Ok(())
    }
}
