use crate::note::NoteName;
use crate::smf::{ChannelKind, ChannelMessage, Message, MidiFile, TimedEvent, Track};
use midly::num::{u4, u7};
use std::{fmt, slice};

/// What to do with note events whose velocity is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VelocityZero {
    /// A note-on with velocity 0 ends the note, and note-offs are always kept
    #[default]
    NoteOff,
    /// Drop every note-on and note-off with velocity 0, as older tools did
    Drop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteKind {
    On,
    Off,
}

/// A note-on or note-off found in a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    pub kind: NoteKind,
    pub channel: u4,
    pub key: u7,
    pub velocity: u7,
    /// Ticks since the start of the track
    pub tick: u64,
}

impl NoteEvent {
    pub fn name(&self) -> NoteName {
        NoteName::from(self.key)
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            NoteKind::On => "Note on, ",
            NoteKind::Off => "Note: ",
        };
        write!(f, "{}{} key={}", prefix, self.name(), self.key.as_int())
    }
}

/// Decides whether a channel message is surfaced as a note event.
pub fn classify(message: &ChannelMessage, policy: VelocityZero) -> Option<NoteKind> {
    let kind = match message.kind {
        ChannelKind::NoteOn => NoteKind::On,
        ChannelKind::NoteOff => NoteKind::Off,
        _ => return None,
    };
    if message.velocity().as_int() != 0 {
        return Some(kind);
    }
    match policy {
        VelocityZero::NoteOff => Some(NoteKind::Off),
        VelocityZero::Drop => None,
    }
}

/// Lazily yields the note events of one track, skipping everything else.
#[derive(Clone)]
pub struct NoteEvents<'a> {
    events: slice::Iter<'a, TimedEvent>,
    tick: u64,
    policy: VelocityZero,
}

impl<'a> Iterator for NoteEvents<'a> {
    type Item = NoteEvent;

    fn next(&mut self) -> Option<NoteEvent> {
        for event in self.events.by_ref() {
            self.tick += u64::from(event.delta);
            if let Message::Channel(message) = &event.message {
                if let Some(kind) = classify(message, self.policy) {
                    return Some(NoteEvent {
                        kind,
                        channel: message.channel,
                        key: message.key(),
                        velocity: message.velocity(),
                        tick: self.tick,
                    });
                }
            }
        }
        None
    }
}

pub fn note_events(track: &Track, policy: VelocityZero) -> NoteEvents<'_> {
    NoteEvents {
        events: track.iter(),
        tick: 0,
        policy,
    }
}

/// One track as seen by the event printer.
#[derive(Clone, Copy)]
pub struct TrackNotes<'a> {
    /// Zero-based position of the track in the file
    pub index: usize,
    pub track: &'a Track,
    policy: VelocityZero,
}

impl<'a> TrackNotes<'a> {
    /// Number of events of any kind in the track
    pub fn size(&self) -> usize {
        self.track.len()
    }

    pub fn events(&self) -> NoteEvents<'a> {
        note_events(self.track, self.policy)
    }

    pub fn header_line(&self) -> String {
        format!("Track {}: size = {}", self.index + 1, self.size())
    }
}

/// Walks the tracks of a parsed file. Iterating again starts from the first
/// track; nothing is re-read from disk.
pub fn for_each_track(
    file: &MidiFile,
    policy: VelocityZero,
) -> impl Iterator<Item = TrackNotes<'_>> + Clone {
    file.for_each_track()
        .map(move |(index, track)| TrackNotes {
            index,
            track,
            policy,
        })
}

/// Renders the per-track event log: a header line for every track followed by
/// one line per note event.
pub fn event_log(file: &MidiFile, policy: VelocityZero) -> Vec<String> {
    let mut lines = Vec::new();
    for track in for_each_track(file, policy) {
        lines.push(track.header_line());
        lines.extend(track.events().map(|event| event.to_string()));
    }
    lines
}

/// Names of all surfaced notes of all tracks, e.g. `["C4", "E4", "C4"]`.
pub fn note_names(file: &MidiFile, policy: VelocityZero) -> Vec<String> {
    for_each_track(file, policy)
        .flat_map(|track| track.events())
        .map(|event| event.name().to_string())
        .collect()
}

/// Keys of all sounding note-ons, track after track. This is the note
/// sequence a program is read from.
pub fn note_on_keys(file: &MidiFile) -> Vec<u7> {
    for_each_track(file, VelocityZero::NoteOff)
        .flat_map(|track| track.events())
        .filter(|event| event.kind == NoteKind::On)
        .map(|event| event.key)
        .collect()
}

/// Number of sounding note-ons per channel in a track.
pub fn note_on_counts(track: &Track) -> [usize; 16] {
    let mut counts = [0; 16];
    for event in note_events(track, VelocityZero::NoteOff) {
        if event.kind == NoteKind::On {
            counts[event.channel.as_int() as usize] += 1;
        }
    }
    counts
}
