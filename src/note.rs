use midly::num::u7;
use once_cell::sync::Lazy;
use std::{collections::HashMap, fmt};

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

// German `H` is accepted as an alias of `B`
static LETTER_PITCH_CLASSES: Lazy<HashMap<char, i64>> = Lazy::new(|| {
    [
        ('C', 0),
        ('D', 2),
        ('E', 4),
        ('F', 5),
        ('G', 7),
        ('A', 9),
        ('B', 11),
        ('H', 11),
    ]
    .into_iter()
    .collect()
});

/// Splits a key number into its pitch class name and octave, with key 60 in
/// octave 4 and key 0 in octave -1.
pub fn decode_key_to_name(key: u7) -> (&'static str, i8) {
    let key = key.as_int();
    let octave = (key / 12) as i8 - 1;
    (NOTE_NAMES[(key % 12) as usize], octave)
}

/// Note name and octave of a key, displayed like `C#4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteName {
    pub name: &'static str,
    pub octave: i8,
}

impl From<u7> for NoteName {
    fn from(key: u7) -> Self {
        let (name, octave) = decode_key_to_name(key);
        Self { name, octave }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

pub fn pitch_to_name(key: u7) -> String {
    NoteName::from(key).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteNameError {
    Syntax { text: String, expected: String },
    OutOfRange { text: String },
}

impl fmt::Display for NoteNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteNameError::Syntax { text, expected } => {
                write!(f, "invalid note name {text:?}: expected {expected}")
            }
            NoteNameError::OutOfRange { text } => {
                write!(f, "note {text:?} is outside C-1..=G9 (keys 0..=127)")
            }
        }
    }
}

impl std::error::Error for NoteNameError {}

/// `None` when the key does not fit in an `i64`.
fn key_number(octave: i64, pitch_class: i64) -> Option<i64> {
    octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(pitch_class)
}

peg::parser! {
grammar note_text() for str {
    rule letter() -> i64
        = c:$(['A'..='H' | 'a'..='h']) {?
            c.chars()
                .next()
                .and_then(|c| LETTER_PITCH_CLASSES.get(&c.to_ascii_uppercase()))
                .copied()
                .ok_or("note letter")
        }

    rule accidental() -> i64
        = "#" { 1 } / "b" { -1 } / "" { 0 }

    rule octave() -> i64
        = n:$("-"? ['0'..='9']+) {? n.parse().or(Err("octave number")) }

    pub rule note() -> Option<i64>
        = l:letter() a:accidental() o:octave() { key_number(o, l + a) }
}
}

/// Parses a note name like `C4`, `f#3`, `Eb-1` or `H2` into a key number.
pub fn parse_note_name(text: &str) -> Result<u7, NoteNameError> {
    let text = text.trim();
    let key = note_text::note(text).map_err(|err| NoteNameError::Syntax {
        text: text.to_string(),
        expected: err.expected.to_string(),
    })?;
    match key.and_then(|key| u8::try_from(key).ok()) {
        Some(key) if key <= 127 => Ok(u7::from(key)),
        _ => Err(NoteNameError::OutOfRange {
            text: text.to_string(),
        }),
    }
}
