//! Reads Standard MIDI Files and lists the notes they play.
//!
//! [`smf::parse`] decodes a file into tracks of timed events,
//! [`events::event_log`] turns those into one line per note-on or note-off,
//! and [`score::Score`] writes simple melodies back out as MIDI files.
//!
//! A melody can also spell a small functional program: [`lexer`] reads the
//! tokens from the note-ons, [`parser`] builds the expression tree and
//! [`eval`] runs it. [`token::encode_program`] goes the other way, from
//! program text to notes.

pub mod cmdline;
pub mod error;
pub mod eval;
pub mod events;
pub mod lexer;
pub mod note;
pub mod parser;
pub mod score;
pub mod smf;
#[cfg(test)]
pub mod test_helpers;
pub mod token;

pub use error::{FormatError, FormatErrorKind};
pub use events::{
    event_log, for_each_track, note_names, note_on_keys, NoteEvent, NoteKind, VelocityZero,
};
pub use lexer::lex_notes;
pub use note::{decode_key_to_name, parse_note_name, pitch_to_name, NoteName};
pub use parser::parse_program;
pub use smf::{load_file, parse, MidiFile};
pub use token::{encode_program, Token};
