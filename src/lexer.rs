//! Reads a program from the notes of a melody.
//!
//! Each token is spelled by one or more natural notes:
//!
//! | Octave | C | D | E | F | G | A | B |
//! |---|---|---|---|---|---|---|---|
//! | 1 | `(` | `)` | `+` | `-` | `*` | `=` | `>` after `A1` |
//! | 2 | `if` | `then` | `else` | `\` | `let` | `in` | `;` |
//! | 3 | `loop` | `{` | `}` | `<` | `>` | `!` | `:` |
//! | 4 | number | 100000 | 10000 | 1000 | 100 | 10 | 1 |
//! | 5 | identifier | `D` | `E` | `F` | `G` | `A` | `B` |
//! | 6 | `true` | `false` | | | | | |
//!
//! `A1 A1` is `==` and `A1 B1` is `=>`. A number starts and ends with `C4`
//! and adds up the digit notes in between, so `C4 A4 B4 B4 C4` is 12. An
//! identifier is the letters between two `C5`.

use crate::note::NoteName;
use crate::token::{digit_value, Letter, Token};
use midly::num::u7;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedNote(NoteName),
    UnterminatedNumber,
    UnterminatedIdentifier,
    EmptyIdentifier,
    NumberTooLarge,
}

/// A lexing failure at the zero-based `position` of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub position: usize,
    pub kind: LexErrorKind,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedNote(name) => write!(f, "unexpected note {}", name),
            LexErrorKind::UnterminatedNumber => f.write_str("number without a closing C4"),
            LexErrorKind::UnterminatedIdentifier => {
                f.write_str("identifier without a closing C5")
            }
            LexErrorKind::EmptyIdentifier => f.write_str("identifier without letters"),
            LexErrorKind::NumberTooLarge => f.write_str("number too large"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at note {}", self.kind, self.position + 1)
    }
}

impl std::error::Error for LexError {}

/// Letter and octave of a key without accidental.
fn natural_note(key: u7) -> Option<(Letter, i8)> {
    let name = NoteName::from(key);
    let mut chars = name.name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Letter::from_char(c).map(|letter| (letter, name.octave)),
        _ => None,
    }
}

/// Iterator over the tokens spelled by a key sequence. Stops after the first
/// error.
pub struct Lexer<'a> {
    keys: &'a [u7],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(keys: &'a [u7]) -> Self {
        Self { keys, pos: 0 }
    }

    fn error(&self, position: usize, kind: LexErrorKind) -> LexError {
        LexError { position, kind }
    }

    fn peek(&self) -> Option<(Letter, i8)> {
        self.keys.get(self.pos).copied().and_then(natural_note)
    }

    /// Consumes one note, which must be natural.
    fn bump(&mut self) -> Option<Result<(Letter, i8), LexError>> {
        let key = *self.keys.get(self.pos)?;
        let position = self.pos;
        self.pos += 1;
        Some(natural_note(key).ok_or_else(|| {
            self.error(position, LexErrorKind::UnexpectedNote(NoteName::from(key)))
        }))
    }

    fn unexpected(&self, position: usize) -> LexError {
        let name = NoteName::from(self.keys[position]);
        self.error(position, LexErrorKind::UnexpectedNote(name))
    }

    fn number(&mut self, start: usize) -> Result<Token, LexError> {
        let mut value: i64 = 0;
        loop {
            let position = self.pos;
            let note = self
                .bump()
                .ok_or_else(|| self.error(start, LexErrorKind::UnterminatedNumber))??;
            match note {
                (Letter::C, 4) => return Ok(Token::Number(value)),
                (letter, 4) => {
                    let digit = digit_value(letter).ok_or_else(|| self.unexpected(position))?;
                    value = value
                        .checked_add(digit)
                        .ok_or_else(|| self.error(start, LexErrorKind::NumberTooLarge))?;
                }
                _ => return Err(self.unexpected(position)),
            }
        }
    }

    fn ident(&mut self, start: usize) -> Result<Token, LexError> {
        let mut name = String::new();
        loop {
            let position = self.pos;
            let note = self
                .bump()
                .ok_or_else(|| self.error(start, LexErrorKind::UnterminatedIdentifier))??;
            match note {
                (Letter::C, 5) if name.is_empty() => {
                    return Err(self.error(start, LexErrorKind::EmptyIdentifier))
                }
                (Letter::C, 5) => return Ok(Token::Ident(name)),
                (letter, 5) => name.push(letter.as_char()),
                _ => return Err(self.unexpected(position)),
            }
        }
    }

    fn token(&mut self, start: usize, note: (Letter, i8)) -> Result<Token, LexError> {
        use Letter::*;
        Ok(match note {
            (C, 1) => Token::LParen,
            (D, 1) => Token::RParen,
            (E, 1) => Token::Plus,
            (F, 1) => Token::Minus,
            (G, 1) => Token::Star,
            (A, 1) => match self.peek() {
                Some((A, 1)) => {
                    self.pos += 1;
                    Token::DoubleEquals
                }
                Some((B, 1)) => {
                    self.pos += 1;
                    Token::Arrow
                }
                _ => Token::Equals,
            },
            (C, 2) => Token::If,
            (D, 2) => Token::Then,
            (E, 2) => Token::Else,
            (F, 2) => Token::Backslash,
            (G, 2) => Token::Let,
            (A, 2) => Token::In,
            (B, 2) => Token::Semicolon,
            (C, 3) => Token::Loop,
            (D, 3) => Token::LBrace,
            (E, 3) => Token::RBrace,
            (F, 3) => Token::Less,
            (G, 3) => Token::Greater,
            (A, 3) => Token::Not,
            (B, 3) => Token::Colon,
            (C, 4) => self.number(start)?,
            (C, 5) => self.ident(start)?,
            (C, 6) => Token::Bool(true),
            (D, 6) => Token::Bool(false),
            _ => return Err(self.unexpected(start)),
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let result = match self.bump()? {
            Ok(note) => self.token(start, note),
            Err(err) => Err(err),
        };
        if result.is_err() {
            self.pos = self.keys.len();
        }
        Some(result)
    }
}

/// Tokens spelled by `keys`, e.g. the note-on keys of a MIDI file.
pub fn lex_notes(keys: &[u7]) -> Result<Vec<Token>, LexError> {
    Lexer::new(keys).collect()
}
