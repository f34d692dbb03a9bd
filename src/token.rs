use midly::num::u7;
use std::fmt;

/// Largest number literal a program can spell: one digit note per decimal
/// place, six places.
pub const MAX_NUMBER: i64 = 999_999;

/// Letters an identifier may use. `C` marks the start and end of an
/// identifier in note form, so it is not among them.
pub const IDENT_LETTERS: [char; 6] = ['D', 'E', 'F', 'G', 'A', 'B'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    LBrace,
    RBrace,
    Plus,
    Minus,
    Star,
    Equals,
    DoubleEquals,
    Arrow,
    Less,
    Greater,
    Not,
    Colon,
    Semicolon,
    Backslash,
    If,
    Then,
    Else,
    Let,
    In,
    Loop,
    Number(i64),
    Ident(String),
    Bool(bool),
}

impl Token {
    /// Keyword, boolean or identifier spelled by `word`, case-insensitively.
    pub fn from_word(word: &str) -> Option<Token> {
        let token = match word.to_ascii_lowercase().as_str() {
            "if" => Token::If,
            "then" => Token::Then,
            "else" => Token::Else,
            "let" => Token::Let,
            "in" => Token::In,
            "loop" => Token::Loop,
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => {
                let ident = word.to_ascii_uppercase();
                if ident.is_empty() || !ident.chars().all(|c| IDENT_LETTERS.contains(&c)) {
                    return None;
                }
                Token::Ident(ident)
            }
        };
        Some(token)
    }

    /// The notes that spell this token, see [`crate::lexer`] for the table.
    pub fn notes(&self) -> Result<Vec<u7>, EncodeError> {
        use Letter::*;
        let fixed = |spelling: &[(Letter, u8)]| -> Vec<u7> {
            spelling
                .iter()
                .map(|&(letter, octave)| natural(letter, octave))
                .collect()
        };
        Ok(match self {
            Token::LParen => fixed(&[(C, 1)]),
            Token::RParen => fixed(&[(D, 1)]),
            Token::Plus => fixed(&[(E, 1)]),
            Token::Minus => fixed(&[(F, 1)]),
            Token::Star => fixed(&[(G, 1)]),
            Token::Equals => fixed(&[(A, 1)]),
            Token::DoubleEquals => fixed(&[(A, 1), (A, 1)]),
            Token::Arrow => fixed(&[(A, 1), (B, 1)]),
            Token::If => fixed(&[(C, 2)]),
            Token::Then => fixed(&[(D, 2)]),
            Token::Else => fixed(&[(E, 2)]),
            Token::Backslash => fixed(&[(F, 2)]),
            Token::Let => fixed(&[(G, 2)]),
            Token::In => fixed(&[(A, 2)]),
            Token::Semicolon => fixed(&[(B, 2)]),
            Token::Loop => fixed(&[(C, 3)]),
            Token::LBrace => fixed(&[(D, 3)]),
            Token::RBrace => fixed(&[(E, 3)]),
            Token::Less => fixed(&[(F, 3)]),
            Token::Greater => fixed(&[(G, 3)]),
            Token::Not => fixed(&[(A, 3)]),
            Token::Colon => fixed(&[(B, 3)]),
            Token::Bool(true) => fixed(&[(C, 6)]),
            Token::Bool(false) => fixed(&[(D, 6)]),
            Token::Number(n) => number_notes(*n)?,
            Token::Ident(name) => ident_notes(name)?,
        })
    }
}

impl fmt::Display for Token {
    /// Source text of the token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Equals => "=",
            Token::DoubleEquals => "==",
            Token::Arrow => "=>",
            Token::Less => "<",
            Token::Greater => ">",
            Token::Not => "!",
            Token::Colon => ":",
            Token::Semicolon => ";",
            Token::Backslash => "\\",
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::Let => "let",
            Token::In => "in",
            Token::Loop => "loop",
            Token::Number(n) => return write!(f, "{}", n),
            Token::Ident(name) => name,
            Token::Bool(b) => return write!(f, "{}", b),
        };
        f.write_str(text)
    }
}

/// Natural note letters, by pitch class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Letter {
    C = 0,
    D = 2,
    E = 4,
    F = 5,
    G = 7,
    A = 9,
    B = 11,
}

impl Letter {
    pub fn from_char(c: char) -> Option<Letter> {
        Some(match c {
            'C' => Letter::C,
            'D' => Letter::D,
            'E' => Letter::E,
            'F' => Letter::F,
            'G' => Letter::G,
            'A' => Letter::A,
            'B' => Letter::B,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Key of a natural note, with C4 at key 60. `octave` is at most 9.
pub fn natural(letter: Letter, octave: u8) -> u7 {
    u7::from((octave + 1) * 12 + letter as u8)
}

/// Letters of the digit notes in octave 4, ones first.
const DIGIT_LETTERS: [Letter; 6] = [
    Letter::B,
    Letter::A,
    Letter::G,
    Letter::F,
    Letter::E,
    Letter::D,
];

/// Value added to a number literal by each digit note of octave 4.
pub fn digit_value(letter: Letter) -> Option<i64> {
    let place = DIGIT_LETTERS.iter().position(|&l| l == letter)?;
    Some(10i64.pow(place as u32))
}

fn number_notes(n: i64) -> Result<Vec<u7>, EncodeError> {
    if !(0..=MAX_NUMBER).contains(&n) {
        return Err(EncodeError::NumberOutOfRange(n));
    }
    let marker = natural(Letter::C, 4);
    let mut notes = vec![marker];
    let digits = n.to_string();
    for (place, digit) in digits.bytes().rev().enumerate().rev() {
        let count = usize::from(digit - b'0');
        notes.extend(std::iter::repeat(natural(DIGIT_LETTERS[place], 4)).take(count));
    }
    notes.push(marker);
    Ok(notes)
}

fn ident_notes(name: &str) -> Result<Vec<u7>, EncodeError> {
    let marker = natural(Letter::C, 5);
    let mut notes = vec![marker];
    for c in name.chars() {
        let letter = Letter::from_char(c.to_ascii_uppercase())
            .filter(|&l| l != Letter::C)
            .ok_or_else(|| EncodeError::BadIdentifier(name.to_string()))?;
        notes.push(natural(letter, 5));
    }
    if notes.len() == 1 {
        return Err(EncodeError::BadIdentifier(name.to_string()));
    }
    notes.push(marker);
    Ok(notes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Syntax { offset: usize, expected: String },
    NumberOutOfRange(i64),
    BadIdentifier(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Syntax { offset, expected } => {
                write!(f, "expected {expected} at offset {offset}")
            }
            EncodeError::NumberOutOfRange(n) => {
                write!(f, "number {n} is outside 0..={MAX_NUMBER}")
            }
            EncodeError::BadIdentifier(name) => write!(
                f,
                "identifier {name:?} must be made of the letters A, B, D, E, F and G"
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

peg::parser! {
grammar source() for str {
    rule _ = [' ' | '\t' | '\r' | '\n']*

    rule symbol() -> Token
        = "==" { Token::DoubleEquals }
        / "=>" { Token::Arrow }
        / "=" { Token::Equals }
        / "(" { Token::LParen }
        / ")" { Token::RParen }
        / "{" { Token::LBrace }
        / "}" { Token::RBrace }
        / "+" { Token::Plus }
        / "-" { Token::Minus }
        / "*" { Token::Star }
        / "<" { Token::Less }
        / ">" { Token::Greater }
        / "!" { Token::Not }
        / ":" { Token::Colon }
        / ";" { Token::Semicolon }
        / "\\" { Token::Backslash }

    rule number() -> Token
        = n:$(['0'..='9']+) {?
            n.parse::<i64>()
                .ok()
                .filter(|n| *n <= MAX_NUMBER)
                .map(Token::Number)
                .ok_or("number up to 999999")
        }

    rule word() -> Token
        = w:$(['a'..='z' | 'A'..='Z']+) {?
            Token::from_word(w).ok_or("keyword or identifier of the letters A B D E F G")
        }

    pub rule tokens() -> Vec<Token>
        = _ t:((symbol() / number() / word()) ** _) _ { t }
}
}

/// Splits program text into tokens. Whitespace between tokens is optional.
pub fn tokenize(text: &str) -> Result<Vec<Token>, EncodeError> {
    source::tokens(text).map_err(|err| EncodeError::Syntax {
        offset: err.location.offset,
        expected: err.expected.to_string(),
    })
}

/// Spells program text as a sequence of keys, one note per key.
pub fn encode_program(text: &str) -> Result<Vec<u7>, EncodeError> {
    let mut keys = Vec::new();
    for token in tokenize(text)? {
        keys.extend(token.notes()?);
    }
    Ok(keys)
}
