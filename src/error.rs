use std::fmt;

/// Decoder error: what went wrong and where in the input buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatError {
    /// Byte offset into the file at which decoding failed
    pub offset: usize,
    pub kind: FormatErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A chunk didn't start with the expected four-byte tag
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    /// The buffer ended in the middle of a field
    Truncated,
    /// A chunk declares more bytes than remain in the buffer
    ChunkOverrun { declared: u32, available: usize },
    HeaderTooShort(u32),
    UnknownFormat(u16),
    /// Variable-length quantity spans more than four bytes
    VarLenTooLong,
    /// Data byte with no preceding status byte to reuse
    MissingStatus,
    UnexpectedStatus(u8),
    /// Data byte with the high bit set
    InvalidDataByte(u8),
    MissingTracks { declared: u16, found: u16 },
}

impl FormatError {
    pub fn new(offset: usize, kind: FormatErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FormatErrorKind::*;
        match self {
            BadMagic { expected, found } => write!(
                f,
                "bad magic bytes: expected {:?}, found {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(found)
            ),
            Truncated => f.write_str("unexpected end of data"),
            ChunkOverrun {
                declared,
                available,
            } => write!(
                f,
                "chunk declares {declared} bytes but only {available} remain"
            ),
            HeaderTooShort(len) => write!(f, "header chunk too short ({len} bytes)"),
            UnknownFormat(format) => write!(f, "unknown file format {format}"),
            VarLenTooLong => f.write_str("variable-length quantity longer than 4 bytes"),
            MissingStatus => f.write_str("data byte without running status"),
            UnexpectedStatus(status) => write!(f, "unexpected status byte {status:#04x}"),
            InvalidDataByte(byte) => write!(f, "invalid data byte {byte:#04x}"),
            MissingTracks { declared, found } => write!(
                f,
                "header declares {declared} tracks but only {found} were found"
            ),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset() {
        let err = FormatError::new(14, FormatErrorKind::MissingStatus);
        assert_eq!(
            err.to_string(),
            "data byte without running status at byte offset 14"
        );
    }

    #[test]
    fn display_bad_magic() {
        let err = FormatError::new(
            0,
            FormatErrorKind::BadMagic {
                expected: *b"MThd",
                found: *b"RIFF",
            },
        );
        assert_eq!(
            err.to_string(),
            "bad magic bytes: expected \"MThd\", found \"RIFF\" at byte offset 0"
        );
    }
}
