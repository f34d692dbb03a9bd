//! Standard MIDI File reader.
//!
//! Decodes the `MThd` header chunk and every `MTrk` chunk into owned
//! [`MidiFile`] / [`Track`] / [`TimedEvent`] values. Running status is
//! expanded while reading, so every [`ChannelMessage`] carries its status.

use crate::error::{FormatError, FormatErrorKind};
use anyhow::{Context, Result};
use midly::num::{u4, u7};
use std::path::Path;

const HEADER_TAG: [u8; 4] = *b"MThd";
const TRACK_TAG: [u8; 4] = *b"MTrk";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Format 0, one multi-channel track
    SingleTrack,
    /// Format 1, simultaneous tracks
    Parallel,
    /// Format 2, independent sequences
    Sequential,
}

/// Time division from the header chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timing {
    /// Ticks per quarter note
    Metrical(u16),
    Timecode { fps: u8, ticks_per_frame: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: Format,
    /// Number of tracks declared by the header
    pub track_count: u16,
    pub timing: Timing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiFile {
    pub header: Header,
    pub tracks: Vec<Track>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub events: Vec<TimedEvent>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TimedEvent;
    type IntoIter = std::slice::Iter<'a, TimedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An event in a track, `delta` ticks after the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedEvent {
    pub delta: u32,
    pub message: Message,
}

impl TimedEvent {
    /// The message as it would appear on the wire, always with a status byte.
    pub fn raw_bytes(&self) -> Vec<u8> {
        match &self.message {
            Message::Channel(message) => message.raw_bytes(),
            Message::Meta { meta_type, data } => {
                let mut raw = vec![0xFF, *meta_type];
                raw.extend(var_len_bytes(data.len() as u32));
                raw.extend_from_slice(data);
                raw
            }
            Message::Sysex { status, data } => {
                let mut raw = Vec::with_capacity(data.len() + 1);
                raw.push(*status);
                raw.extend_from_slice(data);
                raw
            }
        }
    }
}

/// Message kinds found in a track chunk, told apart by their first byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Channel(ChannelMessage),
    Meta { meta_type: u8, data: Vec<u8> },
    /// `status` is 0xF0 for a complete message, 0xF7 for an escape/continuation packet
    Sysex { status: u8, data: Vec<u8> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyPressure = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelPressure = 0xD,
    PitchBend = 0xE,
}

impl ChannelKind {
    fn from_status(status: u8) -> Option<Self> {
        use ChannelKind::*;
        match status >> 4 {
            0x8 => Some(NoteOff),
            0x9 => Some(NoteOn),
            0xA => Some(PolyPressure),
            0xB => Some(ControlChange),
            0xC => Some(ProgramChange),
            0xD => Some(ChannelPressure),
            0xE => Some(PitchBend),
            _ => None,
        }
    }

    /// Number of data bytes following the status byte
    pub fn data_len(self) -> usize {
        match self {
            ChannelKind::ProgramChange | ChannelKind::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// A channel voice message. For single-data-byte kinds `data2` is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMessage {
    pub kind: ChannelKind,
    pub channel: u4,
    pub data1: u7,
    pub data2: u7,
}

impl ChannelMessage {
    pub fn status(&self) -> u8 {
        ((self.kind as u8) << 4) | self.channel.as_int()
    }

    pub fn key(&self) -> u7 {
        self.data1
    }

    pub fn velocity(&self) -> u7 {
        self.data2
    }

    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut raw = vec![self.status(), self.data1.as_int()];
        if self.kind.data_len() == 2 {
            raw.push(self.data2.as_int());
        }
        raw
    }
}

/// Encodes a variable-length quantity, most significant group first.
pub fn var_len_bytes(value: u32) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push(0x80 | (rest & 0x7F) as u8);
        rest >>= 7;
    }
    groups.reverse();
    groups
}

/// Cursor over a slice that reports positions relative to the whole file.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn error(&self, kind: FormatErrorKind) -> FormatError {
        FormatError::new(self.offset(), kind)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(self.error(FormatErrorKind::Truncated));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, FormatError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, FormatError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_tag(&mut self) -> Result<[u8; 4], FormatError> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn read_var_len(&mut self) -> Result<u32, FormatError> {
        let start = self.offset();
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(FormatError::new(start, FormatErrorKind::VarLenTooLong))
    }

    fn read_data_byte(&mut self) -> Result<u7, FormatError> {
        let offset = self.offset();
        let byte = self.read_u8()?;
        check_data_byte(byte, offset)
    }

    /// Reads a chunk body of `len` bytes, returning it with its file offset.
    fn read_chunk_body(&mut self, len: u32) -> Result<(&'a [u8], usize), FormatError> {
        let available = self.remaining();
        if (len as usize) > available {
            return Err(self.error(FormatErrorKind::ChunkOverrun {
                declared: len,
                available,
            }));
        }
        let offset = self.offset();
        Ok((self.take(len as usize)?, offset))
    }
}

fn check_data_byte(byte: u8, offset: usize) -> Result<u7, FormatError> {
    if byte & 0x80 != 0 {
        return Err(FormatError::new(
            offset,
            FormatErrorKind::InvalidDataByte(byte),
        ));
    }
    Ok(u7::from(byte))
}

fn read_header(reader: &mut Reader) -> Result<Header, FormatError> {
    let tag = reader.read_tag()?;
    if tag != HEADER_TAG {
        return Err(FormatError::new(
            0,
            FormatErrorKind::BadMagic {
                expected: HEADER_TAG,
                found: tag,
            },
        ));
    }
    let len = reader.read_u32()?;
    if len < 6 {
        return Err(FormatError::new(4, FormatErrorKind::HeaderTooShort(len)));
    }
    let (body, offset) = reader.read_chunk_body(len)?;
    let mut body = Reader::new(body, offset);
    let format = match body.read_u16()? {
        0 => Format::SingleTrack,
        1 => Format::Parallel,
        2 => Format::Sequential,
        other => {
            return Err(FormatError::new(
                offset,
                FormatErrorKind::UnknownFormat(other),
            ))
        }
    };
    let track_count = body.read_u16()?;
    let division = body.read_u16()?;
    let timing = if division & 0x8000 != 0 {
        // upper byte is the negated frame rate
        Timing::Timecode {
            fps: ((division >> 8) as u8 as i8).unsigned_abs(),
            ticks_per_frame: (division & 0xFF) as u8,
        }
    } else {
        Timing::Metrical(division)
    };
    if len > 6 {
        log::debug!("ignoring {} extra header bytes", len - 6);
    }
    Ok(Header {
        format,
        track_count,
        timing,
    })
}

fn read_channel_message(
    status: u8,
    first_data: Option<u7>,
    reader: &mut Reader,
) -> Result<ChannelMessage, FormatError> {
    let kind = ChannelKind::from_status(status).ok_or_else(|| {
        reader.error(FormatErrorKind::UnexpectedStatus(status))
    })?;
    let data1 = match first_data {
        Some(data) => data,
        None => reader.read_data_byte()?,
    };
    let data2 = if kind.data_len() == 2 {
        reader.read_data_byte()?
    } else {
        u7::from(0)
    };
    Ok(ChannelMessage {
        kind,
        channel: u4::from(status & 0x0F),
        data1,
        data2,
    })
}

fn parse_track(body: &[u8], offset: usize) -> Result<Track, FormatError> {
    let mut reader = Reader::new(body, offset);
    let mut events = Vec::new();
    let mut running_status: Option<u8> = None;
    while !reader.is_empty() {
        let delta = reader.read_var_len()?;
        let status_offset = reader.offset();
        let first = reader.read_u8()?;
        let message = match first {
            0xFF => {
                let meta_type = reader.read_u8()?;
                let len = reader.read_var_len()?;
                let data = reader.take(len as usize)?.to_vec();
                Message::Meta { meta_type, data }
            }
            0xF0 | 0xF7 => {
                let len = reader.read_var_len()?;
                let data = reader.take(len as usize)?.to_vec();
                Message::Sysex {
                    status: first,
                    data,
                }
            }
            0xF1..=0xFE => {
                return Err(FormatError::new(
                    status_offset,
                    FormatErrorKind::UnexpectedStatus(first),
                ))
            }
            0x80..=0xEF => {
                running_status = Some(first);
                Message::Channel(read_channel_message(first, None, &mut reader)?)
            }
            _ => {
                let status = running_status.ok_or_else(|| {
                    FormatError::new(status_offset, FormatErrorKind::MissingStatus)
                })?;
                let data1 = check_data_byte(first, status_offset)?;
                Message::Channel(read_channel_message(status, Some(data1), &mut reader)?)
            }
        };
        events.push(TimedEvent { delta, message });
    }
    Ok(Track { events })
}

/// Decodes a complete Standard MIDI File held in memory.
///
/// Chunks with an unknown but printable tag are skipped. The whole file is
/// rejected on the first malformed byte.
pub fn parse(data: &[u8]) -> Result<MidiFile, FormatError> {
    let mut reader = Reader::new(data, 0);
    let header = read_header(&mut reader)?;
    let declared = header.track_count;
    let mut tracks = Vec::with_capacity(declared as usize);
    while tracks.len() < declared as usize {
        if reader.is_empty() {
            return Err(reader.error(FormatErrorKind::MissingTracks {
                declared,
                found: tracks.len() as u16,
            }));
        }
        let tag_offset = reader.offset();
        let tag = reader.read_tag()?;
        let len = reader.read_u32()?;
        let (body, offset) = reader.read_chunk_body(len)?;
        if tag == TRACK_TAG {
            tracks.push(parse_track(body, offset)?);
        } else if tag.iter().all(|b| b.is_ascii_graphic()) {
            log::debug!(
                "skipping unknown chunk {:?} ({} bytes) at offset {}",
                String::from_utf8_lossy(&tag),
                len,
                tag_offset
            );
        } else {
            return Err(FormatError::new(
                tag_offset,
                FormatErrorKind::BadMagic {
                    expected: TRACK_TAG,
                    found: tag,
                },
            ));
        }
    }
    if !reader.is_empty() {
        log::debug!("ignoring {} trailing bytes", reader.remaining());
    }
    Ok(MidiFile { header, tracks })
}

/// Reads and decodes the MIDI file at `path`.
pub fn load_file(path: &Path) -> Result<MidiFile> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read MIDI file {}", path.display()))?;
    let file = parse(&data)
        .with_context(|| format!("Failed to decode MIDI file {}", path.display()))?;
    log::info!(
        "{}: {:?}, {} tracks, {:?}",
        path.display(),
        file.header.format,
        file.tracks.len(),
        file.header.timing
    );
    Ok(file)
}

impl MidiFile {
    /// Iterates over `(track index, track)` pairs. Each call starts over.
    pub fn for_each_track(&self) -> impl Iterator<Item = (usize, &Track)> + Clone {
        self.tracks.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{chunk, smf_bytes, END_OF_TRACK};
    use rstest::rstest;
    use std::path::Path;

    fn only_track(data: &[u8]) -> Track {
        let mut file = parse(data).unwrap();
        assert_eq!(file.tracks.len(), 1);
        file.tracks.remove(0)
    }

    #[test]
    fn parse_header_fields() {
        let file = parse(&smf_bytes(1, 480, &[vec![], vec![]])).unwrap();
        assert_eq!(
            file.header,
            Header {
                format: Format::Parallel,
                track_count: 2,
                timing: Timing::Metrical(480),
            }
        );
        assert!(file.tracks.iter().all(Track::is_empty));
    }

    #[test]
    fn parse_timecode_division() {
        // -25 fps, 40 ticks per frame
        let file = parse(&smf_bytes(0, 0xE728, &[vec![]])).unwrap();
        assert_eq!(
            file.header.timing,
            Timing::Timecode {
                fps: 25,
                ticks_per_frame: 40
            }
        );
    }

    #[test]
    fn bad_magic_bytes() {
        let mut data = smf_bytes(0, 96, &[vec![]]);
        data[..4].copy_from_slice(b"RIFF");
        let err = parse(&data).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(
            err.kind,
            FormatErrorKind::BadMagic {
                expected: *b"MThd",
                found: *b"RIFF"
            }
        );
    }

    #[test]
    fn garbage_track_tag_is_bad_magic() {
        let mut data = smf_bytes(0, 96, &[vec![]]);
        data[14..18].copy_from_slice(&[0, 1, 2, 3]);
        let err = parse(&data).unwrap_err();
        assert_eq!(err.offset, 14);
        assert!(matches!(err.kind, FormatErrorKind::BadMagic { .. }));
    }

    #[rstest(data, case(&[]), case(b"MTh"), case(b"MThd\x00\x00"))]
    fn truncated_header(data: &[u8]) {
        let err = parse(data).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::Truncated);
    }

    #[test]
    fn short_header_chunk() {
        let data = chunk(b"MThd", &[0, 0, 0, 1]);
        let err = parse(&data).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::HeaderTooShort(4));
    }

    #[test]
    fn unknown_format() {
        let err = parse(&smf_bytes(3, 96, &[])).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::UnknownFormat(3));
        assert_eq!(err.offset, 8);
    }

    #[test]
    fn chunk_longer_than_buffer() {
        let mut data = smf_bytes(0, 96, &[END_OF_TRACK.to_vec()]);
        // declared length of the track chunk
        data[21] = 0x40;
        let err = parse(&data).unwrap_err();
        assert_eq!(err.offset, 22);
        assert_eq!(
            err.kind,
            FormatErrorKind::ChunkOverrun {
                declared: 0x40,
                available: 4
            }
        );
    }

    #[test]
    fn missing_track_chunks() {
        let mut data = smf_bytes(1, 96, &[vec![]]);
        data[11] = 3;
        let err = parse(&data).unwrap_err();
        assert_eq!(
            err.kind,
            FormatErrorKind::MissingTracks {
                declared: 3,
                found: 1
            }
        );
    }

    #[test]
    fn unknown_chunk_is_skipped() {
        let mut data = smf_bytes(0, 96, &[]);
        data[11] = 1;
        data.extend(chunk(b"XFIH", &[1, 2, 3]));
        data.extend(chunk(b"MTrk", &[0x00, 0x90, 0x3C, 0x40]));
        let file = parse(&data).unwrap();
        assert_eq!(file.tracks.len(), 1);
        assert_eq!(file.tracks[0].len(), 1);
    }

    #[test]
    fn running_status_matches_explicit_status() {
        let explicit = only_track(&smf_bytes(
            0,
            96,
            &[vec![0x00, 0x90, 0x3C, 0x40, 0x60, 0x90, 0x3E, 0x40]],
        ));
        let running = only_track(&smf_bytes(
            0,
            96,
            &[vec![0x00, 0x90, 0x3C, 0x40, 0x60, 0x3E, 0x40]],
        ));
        assert_eq!(explicit, running);
        assert_eq!(running.events[1].raw_bytes(), vec![0x90, 0x3E, 0x40]);
    }

    #[test]
    fn running_status_survives_meta_events() {
        let track = only_track(&smf_bytes(
            0,
            96,
            &[vec![
                0x00, 0x91, 0x3C, 0x40, // note on, channel 2
                0x00, 0xFF, 0x01, 0x02, b'h', b'i', // text
                0x00, 0x3C, 0x00, // running status note on
            ]],
        ));
        assert_eq!(track.len(), 3);
        match &track.events[2].message {
            Message::Channel(message) => {
                assert_eq!(message.kind, ChannelKind::NoteOn);
                assert_eq!(message.channel, u4::from(1));
                assert_eq!(message.velocity(), u7::from(0));
            }
            other => panic!("expected a channel message, got {other:?}"),
        }
    }

    #[test]
    fn data_byte_without_status() {
        let err = parse(&smf_bytes(0, 96, &[vec![0x00, 0x3C, 0x40]])).unwrap_err();
        assert_eq!(err.offset, 23);
        assert_eq!(err.kind, FormatErrorKind::MissingStatus);
    }

    #[test]
    fn status_byte_in_data_position() {
        let err = parse(&smf_bytes(0, 96, &[vec![0x00, 0x90, 0x3C, 0x90]])).unwrap_err();
        assert_eq!(err.offset, 25);
        assert_eq!(err.kind, FormatErrorKind::InvalidDataByte(0x90));
    }

    #[test]
    fn truncated_event() {
        let err = parse(&smf_bytes(0, 96, &[vec![0x00, 0x90, 0x3C]])).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::Truncated);
    }

    #[test]
    fn system_common_status_rejected() {
        let err = parse(&smf_bytes(0, 96, &[vec![0x00, 0xF2, 0x00, 0x00]])).unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::UnexpectedStatus(0xF2));
    }

    #[test]
    fn var_len_too_long() {
        let err =
            parse(&smf_bytes(0, 96, &[vec![0x81, 0x81, 0x81, 0x81, 0x00, 0x90, 0x3C, 0x40]]))
                .unwrap_err();
        assert_eq!(err.offset, 22);
        assert_eq!(err.kind, FormatErrorKind::VarLenTooLong);
    }

    #[test]
    fn single_data_byte_messages() {
        let track = only_track(&smf_bytes(0, 96, &[vec![0x00, 0xC3, 0x05, 0x00, 0x07]]));
        let kinds = track
            .iter()
            .map(|event| match &event.message {
                Message::Channel(message) => (message.kind, message.data1.as_int()),
                other => panic!("unexpected {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                (ChannelKind::ProgramChange, 5),
                (ChannelKind::ProgramChange, 7)
            ]
        );
        assert_eq!(track.events[1].raw_bytes(), vec![0xC3, 0x07]);
    }

    #[test]
    fn sysex_and_meta_raw_bytes() {
        let track = only_track(&smf_bytes(
            0,
            96,
            &[vec![0x00, 0xF0, 0x03, 0x7E, 0x7F, 0xF7, 0x00, 0xFF, 0x2F, 0x00]],
        ));
        assert_eq!(
            track.events[0].message,
            Message::Sysex {
                status: 0xF0,
                data: vec![0x7E, 0x7F, 0xF7]
            }
        );
        assert_eq!(track.events[0].raw_bytes(), vec![0xF0, 0x7E, 0x7F, 0xF7]);
        assert_eq!(track.events[1].raw_bytes(), vec![0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn long_delta_time() {
        let track = only_track(&smf_bytes(
            0,
            96,
            &[vec![0xFF, 0xFF, 0xFF, 0x7F, 0x90, 0x3C, 0x40]],
        ));
        assert_eq!(track.events[0].delta, 0x0FFF_FFFF);
    }

    #[rstest(
        value,
        expect,
        case(0, vec![0x00]),
        case(0x40, vec![0x40]),
        case(0x7F, vec![0x7F]),
        case(0x80, vec![0x81, 0x00]),
        case(480, vec![0x83, 0x60]),
        case(0x3FFF, vec![0xFF, 0x7F]),
        case(0x0FFF_FFFF, vec![0xFF, 0xFF, 0xFF, 0x7F]),
    )]
    fn test_var_len_bytes(value: u32, expect: Vec<u8>) {
        assert_eq!(var_len_bytes(value), expect);
    }

    #[test]
    fn for_each_track_is_restartable() {
        let file = parse(&smf_bytes(1, 96, &[vec![], END_OF_TRACK.to_vec()])).unwrap();
        let tracks = file.for_each_track();
        let first: Vec<_> = tracks.clone().map(|(i, t)| (i, t.len())).collect();
        let second: Vec<_> = tracks.map(|(i, t)| (i, t.len())).collect();
        assert_eq!(first, vec![(0, 0), (1, 1)]);
        assert_eq!(first, second);
        assert_eq!(file.for_each_track().count(), 2);
    }

    #[test]
    fn agrees_with_midly() {
        let data = std::fs::read(Path::new("test-asset").join("keys.mid")).unwrap();
        let ours = parse(&data).unwrap();
        let theirs = midly::Smf::parse(&data).unwrap();
        assert_eq!(ours.tracks.len(), theirs.tracks.len());
        for (track, reference) in ours.tracks.iter().zip(theirs.tracks.iter()) {
            assert_eq!(track.len(), reference.len());
            for (event, reference) in track.iter().zip(reference.iter()) {
                assert_eq!(event.delta, reference.delta.as_int());
                if let midly::TrackEventKind::Midi { channel, message } = reference.kind {
                    let mut raw = Vec::new();
                    midly::live::LiveEvent::Midi { channel, message }
                        .write_std(&mut raw)
                        .unwrap();
                    assert_eq!(event.raw_bytes(), raw);
                }
            }
        }
    }

    #[test]
    fn load_missing_file() {
        let err = load_file(Path::new("test-asset/no-such-file.mid")).unwrap_err();
        assert!(format!("{err:#}").contains("no-such-file.mid"));
    }

    #[test]
    fn load_keys_fixture() {
        let file = load_file(&Path::new("test-asset").join("keys.mid")).unwrap();
        assert_eq!(file.header.format, Format::Parallel);
        assert_eq!(file.header.timing, Timing::Metrical(480));
        assert_eq!(
            file.tracks.iter().map(Track::len).collect::<Vec<_>>(),
            vec![2, 6]
        );
        assert_eq!(file.tracks[1].events[3].delta, 480);
    }
}
