use crate::smf::var_len_bytes;

pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Wraps `body` in a chunk with the given tag and a big-endian length.
pub fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut data = tag.to_vec();
    data.extend((body.len() as u32).to_be_bytes());
    data.extend_from_slice(body);
    data
}

/// Builds a complete file: a header declaring `tracks.len()` tracks, then
/// one `MTrk` chunk per track body.
pub fn smf_bytes(format: u16, division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut header = Vec::with_capacity(6);
    header.extend(format.to_be_bytes());
    header.extend((tracks.len() as u16).to_be_bytes());
    header.extend(division.to_be_bytes());
    let mut data = chunk(b"MThd", &header);
    for body in tracks {
        data.extend(chunk(b"MTrk", body));
    }
    data
}

/// A track body with a note-on/note-off pair per key, every status byte
/// written out, terminated by an end-of-track event.
pub fn note_pairs_track(keys: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for &key in keys {
        body.extend([0x00, 0x90, key, 0x40]);
        body.extend(var_len_bytes(96));
        body.extend([0x80, key, 0x40]);
    }
    body.extend(END_OF_TRACK);
    body
}
