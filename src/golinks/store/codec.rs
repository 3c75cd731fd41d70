//! Log frame encoding for [`super::fs::FileStore`].
//!
//! ## Frame Format
//!
//! ```text
//! [length: u32][kind: u8][key_len: u32][key][value][crc32: u32]
//! ```
//!
//! - **length**: size of everything after the length field itself
//! - **kind**: 1 = put, 2 = delete (delete frames carry no value)
//! - **crc32**: checksum over kind, key_len, key and value
//!
//! All integers are little-endian.

use crate::error::{GolinksError, Result};
use crc32fast::Hasher;

const KIND_PUT: u8 = 1;
const KIND_DELETE: u8 = 2;

const LEN_SIZE: usize = 4;
const KIND_SIZE: usize = 1;
const KEY_LEN_SIZE: usize = 4;
const CRC_SIZE: usize = 4;
const MIN_BODY: usize = KIND_SIZE + KEY_LEN_SIZE + CRC_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Outcome of decoding at a given position in the log.
#[derive(Debug)]
pub enum Decoded {
    /// A complete, valid frame and the number of bytes it used.
    Frame(Frame, usize),
    /// The buffer ends before the frame does (torn write).
    Incomplete,
}

pub fn encode_put(key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    encode(KIND_PUT, key, value)
}

pub fn encode_delete(key: &[u8]) -> Result<Vec<u8>> {
    encode(KIND_DELETE, key, &[])
}

/// Frame length field for a record, if it fits in the `u32` header.
fn body_len(key_len: usize, value_len: usize) -> Result<u32> {
    let len = key_len
        .checked_add(value_len)
        .and_then(|n| n.checked_add(MIN_BODY))
        .ok_or(GolinksError::RecordTooLarge(usize::MAX))?;
    u32::try_from(len).map_err(|_| GolinksError::RecordTooLarge(len))
}

fn encode(kind: u8, key: &[u8], value: &[u8]) -> Result<Vec<u8>> {
    let body_len = body_len(key.len(), value.len())?;
    let key_len = key.len() as u32;
    let mut buf = Vec::with_capacity(LEN_SIZE + body_len as usize);

    buf.extend_from_slice(&body_len.to_le_bytes());
    let checked_start = buf.len();
    buf.push(kind);
    buf.extend_from_slice(&key_len.to_le_bytes());
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);

    let mut hasher = Hasher::new();
    hasher.update(&buf[checked_start..]);
    buf.extend_from_slice(&hasher.finalize().to_le_bytes());
    Ok(buf)
}

/// Decode the frame starting at the beginning of `buf`.
///
/// `offset` is the position of `buf` within the log and is only used for
/// error reporting.
pub fn decode(buf: &[u8], offset: u64) -> Result<Decoded> {
    if buf.len() < LEN_SIZE {
        return Ok(Decoded::Incomplete);
    }
    let body_len = read_u32(&buf[..LEN_SIZE]) as usize;
    if body_len < MIN_BODY {
        return Err(corruption(offset, format!("frame length {} too small", body_len)));
    }
    let total = LEN_SIZE + body_len;
    if buf.len() < total {
        return Ok(Decoded::Incomplete);
    }

    let body = &buf[LEN_SIZE..total];
    let (checked, crc_bytes) = body.split_at(body.len() - CRC_SIZE);
    let expected = read_u32(crc_bytes);
    let actual = crc32fast::hash(checked);
    if expected != actual {
        return Err(corruption(
            offset,
            format!("crc mismatch (expected {:08x}, got {:08x})", expected, actual),
        ));
    }

    let kind = checked[0];
    let key_len = read_u32(&checked[KIND_SIZE..KIND_SIZE + KEY_LEN_SIZE]) as usize;
    let payload = &checked[KIND_SIZE + KEY_LEN_SIZE..];
    if key_len > payload.len() {
        return Err(corruption(offset, format!("key length {} overruns frame", key_len)));
    }
    let (key, value) = payload.split_at(key_len);

    let frame = match kind {
        KIND_PUT => Frame::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        },
        KIND_DELETE if value.is_empty() => Frame::Delete { key: key.to_vec() },
        KIND_DELETE => return Err(corruption(offset, "delete frame carries a value".into())),
        other => return Err(corruption(offset, format!("unknown frame kind {}", other))),
    };
    Ok(Decoded::Frame(frame, total))
}

/// Total size of the frame starting at `buf` as declared by its length
/// field, or `None` if the length field itself is cut off.
pub fn declared_len(buf: &[u8]) -> Option<usize> {
    if buf.len() < LEN_SIZE {
        return None;
    }
    Some(LEN_SIZE + read_u32(&buf[..LEN_SIZE]) as usize)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(raw)
}

fn corruption(offset: u64, reason: String) -> GolinksError {
    GolinksError::Corruption { offset, reason }
}
