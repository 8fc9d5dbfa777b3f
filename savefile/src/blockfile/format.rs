//! On-disk layout of a block file and its in-memory encode/decode.
//!
//! ```text
//! [magic (4B) | version (4B)]          only with Format::Versioned
//! block_count (4B)
//! per block:
//!     name_length (4B) | name\0 | record_count (4B)
//!     per record:
//!         record_length (4B) | record bytes
//! ```
//!
//! All integers are big-endian. The legacy layout has no header at all.

use bytes::{BufMut, Bytes};
use log::{trace, warn};

use super::{Block, BlockfileError, Result};
use crate::wire::{strip_terminator, Reader, SIZEOF_U32};

/// "BLKF"
pub const BLOCKFILE_MAGIC: u32 = 0x424C_4B46;

/// Newest version this crate writes and reads.
pub const BLOCKFILE_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Bare block list, no magic or version.
    #[default]
    Legacy,
    /// Block list preceded by `BLOCKFILE_MAGIC` and `BLOCKFILE_VERSION`.
    Versioned,
}

impl Format {
    fn header_len(self) -> usize {
        match self {
            Format::Legacy => 0,
            Format::Versioned => SIZEOF_U32 * 2,
        }
    }
}

fn to_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| BlockfileError::TooLarge)
}

/// Exact size of the image `encode_blocks` produces.
pub fn encoded_len(blocks: &[Block], format: Format) -> usize {
    let body: usize = blocks
        .iter()
        .map(|b| {
            SIZEOF_U32 * 2
                + b.name_length()
                + b.record_count() * SIZEOF_U32
                + b.block_size()
        })
        .sum();
    format.header_len() + SIZEOF_U32 + body
}

pub fn encode_blocks(blocks: &[Block], format: Format) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(encoded_len(blocks, format));
    if format == Format::Versioned {
        buf.put_u32(BLOCKFILE_MAGIC);
        buf.put_u32(BLOCKFILE_VERSION);
    }

    buf.put_u32(to_u32(blocks.len())?);
    for block in blocks {
        buf.put_u32(to_u32(block.name_length())?);
        buf.put_slice(block.name().as_bytes());
        buf.put_u8(0);
        buf.put_u32(to_u32(block.record_count())?);
        for record in block.records() {
            buf.put_u32(to_u32(record.len())?);
            buf.put_slice(record);
        }
    }
    Ok(buf.into())
}

fn truncated(what: &'static str, r: &Reader<'_>) -> BlockfileError {
    let err = BlockfileError::Truncated {
        what,
        offset: r.offset(),
    };
    warn!("block file is corrupt: {err}");
    err
}

/// Parse a whole image. Every length is checked against the bytes left
/// before it is used, so a corrupt count fails instead of allocating.
pub fn decode_blocks(data: &[u8], format: Format) -> Result<Vec<Block>> {
    let mut r = Reader::new(data);

    if format == Format::Versioned {
        let magic = r.take_u32().ok_or_else(|| truncated("magic", &r))?;
        if magic != BLOCKFILE_MAGIC {
            return Err(BlockfileError::BadMagic(magic));
        }
        let version = r.take_u32().ok_or_else(|| truncated("version", &r))?;
        if version == 0 || version > BLOCKFILE_VERSION {
            return Err(BlockfileError::UnsupportedVersion(version));
        }
    }

    let block_count = r.take_u32().ok_or_else(|| truncated("block count", &r))? as usize;
    // every block needs at least its two length fields
    let mut blocks = Vec::with_capacity(block_count.min(r.remaining() / (SIZEOF_U32 * 2)));

    for _ in 0..block_count {
        let name_len = r.take_u32().ok_or_else(|| truncated("name length", &r))? as usize;
        let raw_name = r.take_slice(name_len).ok_or_else(|| truncated("name", &r))?;
        let name = strip_terminator(raw_name).ok_or(BlockfileError::MissingTerminator)?;
        let name = std::str::from_utf8(name).map_err(|_| BlockfileError::InvalidUtf8)?;

        let record_count =
            r.take_u32().ok_or_else(|| truncated("record count", &r))? as usize;
        let mut block = Block::new(name);
        for _ in 0..record_count {
            let len = r
                .take_u32()
                .ok_or_else(|| truncated("record length", &r))? as usize;
            let data = r.take_slice(len).ok_or_else(|| truncated("record", &r))?;
            block.push_record(Bytes::copy_from_slice(data));
        }

        trace!(
            "loaded block {:?}: {} records, {} bytes",
            block.name(),
            block.record_count(),
            block.block_size()
        );
        blocks.push(block);
    }

    if r.remaining() > 0 {
        return Err(BlockfileError::TrailingBytes(r.remaining()));
    }
    Ok(blocks)
}
