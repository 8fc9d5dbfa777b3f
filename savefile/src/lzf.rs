//! LZF, a small LZ77 compressor.
//!
//! The compressed stream is a sequence of control bytes:
//!
//! ```text
//! 000LLLLL <L+1 literal bytes>              literal run, 1..=32 bytes
//! LLLooooo oooooooo                         back reference, L in 1..=6
//! 111ooooo LLLLLLLL oooooooo                back reference, 7 + L
//! ```
//!
//! A back reference copies `len + 2` bytes starting `offset + 1` bytes
//! behind the current output position. The stream carries no length or
//! "is compressed" flag; callers keep track of both.

mod compress;
mod decompress;

use thiserror::Error;

pub use compress::compress;
pub use decompress::decompress;

/// log2 of the match finder's hash table size.
pub const HLOG: u32 = 16;
pub const HSIZE: usize = 1 << HLOG;

/// Longest literal run one control byte can describe.
pub const MAX_LIT: usize = 1 << 5;
/// Farthest a back reference can reach.
pub const MAX_OFF: usize = 1 << 13;
/// Longest back reference.
pub const MAX_REF: usize = (1 << 8) + (1 << 3);

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LzfError {
    #[error("output buffer too small")]
    OutputTooSmall,
    #[error("compressed stream ends inside a control sequence")]
    Truncated,
    #[error("back reference points before the start of the output")]
    BadBackReference,
}

pub type Result<T> = std::result::Result<T, LzfError>;

/// Compress into a fresh buffer of at most `capacity` bytes.
///
/// `OutputTooSmall` means the data did not shrink enough; store it raw.
pub fn compress_to_vec(input: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; capacity];
    let n = compress(input, &mut out)?;
    out.truncate(n);
    Ok(out)
}

/// Decompress into a fresh buffer. `capacity` is usually the length the
/// caller recorded before compressing.
pub fn decompress_to_vec(input: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; capacity];
    let n = decompress(input, &mut out)?;
    out.truncate(n);
    Ok(out)
}

#[cfg(test)]
mod lzf_test;
