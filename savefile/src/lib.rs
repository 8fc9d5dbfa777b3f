//! Save-file persistence core: a typed key/value codec (`smap`), a
//! block-structured container (`blockfile`) and the LZF byte compressor.
//!
//! The usual flow is map -> `Map::to_bytes` -> one record in a named
//! block -> `Blockfile::save`, and the reverse on load. Nothing here
//! knows what the stored bytes mean.

pub mod blockfile;
pub mod lzf;
pub mod smap;

mod wire;

pub use blockfile::{Block, Blockfile, BlockfileError, BlockfileOptions, Format, Mode};
pub use smap::{Entry, Map, SmapError, Value, ValueType};
