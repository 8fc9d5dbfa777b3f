mod value;

use bytes::{Buf, BufMut, Bytes};
use thiserror::Error;

pub use value::{Value, ValueType};

use crate::wire::{strip_terminator, Reader, SIZEOF_U32};

/// Per-entry header: type (1B) + key_length (4B) + data_length (4B).
pub const ENTRY_HEADER_SIZE: usize = 1 + SIZEOF_U32 * 2;

/// A self-describing, ordered list of typed key/value entries.
/*
map layout (all integers big-endian):
| total_length (4B) | entry | entry | ... |

total_length counts the whole buffer, itself included.

entry layout:
| type (1B) | key_length (4B) | data_length (4B) | key\0 | value |

key_length includes the NUL. Strings carry their NUL inside data_length,
blobs are raw, numbers are written at their natural width.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Map {
    entries: Vec<Entry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: Value,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Key length on the wire, NUL included.
    pub fn key_length(&self) -> usize {
        self.key.len() + 1
    }

    pub fn data_length(&self) -> usize {
        self.value.data_length()
    }

    fn encoded_len(&self) -> usize {
        ENTRY_HEADER_SIZE + self.key_length() + self.data_length()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmapError {
    #[error("truncated {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },
    #[error("unknown entry type {0}")]
    UnknownType(u8),
    #[error("{ty:?} entry has {len} bytes of data")]
    BadLength { ty: ValueType, len: usize },
    #[error("total length {0} is smaller than its own header")]
    BadTotalLength(usize),
    #[error("missing NUL terminator")]
    MissingTerminator,
    #[error("invalid utf-8 in key or string")]
    InvalidUtf8,
    #[error("map does not fit in a 32-bit length")]
    TooLarge,
}

pub type Result<T> = std::result::Result<T, SmapError>;

// Generates put/get/find for the inline types. `get_*` falls back to the
// zero value, `find_*` tells absence apart from a stored zero.
macro_rules! scalar_accessors {
    ($($put:ident, $get:ident, $find:ident => $variant:ident($ty:ty);)*) => {
        $(
            pub fn $put(&mut self, key: &str, value: $ty) {
                self.push(key, Value::$variant(value));
            }

            pub fn $find(&self, key: &str) -> Option<$ty> {
                self.entries.iter().find_map(|e| match e.value {
                    Value::$variant(v) if e.key == key => Some(v),
                    _ => None,
                })
            }

            pub fn $get(&self, key: &str) -> $ty {
                self.$find(key).unwrap_or_default()
            }
        )*
    };
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Append an entry. Existing entries with the same key are kept and
    /// shadow this one on lookup.
    pub fn push(&mut self, key: &str, value: Value) {
        self.entries.push(Entry {
            key: key.to_owned(),
            value,
        });
    }

    /// First entry under `key`, whatever its type.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    scalar_accessors! {
        put_bool, get_bool, find_bool => Bool(bool);
        put_char, get_char, find_char => Char(i8);
        put_byte, get_byte, find_byte => Byte(u8);
        put_i16, get_i16, find_i16 => I16(i16);
        put_u16, get_u16, find_u16 => U16(u16);
        put_i32, get_i32, find_i32 => I32(i32);
        put_u32, get_u32, find_u32 => U32(u32);
    }

    pub fn put_str(&mut self, key: &str, value: &str) {
        self.push(key, Value::Str(value.to_owned()));
    }

    pub fn put_blob(&mut self, key: &str, value: &[u8]) {
        self.push(key, Value::Blob(Bytes::copy_from_slice(value)));
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match &e.value {
            Value::Str(s) if e.key == key => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn get_blob(&self, key: &str) -> Option<&[u8]> {
        self.entries.iter().find_map(|e| match &e.value {
            Value::Blob(b) if e.key == key => Some(&b[..]),
            _ => None,
        })
    }

    /// Size of the buffer `to_bytes` would produce.
    pub fn encoded_len(&self) -> usize {
        SIZEOF_U32 + self.entries.iter().map(Entry::encoded_len).sum::<usize>()
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        let total = self.encoded_len();
        let total_u32 = u32::try_from(total).map_err(|_| SmapError::TooLarge)?;

        let mut buf = Vec::with_capacity(total);
        buf.put_u32(total_u32);
        for entry in &self.entries {
            // both fit: each is bounded by total
            buf.put_u8(entry.value_type().tag());
            buf.put_u32(entry.key_length() as u32);
            buf.put_u32(entry.data_length() as u32);
            buf.put_slice(entry.key.as_bytes());
            buf.put_u8(0);
            entry.value.encode(&mut buf);
        }
        debug_assert_eq!(buf.len(), total);
        Ok(buf.into())
    }

    /// Rebuild a map from `to_bytes` output. Bytes past `total_length` are
    /// ignored; a buffer shorter than `total_length` is an error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut header = Reader::new(data);
        let total = header.take_u32().ok_or(SmapError::Truncated {
            what: "total length",
            offset: 0,
        })? as usize;
        if total < SIZEOF_U32 {
            return Err(SmapError::BadTotalLength(total));
        }
        let body = data.get(..total).ok_or(SmapError::Truncated {
            what: "map",
            offset: data.len(),
        })?;

        let mut r = Reader::new(body);
        let _ = r.take_u32();

        let mut map = Map::new();
        while r.remaining() > 0 {
            map.entries.push(decode_entry(&mut r)?);
        }
        Ok(map)
    }
}

fn truncated(what: &'static str, r: &Reader<'_>) -> SmapError {
    SmapError::Truncated {
        what,
        offset: r.offset(),
    }
}

fn decode_entry(r: &mut Reader<'_>) -> Result<Entry> {
    let tag = r.take_u8().ok_or_else(|| truncated("entry type", r))?;
    let ty = ValueType::from_tag(tag).ok_or(SmapError::UnknownType(tag))?;
    let key_len = r.take_u32().ok_or_else(|| truncated("key length", r))? as usize;
    let data_len = r.take_u32().ok_or_else(|| truncated("data length", r))? as usize;
    let key = r.take_slice(key_len).ok_or_else(|| truncated("key", r))?;
    let data = r.take_slice(data_len).ok_or_else(|| truncated("value", r))?;

    let key = decode_str(key)?;
    let value = decode_value(ty, data)?;
    Ok(Entry { key, value })
}

fn decode_str(raw: &[u8]) -> Result<String> {
    let body = strip_terminator(raw).ok_or(SmapError::MissingTerminator)?;
    String::from_utf8(body.to_vec()).map_err(|_| SmapError::InvalidUtf8)
}

fn decode_value(ty: ValueType, data: &[u8]) -> Result<Value> {
    if let Some(width) = ty.fixed_width() {
        if data.len() != width {
            return Err(SmapError::BadLength {
                ty,
                len: data.len(),
            });
        }
    }

    let mut d = data;
    let value = match ty {
        ValueType::Bool => Value::Bool(d.get_u8() != 0),
        ValueType::Char => Value::Char(d.get_i8()),
        ValueType::Byte => Value::Byte(d.get_u8()),
        ValueType::I16 => Value::I16(d.get_i16()),
        ValueType::U16 => Value::U16(d.get_u16()),
        ValueType::I32 => Value::I32(d.get_i32()),
        ValueType::U32 => Value::U32(d.get_u32()),
        ValueType::Str => Value::Str(decode_str(data)?),
        ValueType::Blob => Value::Blob(Bytes::copy_from_slice(data)),
    };
    Ok(value)
}
