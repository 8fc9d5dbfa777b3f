use bytes::{BufMut, Bytes};

/// Wire tag of an entry. `0` is reserved and never written.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Bool = 1,
    Char = 2,
    Byte = 3,
    I16 = 4,
    U16 = 5,
    I32 = 6,
    U32 = 7,
    Str = 8,
    Blob = 9,
}

impl ValueType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        let ty = match tag {
            1 => Self::Bool,
            2 => Self::Char,
            3 => Self::Byte,
            4 => Self::I16,
            5 => Self::U16,
            6 => Self::I32,
            7 => Self::U32,
            8 => Self::Str,
            9 => Self::Blob,
            _ => return None,
        };
        Some(ty)
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Payload width for fixed-width types, `None` for strings and blobs.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::Byte => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 => Some(4),
            Self::Str | Self::Blob => None,
        }
    }
}

/// The payload of one map entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Char(i8),
    Byte(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    /// Stored on the wire with a trailing NUL.
    Str(String),
    Blob(Bytes),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Char,
            Value::Byte(_) => ValueType::Byte,
            Value::I16(_) => ValueType::I16,
            Value::U16(_) => ValueType::U16,
            Value::I32(_) => ValueType::I32,
            Value::U32(_) => ValueType::U32,
            Value::Str(_) => ValueType::Str,
            Value::Blob(_) => ValueType::Blob,
        }
    }

    /// Length of the payload as written, terminator included for strings.
    pub fn data_length(&self) -> usize {
        match self {
            Value::Str(s) => s.len() + 1,
            Value::Blob(b) => b.len(),
            other => other.value_type().fixed_width().unwrap_or(0),
        }
    }

    pub(super) fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Bool(v) => buf.put_u8(u8::from(*v)),
            Value::Char(v) => buf.put_i8(*v),
            Value::Byte(v) => buf.put_u8(*v),
            Value::I16(v) => buf.put_i16(*v),
            Value::U16(v) => buf.put_u16(*v),
            Value::I32(v) => buf.put_i32(*v),
            Value::U32(v) => buf.put_u32(*v),
            Value::Str(s) => {
                buf.put_slice(s.as_bytes());
                buf.put_u8(0);
            }
            Value::Blob(b) => buf.put_slice(b),
        }
    }
}
