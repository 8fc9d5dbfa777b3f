use bytes::Buf;

pub const SIZEOF_U32: usize = std::mem::size_of::<u32>();

/// Bounds-checked cursor over a borrowed buffer. All integers are big-endian.
///
/// Every `take_*` returns `None` instead of reading past the end, so the
/// decoders can turn a short buffer into an error at the exact field.
pub struct Reader<'a> {
    buf: &'a [u8],
    start: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            start: buf.len(),
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.start - self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn take_u8(&mut self) -> Option<u8> {
        if self.buf.remaining() < 1 {
            return None;
        }
        Some(self.buf.get_u8())
    }

    pub fn take_u32(&mut self) -> Option<u32> {
        if self.buf.remaining() < SIZEOF_U32 {
            return None;
        }
        Some(self.buf.get_u32())
    }

    pub fn take_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.buf.remaining() < len {
            return None;
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Some(head)
    }
}

/// Strip the trailing NUL of a length-prefixed C string. `None` when the
/// field is empty or does not end in a terminator.
pub fn strip_terminator(raw: &[u8]) -> Option<&[u8]> {
    match raw.split_last() {
        Some((0, body)) => Some(body),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_stops_at_end() {
        let data = [0u8, 0, 0, 7, 9];
        let mut r = Reader::new(&data);
        assert_eq!(r.take_u32(), Some(7));
        assert_eq!(r.offset(), 4);
        assert_eq!(r.take_u32(), None);
        assert_eq!(r.take_slice(2), None);
        assert_eq!(r.take_u8(), Some(9));
        assert_eq!(r.take_u8(), None);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn terminator() {
        assert_eq!(strip_terminator(b"abc\0"), Some(&b"abc"[..]));
        assert_eq!(strip_terminator(b"\0"), Some(&b""[..]));
        assert_eq!(strip_terminator(b"abc"), None);
        assert_eq!(strip_terminator(b""), None);
    }
}
