use bytes::Bytes;

/// A named, ordered list of records with its own read cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    name: String,
    records: Vec<Bytes>,
    /// Index of the record `next_record` returns next.
    cursor: usize,
}

impl Block {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            records: Vec::new(),
            cursor: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name length on disk, NUL included.
    pub fn name_length(&self) -> usize {
        self.name.len() + 1
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Append a copy of `data` as a new record.
    pub fn create_record(&mut self, data: &[u8]) {
        self.records.push(Bytes::copy_from_slice(data));
    }

    pub(crate) fn push_record(&mut self, data: Bytes) {
        self.records.push(data);
    }

    /// Return the record under the cursor and advance. `None` once the
    /// block is exhausted; the cursor then stays put.
    pub fn next_record(&mut self) -> Option<&[u8]> {
        let record = self.records.get(self.cursor)?;
        self.cursor += 1;
        Some(record)
    }

    pub fn rewind_record(&mut self) {
        self.cursor = 0;
    }

    /// All records in insertion order, independent of the cursor.
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        self.records.iter().map(|r| &r[..])
    }

    /// Sum of record lengths. Headers are not counted.
    pub fn block_size(&self) -> usize {
        self.records.iter().map(Bytes::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cursor() {
        let mut block = Block::new("alpha");
        block.create_record(b"one");
        block.create_record(b"three");

        assert_eq!(block.name_length(), 6);
        assert_eq!(block.record_count(), 2);
        assert_eq!(block.block_size(), 8);

        assert_eq!(block.next_record(), Some(&b"one"[..]));
        assert_eq!(block.next_record(), Some(&b"three"[..]));
        assert_eq!(block.next_record(), None);
        assert_eq!(block.next_record(), None);

        block.rewind_record();
        assert_eq!(block.next_record(), Some(&b"one"[..]));
        assert_eq!(block.records().count(), 2);
    }

    #[test]
    fn test_record_is_copied() {
        let mut data = vec![1u8, 2, 3];
        let mut block = Block::new("b");
        block.create_record(&data);
        data[0] = 9;
        assert_eq!(block.next_record(), Some(&[1u8, 2, 3][..]));
    }
}
