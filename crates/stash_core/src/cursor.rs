use crate::error::{Result, StashError};

/// Bounds-checked little-endian reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array::<4>("i32").map(i32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_array::<8>("f64").map(f64::from_le_bytes)
    }

    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(what, N)?);
        Ok(out)
    }

    pub fn read_bytes(&mut self, what: &'static str, n: usize) -> Result<&'a [u8]> {
        self.take(what, n)
    }

    /// Reads an i32 byte length followed by that many UTF-8 bytes.
    pub fn read_string(&mut self, what: &'static str) -> Result<String> {
        let declared = self.read_i32()?;
        let len = usize::try_from(declared)
            .map_err(|_| StashError::truncated(what, 0, self.remaining()))?;
        let bytes = self.take(what, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|source| StashError::InvalidText { what, source })
    }

    pub fn skip(&mut self, what: &'static str, n: usize) -> Result<()> {
        self.take(what, n).map(|_| ())
    }

    fn take(&mut self, what: &'static str, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(StashError::truncated(what, n, available));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }
}

/// Append-only little-endian writer with an optional fixed capacity.
///
/// A write that would exceed the capacity fails with
/// [`StashError::BufferOverflow`] and leaves the buffer unchanged.
#[derive(Debug, Clone)]
pub struct ByteSink {
    what: &'static str,
    buf: Vec<u8>,
    capacity: Option<usize>,
}

impl ByteSink {
    pub fn unbounded(what: &'static str) -> Self {
        Self {
            what,
            buf: Vec::new(),
            capacity: None,
        }
    }

    pub fn with_capacity_limit(what: &'static str, capacity: usize) -> Self {
        Self {
            what,
            buf: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub(crate) fn new(what: &'static str, capacity: Option<usize>) -> Self {
        match capacity {
            Some(limit) => Self::with_capacity_limit(what, limit),
            None => Self::unbounded(what),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let required = self.buf.len() + bytes.len();
        if let Some(capacity) = self.capacity
            && required > capacity
        {
            return Err(StashError::BufferOverflow {
                what: self.what,
                capacity,
                required,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        let len = i32::try_from(bytes.len()).map_err(|_| StashError::BufferOverflow {
            what: self.what,
            capacity: i32::MAX as usize,
            required: bytes.len(),
        })?;
        self.write_i32(len)?;
        self.write_bytes(bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteCursor, ByteSink};
    use crate::error::StashError;

    #[test]
    fn reads_little_endian_fields_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        bytes.extend_from_slice(&2.5f64.to_le_bytes());
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend_from_slice(b"abc");

        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_i32().unwrap(), -7);
        assert_eq!(cursor.read_f64().unwrap(), 2.5);
        assert_eq!(cursor.read_string("name").unwrap(), "abc");
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn short_read_reports_needed_and_available() {
        let bytes = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&bytes);
        let err = cursor.read_i32().unwrap_err();
        assert!(matches!(
            err,
            StashError::TruncatedData {
                needed: 4,
                available: 3,
                ..
            }
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn negative_string_length_is_truncation() {
        let bytes = (-1i32).to_le_bytes();
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_string("name"),
            Err(StashError::TruncatedData { what: "name", .. })
        ));
    }

    #[test]
    fn oversized_string_length_is_truncation() {
        let mut bytes = 10i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_string("value"),
            Err(StashError::TruncatedData {
                needed: 10,
                available: 5,
                ..
            })
        ));
    }

    #[test]
    fn invalid_utf8_string_is_rejected() {
        let mut bytes = 2i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_string("name"),
            Err(StashError::InvalidText { what: "name", .. })
        ));
    }

    #[test]
    fn sink_writes_length_prefixed_strings() {
        let mut sink = ByteSink::unbounded("test");
        sink.write_string("hé").unwrap();
        assert_eq!(sink.into_bytes(), vec![3, 0, 0, 0, b'h', 0xc3, 0xa9]);
    }

    #[test]
    fn sink_rejects_write_past_capacity_without_partial_data() {
        let mut sink = ByteSink::with_capacity_limit("item", 6);
        sink.write_i32(1).unwrap();
        let err = sink.write_i32(2).unwrap_err();
        assert!(matches!(
            err,
            StashError::BufferOverflow {
                what: "item",
                capacity: 6,
                required: 8,
            }
        ));
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn sink_accepts_write_filling_capacity_exactly() {
        let mut sink = ByteSink::with_capacity_limit("item", 8);
        sink.write_f64(1.0).unwrap();
        assert_eq!(sink.len(), 8);
    }
}
