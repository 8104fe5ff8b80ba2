use crate::error::ParseError;

/// Cursor reading big-endian bit fields out of a byte slice, most significant bit first.
#[derive(Debug)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    /// Position of the next unread bit.
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Total input size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes that have not been (fully) read yet.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.position.div_ceil(8)
    }

    /// Reads the next `count` bits (at most 32) as an unsigned big-endian value.
    pub fn read_bits(&mut self, count: usize) -> Result<u32, ParseError> {
        debug_assert!(count <= 32);
        if self.position + count > self.data.len() * 8 {
            return Err(ParseError::Truncated);
        }

        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            self.position += 1;
        }

        Ok(value)
    }

    /// Reads the next `count` bits as a two's complement signed value.
    pub fn read_signed(&mut self, count: usize) -> Result<i32, ParseError> {
        debug_assert!((1..=32).contains(&count));
        let value = self.read_bits(count)?;
        let shift = 32 - count;
        Ok(((value << shift) as i32) >> shift)
    }

    pub fn read_byte(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_bits(8)? as u8)
    }
}
