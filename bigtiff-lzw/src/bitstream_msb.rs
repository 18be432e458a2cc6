//! MSB-first bit stream reading for TIFF LZW.
//!
//! TIFF LZW packs codes from the most significant bit of each byte downwards,
//! with codes spanning byte boundaries and no alignment padding between them.

use crate::error::{LzwError, Result};

/// MSB-first bit reader over a borrowed byte slice.
///
/// The reader only tracks a byte index and a bit offset within that byte.
#[derive(Debug, Clone)]
pub struct MsbBitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Index of the byte holding the next unread bit.
    byte_pos: usize,
    /// Bits already consumed from `data[byte_pos]` (0..8).
    bit_pos: u8,
}

impl<'a> MsbBitReader<'a> {
    /// Create a reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_bit_offset(data, 0)
    }

    /// Create a reader positioned `bit_offset` bits into `data`.
    ///
    /// An offset past the end is allowed; the first read then fails.
    pub fn with_bit_offset(data: &'a [u8], bit_offset: u64) -> Self {
        let byte_pos = usize::try_from(bit_offset / 8).unwrap_or(usize::MAX);
        Self {
            data,
            byte_pos,
            bit_pos: (bit_offset % 8) as u8,
        }
    }

    /// Read a `count`-bit unsigned value (1..=16 bits), MSB-first.
    ///
    /// On failure the cursor does not move.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        if count == 0 || count > 16 {
            return Err(LzwError::InvalidParameter("code width must be 1..=16 bits"));
        }
        if self.bits_remaining() < u64::from(count) {
            return Err(LzwError::UnexpectedEndOfStream {
                bit_position: self.bits_read(),
            });
        }

        let span = (usize::from(self.bit_pos) + usize::from(count)).div_ceil(8);
        let window = self
            .data
            .get(self.byte_pos..self.byte_pos + span)
            .ok_or(LzwError::UnexpectedEndOfStream {
                bit_position: self.bits_read(),
            })?;

        // At most 3 bytes: 7 leading consumed bits + 16 code bits.
        let acc = window
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
        let shift = span * 8 - usize::from(self.bit_pos) - usize::from(count);
        let mask = (1u32 << count) - 1;
        let value = (acc >> shift) & mask;

        let advanced = usize::from(self.bit_pos) + usize::from(count);
        self.byte_pos += advanced / 8;
        self.bit_pos = (advanced % 8) as u8;

        Ok(value as u16)
    }

    /// Get total bits read, counting from the start of the buffer.
    pub fn bits_read(&self) -> u64 {
        (self.byte_pos as u64)
            .saturating_mul(8)
            .saturating_add(u64::from(self.bit_pos))
    }

    /// Bits left before the end of the buffer.
    pub fn bits_remaining(&self) -> u64 {
        (self.data.len() as u64 * 8).saturating_sub(self.bits_read())
    }
}

/// MSB-first bit writer used to hand-assemble code streams in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MsbBitWriter {
    output: Vec<u8>,
    buffer: u32,
    bits_in_buffer: u8,
}

#[cfg(test)]
impl MsbBitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_bits(&mut self, value: u16, count: u8) {
        self.buffer = (self.buffer << count) | (u32::from(value) & ((1u32 << count) - 1));
        self.bits_in_buffer += count;
        while self.bits_in_buffer >= 8 {
            self.output
                .push((self.buffer >> (self.bits_in_buffer - 8)) as u8);
            self.bits_in_buffer -= 8;
        }
    }

    pub(crate) fn into_vec(mut self) -> Vec<u8> {
        if self.bits_in_buffer > 0 {
            let pad = 8 - self.bits_in_buffer;
            self.output.push((self.buffer << pad) as u8);
        }
        self.output
    }
}
