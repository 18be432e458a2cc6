//! Reference TIFF LZW encoder for tests and benchmarks.
//!
//! Follows libtiff's discipline: a leading CLEAR, early change on the encoder
//! side (width grows once next_code passes 2^bits - 1), a CLEAR as soon as
//! next_code reaches 4094, and a closing END code.

#![allow(dead_code)]

use std::collections::HashMap;

pub const CLEAR: u16 = 256;
pub const EOI: u16 = 257;
const FIRST: u16 = 258;
const TABLE_FULL: u16 = 4094;

/// MSB-first code packer.
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: Vec<u8>,
    buffer: u32,
    bits_in_buffer: u8,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, code: u16, width: u8) {
        self.buffer = (self.buffer << width) | (u32::from(code) & ((1 << width) - 1));
        self.bits_in_buffer += width;
        while self.bits_in_buffer >= 8 {
            self.output.push((self.buffer >> (self.bits_in_buffer - 8)) as u8);
            self.bits_in_buffer -= 8;
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_buffer > 0 {
            let pad = 8 - self.bits_in_buffer;
            self.output.push((self.buffer << pad) as u8);
        }
        self.output
    }
}

/// Pack `(code, width)` pairs.
pub fn pack(codes: &[(u16, u8)]) -> Vec<u8> {
    let mut writer = CodeWriter::new();
    for &(code, width) in codes {
        writer.write(code, width);
    }
    writer.finish()
}

struct EncoderTable {
    map: HashMap<(u16, u8), u16>,
    next_code: u16,
    bits: u8,
    early_change: bool,
}

impl EncoderTable {
    fn new(early_change: bool) -> Self {
        Self {
            map: HashMap::new(),
            next_code: FIRST,
            bits: 9,
            early_change,
        }
    }

    fn reset(&mut self) {
        self.map.clear();
        self.next_code = FIRST;
        self.bits = 9;
    }

    fn add(&mut self, prefix: u16, byte: u8) {
        self.map.insert((prefix, byte), self.next_code);
        self.next_code += 1;
        let threshold = if self.early_change {
            (1u16 << self.bits) - 1
        } else {
            1u16 << self.bits
        };
        if self.bits < 12 && self.next_code > threshold {
            self.bits += 1;
        }
    }
}

/// Encode with TIFF early change.
pub fn encode_tiff(input: &[u8]) -> Vec<u8> {
    encode(input, true, true)
}

/// Encode with widths switching at 512/1024/2048.
pub fn encode_compat(input: &[u8]) -> Vec<u8> {
    encode(input, false, true)
}

/// Encode with TIFF early change but stop before the END code.
pub fn encode_tiff_unterminated(input: &[u8]) -> Vec<u8> {
    encode(input, true, false)
}

fn encode(input: &[u8], early_change: bool, terminate: bool) -> Vec<u8> {
    let mut writer = CodeWriter::new();
    let mut table = EncoderTable::new(early_change);
    writer.write(CLEAR, table.bits);

    let Some((&first, rest)) = input.split_first() else {
        if terminate {
            writer.write(EOI, table.bits);
        }
        return writer.finish();
    };

    let mut current = u16::from(first);
    for &byte in rest {
        if let Some(&code) = table.map.get(&(current, byte)) {
            current = code;
            continue;
        }
        writer.write(current, table.bits);
        table.add(current, byte);
        if table.next_code == TABLE_FULL {
            writer.write(CLEAR, table.bits);
            table.reset();
        }
        current = u16::from(byte);
    }

    writer.write(current, table.bits);
    if !terminate {
        return writer.finish();
    }
    // The decoder adds one more entry on reading `current`; match its width.
    if table.next_code != FIRST {
        let threshold = if early_change {
            (1u16 << table.bits) - 1
        } else {
            1u16 << table.bits
        };
        if table.bits < 12 && table.next_code + 1 > threshold {
            table.bits += 1;
        }
    }
    writer.write(EOI, table.bits);
    writer.finish()
}

/// One literal code per byte, at the widths a decoder expects, then END.
///
/// After `n` literals the decoder's next free code is `258 + n - 1`, so the
/// stream walks the code-width boundaries without any string codes.
pub fn literal_stream(bytes: &[u8], early_change: bool) -> Vec<u8> {
    let mut writer = CodeWriter::new();
    let mut bits = 9u8;
    let mut next_code = FIRST;
    writer.write(CLEAR, bits);
    for (i, &byte) in bytes.iter().enumerate() {
        writer.write(u16::from(byte), bits);
        if i > 0 {
            next_code += 1;
            let threshold = if early_change {
                (1u16 << bits) - 1
            } else {
                1u16 << bits
            };
            if bits < 12 && next_code >= threshold {
                bits += 1;
            }
        }
    }
    writer.write(EOI, bits);
    writer.finish()
}

/// Deterministic pseudo-random bytes.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

/// Grayscale-ish gradient with a little noise, like a natural image tile.
pub fn image_like(width: usize, height: usize) -> Vec<u8> {
    let jitter = noise(width * height, 7);
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .zip(jitter)
        .map(|((x, y), j)| ((x + y) / 2) as u8 ^ (j & 0x03))
        .collect()
}
