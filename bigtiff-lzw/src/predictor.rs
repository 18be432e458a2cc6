//! TIFF predictor reversal (tag 317).
//!
//! Horizontal differencing stores every sample as the difference from the
//! previous sample of the same component in the same row. Reversing it is a
//! running sum per component, wrapping modulo 2^bits-per-sample. Rows are
//! independent: the first pixel of a row is stored verbatim.
//!
//! Samples of 8, 16, 32 and 64 bits are accumulated directly on their bytes.
//! Other depths up to 16 bits are packed MSB-first with each row padded to a
//! byte boundary; those rows are unpacked, accumulated, and repacked, leaving
//! the padding bits untouched.

use crate::bitstream_msb::MsbBitReader;
use crate::error::{LzwError, Result};

/// TIFF predictor kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predictor {
    /// No prediction (tag value 1).
    #[default]
    None,
    /// Horizontal differencing (tag value 2).
    Horizontal,
    /// Floating-point byte-shuffled differencing (tag value 3). Recognised so
    /// it can be rejected; never reversed here.
    FloatingPoint,
}

impl Predictor {
    /// Map a TIFF `Predictor` tag value.
    pub fn from_tag(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::None),
            2 => Ok(Self::Horizontal),
            3 => Ok(Self::FloatingPoint),
            other => Err(LzwError::UnsupportedPredictor(other)),
        }
    }

    /// The TIFF tag value.
    pub fn tag(self) -> u16 {
        match self {
            Self::None => 1,
            Self::Horizontal => 2,
            Self::FloatingPoint => 3,
        }
    }
}

/// Byte order of multi-byte samples (the TIFF header's `II` or `MM`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// `II`
    #[default]
    LittleEndian,
    /// `MM`
    BigEndian,
}

/// Layout of the decoded samples, supplied by the caller from the TIFF
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictorParams {
    /// Predictor to reverse.
    pub predictor: Predictor,
    /// Pixels per row (strip width or tile width).
    pub columns: usize,
    /// Components per pixel, interleaved.
    pub samples_per_pixel: u16,
    /// Bits per component.
    pub bits_per_sample: u16,
    /// Byte order of samples wider than 8 bits.
    pub byte_order: ByteOrder,
}

impl PredictorParams {
    /// No predictor; layout fields are ignored.
    pub const NONE: Self = Self {
        predictor: Predictor::None,
        columns: 0,
        samples_per_pixel: 0,
        bits_per_sample: 0,
        byte_order: ByteOrder::LittleEndian,
    };

    /// Create predictor parameters with little-endian samples.
    pub fn new(
        predictor: Predictor,
        columns: usize,
        samples_per_pixel: u16,
        bits_per_sample: u16,
    ) -> Self {
        Self {
            predictor,
            columns,
            samples_per_pixel,
            bits_per_sample,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Horizontal differencing over the given layout.
    pub fn horizontal(columns: usize, samples_per_pixel: u16, bits_per_sample: u16) -> Self {
        Self::new(
            Predictor::Horizontal,
            columns,
            samples_per_pixel,
            bits_per_sample,
        )
    }

    /// Set the sample byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Reject parameters this post-processor cannot honour.
    ///
    /// Runs before decoding so a bad configuration never costs a decode.
    pub fn validate(&self) -> Result<()> {
        match self.predictor {
            Predictor::None => Ok(()),
            Predictor::FloatingPoint => Err(LzwError::UnsupportedPredictor(self.predictor.tag())),
            Predictor::Horizontal => {
                if self.columns == 0 {
                    return Err(LzwError::InvalidParameter("columns must be non-zero"));
                }
                if self.samples_per_pixel == 0 {
                    return Err(LzwError::InvalidParameter(
                        "samples per pixel must be non-zero",
                    ));
                }
                match self.bits_per_sample {
                    1..=16 | 32 | 64 => {}
                    other => return Err(LzwError::UnsupportedBitDepth(other)),
                }
                self.row_bytes().map(|_| ())
            }
        }
    }

    /// Bytes per row, including padding to a byte boundary.
    pub fn row_bytes(&self) -> Result<usize> {
        self.samples_per_row()
            .checked_mul(usize::from(self.bits_per_sample))
            .map(|bits| bits.div_ceil(8))
            .ok_or(LzwError::InvalidParameter("row size overflows usize"))
    }

    fn samples_per_row(&self) -> usize {
        self.columns
            .saturating_mul(usize::from(self.samples_per_pixel))
    }
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Running sum: undo differencing.
    Reverse,
    /// Differences: redo differencing.
    Apply,
}

/// Reverse the predictor in place.
///
/// `data` must hold a whole number of rows.
pub fn reverse_predictor(data: &mut [u8], params: &PredictorParams) -> Result<()> {
    transform(data, params, Direction::Reverse)
}

/// Apply horizontal differencing in place, the exact inverse of
/// [`reverse_predictor`].
pub fn apply_horizontal_differencing(data: &mut [u8], params: &PredictorParams) -> Result<()> {
    transform(data, params, Direction::Apply)
}

fn transform(data: &mut [u8], params: &PredictorParams, direction: Direction) -> Result<()> {
    params.validate()?;
    if params.predictor == Predictor::None || data.is_empty() {
        return Ok(());
    }

    let row_bytes = params.row_bytes()?;
    if data.len() % row_bytes != 0 {
        return Err(LzwError::RowMisaligned {
            len: data.len(),
            row_bytes,
        });
    }

    let spp = usize::from(params.samples_per_pixel);
    match params.bits_per_sample {
        8 => {
            for row in data.chunks_exact_mut(row_bytes) {
                accumulate_bytes(row, spp, direction);
            }
        }
        16 | 32 | 64 => {
            let width = usize::from(params.bits_per_sample / 8);
            for row in data.chunks_exact_mut(row_bytes) {
                accumulate_words(row, spp, width, params.byte_order, direction);
            }
        }
        bits => {
            let mut samples = Vec::with_capacity(params.samples_per_row());
            for row in data.chunks_exact_mut(row_bytes) {
                accumulate_packed(row, params, bits as u8, &mut samples, direction)?;
            }
        }
    }
    Ok(())
}

fn accumulate_bytes(row: &mut [u8], spp: usize, direction: Direction) {
    match direction {
        Direction::Reverse => {
            for i in spp..row.len() {
                row[i] = row[i].wrapping_add(row[i - spp]);
            }
        }
        Direction::Apply => {
            for i in (spp..row.len()).rev() {
                row[i] = row[i].wrapping_sub(row[i - spp]);
            }
        }
    }
}

fn accumulate_words(
    row: &mut [u8],
    spp: usize,
    width: usize,
    order: ByteOrder,
    direction: Direction,
) {
    let stride = spp * width;
    let mask = u64::MAX >> (64 - 8 * width);
    let offsets = (stride..row.len()).step_by(width);

    let mut step = |offset: usize| {
        let prev = read_word(&row[offset - stride..offset - stride + width], order);
        let cur = read_word(&row[offset..offset + width], order);
        let value = match direction {
            Direction::Reverse => cur.wrapping_add(prev),
            Direction::Apply => cur.wrapping_sub(prev),
        };
        write_word(&mut row[offset..offset + width], value & mask, order);
    };

    match direction {
        Direction::Reverse => offsets.for_each(&mut step),
        Direction::Apply => offsets.rev().for_each(&mut step),
    }
}

fn read_word(bytes: &[u8], order: ByteOrder) -> u64 {
    let fold = |acc: u64, &byte: &u8| (acc << 8) | u64::from(byte);
    match order {
        ByteOrder::LittleEndian => bytes.iter().rev().fold(0, fold),
        ByteOrder::BigEndian => bytes.iter().fold(0, fold),
    }
}

fn write_word(bytes: &mut [u8], value: u64, order: ByteOrder) {
    let last = bytes.len() - 1;
    for (i, byte) in bytes.iter_mut().enumerate() {
        let shift = match order {
            ByteOrder::LittleEndian => 8 * i,
            ByteOrder::BigEndian => 8 * (last - i),
        };
        *byte = (value >> shift) as u8;
    }
}

fn accumulate_packed(
    row: &mut [u8],
    params: &PredictorParams,
    bits: u8,
    samples: &mut Vec<u16>,
    direction: Direction,
) -> Result<()> {
    let spp = usize::from(params.samples_per_pixel);
    let count = params.samples_per_row();
    let mask = ((1u32 << bits) - 1) as u16;

    samples.clear();
    let mut reader = MsbBitReader::new(row);
    for _ in 0..count {
        samples.push(reader.read_bits(bits)?);
    }

    match direction {
        Direction::Reverse => {
            for i in spp..count {
                samples[i] = samples[i].wrapping_add(samples[i - spp]) & mask;
            }
        }
        Direction::Apply => {
            for i in (spp..count).rev() {
                samples[i] = samples[i].wrapping_sub(samples[i - spp]) & mask;
            }
        }
    }

    for (i, &sample) in samples.iter().enumerate() {
        put_bits(row, i * usize::from(bits), bits, sample);
    }
    Ok(())
}

/// Overwrite `count` bits at MSB-first `bit_offset` with `value`.
fn put_bits(row: &mut [u8], bit_offset: usize, count: u8, value: u16) {
    let first = bit_offset / 8;
    let lead = bit_offset % 8;
    let span = (lead + usize::from(count)).div_ceil(8);
    let window = &mut row[first..first + span];

    let acc = window
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
    let shift = span * 8 - lead - usize::from(count);
    let mask = ((1u32 << count) - 1) << shift;
    let acc = (acc & !mask) | ((u32::from(value) << shift) & mask);

    let last = span - 1;
    for (i, byte) in window.iter_mut().enumerate() {
        *byte = (acc >> (8 * (last - i))) as u8;
    }
}
