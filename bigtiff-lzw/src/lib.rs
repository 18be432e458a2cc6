//! # bigtiff-lzw: TIFF/BigTIFF LZW Decompression
//!
//! This crate decodes LZW-compressed TIFF and BigTIFF strips and tiles and
//! optionally reverses the horizontal differencing predictor.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **TIFF LZW**: MSB-first bit order, early code change, CLEAR/END codes
//! - **Compat mode**: Early change can be switched off for producers that omit it
//! - **Predictor**: Horizontal differencing for 1-16, 32 and 64-bit samples
//! - **Bounded output**: Exact, at-most, or capped growth
//!
//! ## TIFF LZW Specification
//!
//! TIFF uses a specific variant of LZW compression:
//!
//! - **MSB-first bit order**: Bits are packed from most significant to least
//! - **9-12 bit codes**: Variable-length codes starting at 9 bits
//! - **Early code change**: Bit width increases one code earlier than standard
//! - **CLEAR (256)**: Resets the code table
//! - **EOI termination**: Streams end with code 257 (End of Information)
//!
//! Locating strips and tiles (including 64-bit BigTIFF offsets) is the
//! caller's job; this crate only sees the compressed bytes of one of them.
//!
//! ## Example
//!
//! The worked example from the TIFF 6.0 specification:
//!
//! ```rust
//! use bigtiff_lzw::decompress_tiff;
//!
//! let compressed = [0x80, 0x0B, 0x60, 0x50, 0x22, 0x0C, 0x0C, 0x85, 0x01];
//! let decompressed = decompress_tiff(&compressed, 10).unwrap();
//! assert_eq!(decompressed, b"-----A---B");
//! ```
//!
//! With a predictor:
//!
//! ```rust
//! use bigtiff_lzw::{DecodeOptions, PredictorParams, decompress};
//!
//! // One row of four 8-bit gray pixels: CLEAR, 10, 1, 1, 1, END.
//! let compressed = [0x80, 0x02, 0x80, 0x20, 0x10, 0x0C, 0x04];
//! let options = DecodeOptions::tiff(4).with_predictor(PredictorParams::horizontal(4, 1, 8));
//! assert_eq!(decompress(&compressed, &options).unwrap(), [10, 11, 12, 13]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bitstream_msb;
mod config;
mod decoder;
mod dictionary;
mod error;

pub mod batch;
pub mod predictor;

pub use bitstream_msb::MsbBitReader;
pub use config::{DEFAULT_MAX_OUTPUT, DecodeOptions, LzwConfig, OutputLimit};
pub use decoder::LzwDecoder;
pub use error::{CorruptReason, ErrorKind, LzwError, Result};
pub use predictor::{
    ByteOrder, Predictor, PredictorParams, apply_horizontal_differencing, reverse_predictor,
};

/// Decompress one strip/tile and reverse its predictor.
///
/// Predictor parameters are validated before any decoding happens.
///
/// # Parameters
///
/// - `data`: LZW-compressed strip or tile
/// - `options`: code-width behaviour, output bound, predictor
///
/// # Returns
///
/// Decoded pixel bytes.
pub fn decompress(data: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(options.config);
    decompress_with(&mut decoder, data, options)
}

/// Decompress TIFF LZW data (convenience function).
///
/// This is equivalent to `decompress(data, &DecodeOptions::tiff(expected_size))`.
///
/// # Parameters
///
/// - `data`: TIFF LZW-compressed input
/// - `expected_size`: Exact size of decompressed output
///
/// # Returns
///
/// Decompressed byte sequence.
pub fn decompress_tiff(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    decompress(data, &DecodeOptions::tiff(expected_size))
}

pub(crate) fn decompress_with(
    decoder: &mut LzwDecoder,
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    options.predictor.validate()?;
    let mut output = decoder.decode(data, options.limit)?;
    reverse_predictor(&mut output, &options.predictor)?;
    Ok(output)
}
