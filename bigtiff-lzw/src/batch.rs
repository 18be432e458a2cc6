//! Decoding many strips or tiles of one image.
//!
//! Strips are independent, so each gets its own result: one corrupt tile
//! does not take the rest of the image down with it.

use crate::config::{DecodeOptions, OutputLimit};
use crate::decoder::LzwDecoder;
use crate::error::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One compressed strip/tile and its decoded length bound.
///
/// The last strip of an image is usually shorter than the others, hence the
/// per-strip limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strip<'a> {
    /// Compressed bytes.
    pub data: &'a [u8],
    /// Decoded length bound for this strip.
    pub limit: OutputLimit,
}

impl<'a> Strip<'a> {
    /// A strip that must decode to exactly `expected_size` bytes.
    pub fn exact(data: &'a [u8], expected_size: usize) -> Self {
        Self {
            data,
            limit: OutputLimit::Exact(expected_size),
        }
    }
}

/// Decode strips one after another, reusing a single decoder.
///
/// `options.limit` is ignored in favour of each strip's own limit.
pub fn decode_strips(strips: &[Strip<'_>], options: &DecodeOptions) -> Vec<Result<Vec<u8>>> {
    let mut decoder = LzwDecoder::new(options.config);
    strips
        .iter()
        .map(|strip| decode_strip(&mut decoder, strip, options))
        .collect()
}

/// Decode strips across the rayon thread pool.
///
/// Results come back in input order.
#[cfg(feature = "parallel")]
pub fn decode_strips_parallel(
    strips: &[Strip<'_>],
    options: &DecodeOptions,
) -> Vec<Result<Vec<u8>>> {
    strips
        .par_iter()
        .map_init(
            || LzwDecoder::new(options.config),
            |decoder, strip| decode_strip(decoder, strip, options),
        )
        .collect()
}

fn decode_strip(
    decoder: &mut LzwDecoder,
    strip: &Strip<'_>,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    let options = options.with_limit(strip.limit);
    crate::decompress_with(decoder, strip.data, &options)
}
