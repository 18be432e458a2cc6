//! Decoder configuration: code-width behaviour, output bounds, and the
//! per-call options bundle.

use crate::error::{LzwError, Result};
use crate::predictor::PredictorParams;

/// Default ceiling for [`OutputLimit::Unbounded`] (256 MiB).
pub const DEFAULT_MAX_OUTPUT: usize = 256 * 1024 * 1024;

/// LZW code-width configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LzwConfig {
    /// Whether to use early code change.
    /// TIFF uses early change (increase bit width one code earlier).
    pub early_change: bool,
}

impl LzwConfig {
    /// Initial code width in bits.
    pub const MIN_BITS: u8 = 9;
    /// Maximum code width in bits.
    pub const MAX_BITS: u8 = 12;

    /// Standard TIFF LZW configuration.
    ///
    /// - MSB-first bit order
    /// - 9-12 bit codes
    /// - Early code change (widths switch at 511/1023/2047)
    pub const TIFF: Self = Self { early_change: true };

    /// Configuration for producers that omit early change.
    ///
    /// Widths switch at 512/1024/2048, as in generic LZW.
    pub const COMPAT: Self = Self {
        early_change: false,
    };

    /// Get the clear code value.
    pub const fn clear_code(&self) -> u16 {
        1 << (Self::MIN_BITS - 1)
    }

    /// Get the end-of-information code value (clear_code + 1).
    pub const fn eoi_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Get the first available code for dictionary entries.
    pub const fn first_code(&self) -> u16 {
        self.eoi_code() + 1
    }

    /// Value of the next free code at which a `bits`-wide reader must widen.
    pub const fn width_threshold(&self, bits: u8) -> u16 {
        let natural = 1u16 << bits;
        if self.early_change {
            natural - 1
        } else {
            natural
        }
    }

    /// Largest value the next free code may take: the size of the
    /// [`Self::MAX_BITS`] code space.
    ///
    /// Conformant TIFF encoders clear at 4094, but some clear only once every
    /// 12-bit code is taken; both decode. The width itself never grows past
    /// `MAX_BITS`.
    pub const fn max_next_code(&self) -> u16 {
        1 << Self::MAX_BITS
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::TIFF
    }
}

/// Bound on the decoded length of one strip/tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputLimit {
    /// Output must be exactly this many bytes.
    Exact(usize),
    /// Output may be at most this many bytes.
    AtMost(usize),
    /// No length metadata; grow as needed up to `cap` bytes.
    Unbounded {
        /// Hard ceiling on buffer growth.
        cap: usize,
    },
}

impl OutputLimit {
    /// The largest number of bytes a decode may produce.
    pub fn max_len(&self) -> usize {
        match *self {
            Self::Exact(n) | Self::AtMost(n) => n,
            Self::Unbounded { cap } => cap,
        }
    }

    /// Capacity worth reserving before decoding starts.
    pub(crate) fn initial_capacity(&self, input_len: usize) -> usize {
        match *self {
            // A code of at least 9 bits never expands past 4096 bytes.
            Self::Exact(n) | Self::AtMost(n) => {
                let codes = input_len.saturating_mul(8) / 9 + 1;
                n.min(codes.saturating_mul(4096))
            }
            // LZW rarely beats 4:1 on raster data; let Vec doubling handle the rest.
            Self::Unbounded { cap } => input_len.saturating_mul(4).min(cap),
        }
    }

    /// Check a finished decode against the bound.
    pub(crate) fn check_final(&self, actual: usize) -> Result<()> {
        match *self {
            Self::Exact(expected) if actual != expected => {
                Err(LzwError::OutputUnderflow { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

impl Default for OutputLimit {
    fn default() -> Self {
        Self::Unbounded {
            cap: DEFAULT_MAX_OUTPUT,
        }
    }
}

/// Everything one strip/tile decode needs besides the compressed bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    /// Code-width behaviour.
    pub config: LzwConfig,
    /// Decoded length bound.
    pub limit: OutputLimit,
    /// Predictor to reverse after decoding.
    pub predictor: PredictorParams,
}

impl DecodeOptions {
    /// TIFF defaults with an exact expected size and no predictor.
    pub fn tiff(expected_size: usize) -> Self {
        Self {
            config: LzwConfig::TIFF,
            limit: OutputLimit::Exact(expected_size),
            predictor: PredictorParams::NONE,
        }
    }

    /// Replace the code-width configuration.
    pub fn with_config(mut self, config: LzwConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the output bound.
    pub fn with_limit(mut self, limit: OutputLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the predictor parameters.
    pub fn with_predictor(mut self, predictor: PredictorParams) -> Self {
        self.predictor = predictor;
        self
    }
}
