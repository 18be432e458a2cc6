//! LZW-specific error types.
//!
//! Every failure path of a strip/tile decode ends here. Errors fall into three
//! families (see [`ErrorKind`]) so callers can decide between aborting the
//! whole image and substituting a blank tile.

use thiserror::Error;

/// Why a stream was rejected as corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CorruptReason {
    /// A code beyond the next free dictionary slot.
    #[error("code {code} is beyond the next free code {next_code}")]
    InvalidCode {
        /// The offending code.
        code: u16,
        /// Next free code at the time it was read.
        next_code: u16,
    },

    /// A reference to the next free slot with no previous string to extend.
    #[error("code {code} references an undefined entry right after a reset")]
    UndefinedForwardReference {
        /// The offending code.
        code: u16,
    },

    /// The table filled up and the code width would exceed the maximum.
    #[error("code width would exceed {max_bits} bits without a CLEAR code")]
    CodeWidthOverflow {
        /// Maximum code width of the configuration.
        max_bits: u8,
    },
}

/// LZW decompression and predictor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LzwError {
    /// Input ran out before an END-OF-INFORMATION code.
    #[error("Unexpected end of LZW stream at bit position {bit_position}")]
    UnexpectedEndOfStream {
        /// Bit position where the read failed.
        bit_position: u64,
    },

    /// Malformed code sequence.
    #[error("Corrupt LZW stream at bit position {bit_position}: {reason}")]
    CorruptStream {
        /// Bit position just after the offending code.
        bit_position: u64,
        /// What was wrong with it.
        reason: CorruptReason,
    },

    /// Decoding would produce more bytes than allowed.
    #[error("Decoded output exceeds the limit of {limit} bytes")]
    OutputOverflow {
        /// The limit that was hit.
        limit: usize,
    },

    /// END reached before the exact expected length was produced.
    #[error("Decoded {actual} bytes but expected exactly {expected}")]
    OutputUnderflow {
        /// Expected length.
        expected: usize,
        /// Bytes actually decoded.
        actual: usize,
    },

    /// Predictor kind this decoder does not reverse (TIFF tag 317 value).
    #[error("Unsupported predictor: {0}")]
    UnsupportedPredictor(u16),

    /// Bits-per-sample value the predictor cannot handle.
    #[error("Unsupported bits per sample for horizontal predictor: {0}")]
    UnsupportedBitDepth(u16),

    /// Decoded data is not a whole number of rows.
    #[error("Decoded length {len} is not a multiple of the row size {row_bytes}")]
    RowMisaligned {
        /// Decoded length.
        len: usize,
        /// Bytes per row.
        row_bytes: usize,
    },

    /// Caller-supplied parameters are unusable.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Coarse classification of [`LzwError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad code, premature end, code-width overflow.
    Stream,
    /// Output size disagrees with the caller's bound.
    Capacity,
    /// Rejected before decoding began.
    Configuration,
}

impl LzwError {
    /// Create a corrupt stream error.
    pub fn corrupt(bit_position: u64, reason: CorruptReason) -> Self {
        Self::CorruptStream {
            bit_position,
            reason,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEndOfStream { .. } | Self::CorruptStream { .. } => ErrorKind::Stream,
            Self::OutputOverflow { .. } | Self::OutputUnderflow { .. } => ErrorKind::Capacity,
            Self::UnsupportedPredictor(_)
            | Self::UnsupportedBitDepth(_)
            | Self::RowMisaligned { .. }
            | Self::InvalidParameter(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;
