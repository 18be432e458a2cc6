//! LZW dictionary (code table) management.
//!
//! Every entry past the control codes is "previous string + first byte of the
//! following string", and both strings sit back to back in the decoded output.
//! Entries are therefore stored as windows into the output buffer instead of
//! owned byte vectors; the output doubles as the arena.

use crate::config::LzwConfig;
use crate::error::CorruptReason;
use tracing::trace;

/// A run of bytes inside the decoder's output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes.
    pub len: usize,
}

impl Span {
    /// This span grown by the byte that follows it.
    pub fn extended(self) -> Self {
        Self {
            start: self.start,
            len: self.len + 1,
        }
    }
}

/// What a code expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// Codes 0-255.
    Literal(u8),
    /// Codes from the first free code onward.
    Window(Span),
}

/// LZW code table for decoding.
#[derive(Debug)]
pub(crate) struct LzwDictionary {
    /// Windows for codes `first_code..next_code`.
    table: Vec<Span>,
    /// Configuration.
    config: LzwConfig,
    /// Next available code.
    next_code: u16,
    /// Current code bit width.
    current_bits: u8,
}

impl LzwDictionary {
    /// Create an empty dictionary with the given configuration.
    pub fn new(config: LzwConfig) -> Self {
        let capacity = usize::from(config.max_next_code() - config.first_code());
        Self {
            table: Vec::with_capacity(capacity),
            config,
            next_code: config.first_code(),
            current_bits: LzwConfig::MIN_BITS,
        }
    }

    /// Reset the dictionary to its initial state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.next_code = self.config.first_code();
        self.current_bits = LzwConfig::MIN_BITS;
    }

    /// Look up a code. Control codes and unassigned codes yield `None`.
    pub fn get(&self, code: u16) -> Option<Entry> {
        if code < self.config.clear_code() {
            return Some(Entry::Literal(code as u8));
        }
        let index = code.checked_sub(self.config.first_code())?;
        self.table.get(usize::from(index)).copied().map(Entry::Window)
    }

    /// Append an entry at `next_code` and widen codes if the threshold is hit.
    pub fn insert(&mut self, span: Span) -> Result<u16, CorruptReason> {
        if self.is_full() {
            return Err(CorruptReason::CodeWidthOverflow {
                max_bits: LzwConfig::MAX_BITS,
            });
        }

        let code = self.next_code;
        self.table.push(span);
        self.next_code += 1;
        self.update_bit_width();

        Ok(code)
    }

    /// Update bit width based on next_code.
    ///
    /// The decoder inserts each entry one code later than the encoder did, so
    /// with early change the width grows once next_code reaches 2^bits - 1.
    fn update_bit_width(&mut self) {
        if self.current_bits < LzwConfig::MAX_BITS
            && self.next_code >= self.config.width_threshold(self.current_bits)
        {
            self.current_bits += 1;
            trace!(
                next_code = self.next_code,
                bits = self.current_bits,
                "LZW code width increased"
            );
        }
    }

    /// Whether the 12-bit code space is exhausted.
    pub fn is_full(&self) -> bool {
        self.next_code >= self.config.max_next_code()
    }

    /// Get the current bit width.
    pub fn current_bits(&self) -> u8 {
        self.current_bits
    }

    /// Get the next code that will be assigned.
    pub fn next_code(&self) -> u16 {
        self.next_code
    }

    /// Get the clear code.
    pub fn clear_code(&self) -> u16 {
        self.config.clear_code()
    }

    /// Get the end-of-information code.
    pub fn eoi_code(&self) -> u16 {
        self.config.eoi_code()
    }
}
