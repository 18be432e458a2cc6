//! LZW decoder (decompression).
//!
//! Decoding runs until the END-OF-INFORMATION code. Running out of input
//! first is an error rather than a short result, and so is any code that
//! would push the output past the caller's bound.

use crate::bitstream_msb::MsbBitReader;
use crate::config::{LzwConfig, OutputLimit};
use crate::dictionary::{Entry, LzwDictionary, Span};
use crate::error::{CorruptReason, LzwError, Result};
use tracing::{debug, trace};

/// LZW decoder for one strip or tile at a time.
///
/// The decoder holds no state between calls beyond a reusable table
/// allocation; each decode starts from a fresh dictionary.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Dictionary for code lookup.
    dict: LzwDictionary,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given configuration.
    pub fn new(config: LzwConfig) -> Self {
        Self {
            dict: LzwDictionary::new(config),
        }
    }

    /// Decode one LZW-compressed strip/tile.
    pub fn decode(&mut self, input: &[u8], limit: OutputLimit) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decode_into(input, limit, &mut output)?;
        Ok(output)
    }

    /// Decode into a caller-owned buffer, replacing its contents.
    ///
    /// On error the buffer is left empty so no partial pixel data escapes.
    pub fn decode_into(
        &mut self,
        input: &[u8],
        limit: OutputLimit,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        output.clear();
        output.reserve(limit.initial_capacity(input.len()));

        let result = self
            .decode_codes(input, limit.max_len(), output)
            .and_then(|()| limit.check_final(output.len()));

        match result {
            Ok(()) => {
                debug!(
                    input = input.len(),
                    output = output.len(),
                    "LZW strip decoded"
                );
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "LZW strip decode failed");
                output.clear();
                Err(err)
            }
        }
    }

    fn decode_codes(&mut self, input: &[u8], max_len: usize, output: &mut Vec<u8>) -> Result<()> {
        let mut reader = MsbBitReader::new(input);
        self.dict.reset();

        // String emitted for the previous code, None right after a reset.
        let mut prev: Option<Span> = None;

        loop {
            let code = reader.read_bits(self.dict.current_bits())?;

            if code == self.dict.clear_code() {
                trace!(bit_position = reader.bits_read(), "LZW clear code");
                self.dict.reset();
                prev = None;
                continue;
            }

            if code == self.dict.eoi_code() {
                return Ok(());
            }

            let emitted = match (self.dict.get(code), prev) {
                (Some(entry), _) => emit_entry(output, entry, max_len)?,
                // Forward reference: previous string plus its own first byte.
                (None, Some(last)) if code == self.dict.next_code() => {
                    emit_forward(output, last, max_len)?
                }
                (None, None) if code == self.dict.next_code() => {
                    return Err(LzwError::corrupt(
                        reader.bits_read(),
                        CorruptReason::UndefinedForwardReference { code },
                    ));
                }
                (None, _) => {
                    return Err(LzwError::corrupt(
                        reader.bits_read(),
                        CorruptReason::InvalidCode {
                            code,
                            next_code: self.dict.next_code(),
                        },
                    ));
                }
            };

            if let Some(last) = prev {
                // The byte after `last` in the output is the first byte of
                // `emitted`, so the new entry is just `last` grown by one.
                self.dict
                    .insert(last.extended())
                    .map_err(|reason| LzwError::corrupt(reader.bits_read(), reason))?;
            }

            prev = Some(emitted);
        }
    }
}

impl Default for LzwDecoder {
    fn default() -> Self {
        Self::new(LzwConfig::TIFF)
    }
}

fn reserve_output(output: &[u8], len: usize, max_len: usize) -> Result<usize> {
    let start = output.len();
    match start.checked_add(len) {
        Some(end) if end <= max_len => Ok(start),
        _ => Err(LzwError::OutputOverflow { limit: max_len }),
    }
}

fn emit_entry(output: &mut Vec<u8>, entry: Entry, max_len: usize) -> Result<Span> {
    match entry {
        Entry::Literal(byte) => {
            let start = reserve_output(output, 1, max_len)?;
            output.push(byte);
            Ok(Span { start, len: 1 })
        }
        Entry::Window(span) => {
            let start = reserve_output(output, span.len, max_len)?;
            output.extend_from_within(span.start..span.start + span.len);
            Ok(Span {
                start,
                len: span.len,
            })
        }
    }
}

fn emit_forward(output: &mut Vec<u8>, last: Span, max_len: usize) -> Result<Span> {
    let start = reserve_output(output, last.len + 1, max_len)?;
    output.extend_from_within(last.start..last.start + last.len);
    output.push(output[last.start]);
    Ok(Span {
        start,
        len: last.len + 1,
    })
}
