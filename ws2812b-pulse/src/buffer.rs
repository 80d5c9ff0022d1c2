use core::ops::Deref;

use heapless::Vec;

use crate::color::Color;
use crate::encoder::{BITS_PER_LED, Encoder, PulseSymbol, frame_len};
use crate::error::{Error, Result};
use crate::shift::normalize;

/// A frame of pulse symbols, `led_count * 24` long.
///
/// `N` is the capacity in symbols and should be 24 times the longest chain
/// the buffer is meant for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PulseBuffer<const N: usize> {
    symbols: Vec<PulseSymbol, N>,
}

impl<const N: usize> PulseBuffer<N> {
    /// Largest chain this buffer can hold.
    pub const MAX_LEDS: usize = N / BITS_PER_LED;

    pub const fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn led_count(&self) -> usize {
        self.symbols.len() / BITS_PER_LED
    }

    pub fn as_slice(&self) -> &[PulseSymbol] {
        &self.symbols
    }

    /// The 24 symbols of LED `index`.
    pub fn led(&self, index: usize) -> Option<&[PulseSymbol]> {
        let start = index.checked_mul(BITS_PER_LED)?;
        self.symbols.get(start..start.checked_add(BITS_PER_LED)?)
    }

    /// Replace the content with exactly `led_count` LEDs worth of symbols.
    pub(crate) fn fill<I>(&mut self, led_count: usize, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = PulseSymbol>,
    {
        let required = frame_len(led_count);
        if required > N {
            return Err(Error::BufferTooSmall {
                required,
                capacity: N,
            });
        }

        self.symbols.clear();
        for symbol in symbols.into_iter().take(required) {
            self.symbols.push(symbol).map_err(|_| Error::BufferTooSmall {
                required,
                capacity: N,
            })?;
        }
        Ok(())
    }

    /// Replace the content with one LED per color.
    ///
    /// Colors past the capacity are not consumed, so `colors` may be endless.
    /// The reported requirement then counts the remaining colors from their
    /// size hint.
    pub(crate) fn fill_colors<I>(&mut self, encoder: &Encoder, colors: I) -> Result<()>
    where
        I: IntoIterator<Item = Color>,
    {
        self.symbols.clear();
        let mut colors = colors.into_iter();
        while let Some(color) = colors.next() {
            if self.symbols.len() + BITS_PER_LED > N {
                let led_count = (self.led_count() + 1).saturating_add(colors.size_hint().0);
                self.symbols.clear();
                return Err(Error::BufferTooSmall {
                    required: frame_len(led_count),
                    capacity: N,
                });
            }
            for symbol in encoder.led_symbols(color) {
                self.symbols.push(symbol).map_err(|_| Error::BufferTooSmall {
                    required: self.symbols.len() + BITS_PER_LED,
                    capacity: N,
                })?;
            }
        }
        Ok(())
    }

    /// Advance the running light by one position without re-encoding the
    /// whole frame.
    ///
    /// The first LED is dropped, the others move one place towards the start,
    /// and the last LED is encoded from `sequence` at `shift_after`. The
    /// result is the same as encoding the full frame with `shift_after`.
    pub fn rotate_one(
        &mut self,
        encoder: &Encoder,
        sequence: &[Color],
        shift_after: isize,
    ) -> Result<()> {
        let led_count = self.led_count();
        if led_count == 0 {
            return Ok(());
        }
        if sequence.is_empty() {
            return Err(Error::EmptySequence);
        }

        let start = normalize(shift_after, sequence.len());
        let last = sequence[((led_count - 1) % sequence.len() + start) % sequence.len()];

        let len = self.symbols.len();
        self.symbols.copy_within(BITS_PER_LED.., 0);
        self.symbols.truncate(len - BITS_PER_LED);
        for symbol in encoder.led_symbols(last) {
            // The frame keeps its length, so there is room for every symbol.
            self.symbols.push(symbol).map_err(|_| Error::BufferTooSmall {
                required: len,
                capacity: N,
            })?;
        }
        Ok(())
    }
}

impl<const N: usize> Default for PulseBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for PulseBuffer<N> {
    type Target = [PulseSymbol];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const N: usize> AsRef<[PulseSymbol]> for PulseBuffer<N> {
    fn as_ref(&self) -> &[PulseSymbol] {
        self.as_slice()
    }
}

impl<'a, const N: usize> IntoIterator for &'a PulseBuffer<N> {
    type Item = &'a PulseSymbol;
    type IntoIter = core::slice::Iter<'a, PulseSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
