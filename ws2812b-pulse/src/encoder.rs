//! Color sequence to pulse symbol encoding.

use crate::buffer::PulseBuffer;
use crate::color::{Color, ColorOrder};
use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::shift::normalize;

/// Size of the color definition on the wire, in bits.
pub const BITS_PER_LED: usize = 24;

/// One bit on the wire: the line is held high, then low, for the given
/// number of sink clock ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseSymbol {
    pub high: u16,
    pub low: u16,
}

impl PulseSymbol {
    pub const fn new(high: u16, low: u16) -> Self {
        Self { high, low }
    }
}

/// Turns colors into pulse symbols for one chain configuration.
///
/// Encoding is pure: the same inputs always give the same symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoder {
    order: ColorOrder,
    /// Symbols for a 0-bit and a 1-bit.
    bits: [PulseSymbol; 2],
}

impl Encoder {
    /// Encoder for `config`, failing with [`Error::InvalidTiming`] if the
    /// bit timings cannot be expressed in ticks of its clock.
    pub const fn new(config: &ChainConfig) -> Result<Self> {
        match config.bit_symbols() {
            Ok([zero, one]) => Ok(Self::from_symbols(config.order, zero, one)),
            Err(err) => Err(err),
        }
    }

    /// Datasheet timings in 100 ns ticks, GRB order.
    pub const WS2812B: Encoder =
        Encoder::from_symbols(ColorOrder::Grb, PulseSymbol::new(4, 9), PulseSymbol::new(8, 5));

    /// Use explicit symbols instead of deriving them from a [`Timing`](crate::Timing).
    pub const fn from_symbols(order: ColorOrder, zero: PulseSymbol, one: PulseSymbol) -> Self {
        Self {
            order,
            bits: [zero, one],
        }
    }

    pub const fn order(&self) -> ColorOrder {
        self.order
    }

    /// Symbol for a 0-bit: short high, long low.
    pub const fn zero(&self) -> PulseSymbol {
        self.bits[0]
    }

    /// Symbol for a 1-bit: long high, short low.
    pub const fn one(&self) -> PulseSymbol {
        self.bits[1]
    }

    /// The 24 symbols for a single LED, most significant bit first.
    pub fn led_symbols(&self, color: Color) -> impl Iterator<Item = PulseSymbol> + use<> {
        let packed = self.order.pack(color);
        let bits = self.bits;
        (0..BITS_PER_LED).map(move |i| bits[((packed >> (BITS_PER_LED - i - 1)) & 1) as usize])
    }

    pub fn encode_led(&self, color: Color) -> [PulseSymbol; BITS_PER_LED] {
        let mut out = [PulseSymbol::default(); BITS_PER_LED];
        for (loc, symbol) in out.iter_mut().zip(self.led_symbols(color)) {
            *loc = symbol;
        }
        out
    }

    /// Encode every color of an iterator, one LED each.
    pub fn encode_colors<'a, I>(&'a self, colors: I) -> impl Iterator<Item = PulseSymbol> + 'a
    where
        I: IntoIterator<Item = Color> + 'a,
        I::IntoIter: 'a,
    {
        colors
            .into_iter()
            .flat_map(move |color| self.led_symbols(color))
    }

    /// Lazily encode `led_count` LEDs taken from `sequence`, starting at `shift`.
    pub fn symbols<'a>(
        &'a self,
        sequence: &'a [Color],
        led_count: usize,
        shift: isize,
    ) -> Result<impl Iterator<Item = PulseSymbol> + 'a> {
        Ok(self.encode_colors(chain_colors(sequence, led_count, shift)?))
    }

    /// Encode into caller storage and return the number of symbols written.
    pub fn encode_into(
        &self,
        sequence: &[Color],
        led_count: usize,
        shift: isize,
        out: &mut [PulseSymbol],
    ) -> Result<usize> {
        let required = frame_len(led_count);
        if required > out.len() {
            return Err(Error::BufferTooSmall {
                required,
                capacity: out.len(),
            });
        }
        let symbols = self.symbols(sequence, led_count, shift)?;
        for (loc, symbol) in out.iter_mut().zip(symbols) {
            *loc = symbol;
        }
        Ok(required)
    }

    /// Encode a whole frame into a fresh [`PulseBuffer`].
    pub fn encode<const N: usize>(
        &self,
        sequence: &[Color],
        led_count: usize,
        shift: isize,
    ) -> Result<PulseBuffer<N>> {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "encode: {} LEDs from {} colors, shift {}",
            led_count,
            sequence.len(),
            shift
        );

        let mut buffer = PulseBuffer::new();
        buffer.fill(led_count, self.symbols(sequence, led_count, shift)?)?;
        Ok(buffer)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::WS2812B
    }
}

/// Encode a frame with the default WS2812B configuration: GRB order and
/// datasheet timings in 100 ns ticks.
pub fn encode<const N: usize>(
    sequence: &[Color],
    led_count: usize,
    shift: isize,
) -> Result<PulseBuffer<N>> {
    Encoder::default().encode(sequence, led_count, shift)
}

/// Colors of a chain of `led_count` LEDs: LED `i` gets
/// `sequence[(i + shift) mod sequence.len()]`.
pub fn chain_colors(
    sequence: &[Color],
    led_count: usize,
    shift: isize,
) -> Result<impl Iterator<Item = Color> + '_> {
    if led_count > 0 && sequence.is_empty() {
        return Err(Error::EmptySequence);
    }
    let start = normalize(shift, sequence.len());
    Ok(sequence.iter().copied().cycle().skip(start).take(led_count))
}

/// Symbols needed for `led_count` LEDs, saturating on overflow.
pub(crate) const fn frame_len(led_count: usize) -> usize {
    led_count.saturating_mul(BITS_PER_LED)
}
