//! Caller-held running-light state.

use crate::buffer::PulseBuffer;
use crate::color::Color;
use crate::encoder::{Encoder, chain_colors};
use crate::error::Result;
use crate::shift::shift;

/// A color sequence together with the current shift offset.
///
/// This is plain data owned by the caller. Nothing in the encoder or the
/// sinks keeps a copy of it between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern<'a> {
    sequence: &'a [Color],
    shift: usize,
}

impl<'a> Pattern<'a> {
    pub const fn new(sequence: &'a [Color]) -> Self {
        Self { sequence, shift: 0 }
    }

    pub const fn sequence(&self) -> &'a [Color] {
        self.sequence
    }

    /// Index of the sequence entry shown on the first LED.
    pub const fn offset(&self) -> usize {
        self.shift
    }

    /// Swap in a new sequence and restart from its first entry.
    pub fn set_sequence(&mut self, sequence: &'a [Color]) {
        self.sequence = sequence;
        self.shift = 0;
    }

    /// Move the pattern by `delta` positions, negative values move it back.
    pub fn advance(&mut self, delta: isize) -> usize {
        self.shift = shift(self.shift as isize, delta, self.sequence.len());
        self.shift
    }

    /// Colors of the first `led_count` LEDs.
    pub fn colors(&self, led_count: usize) -> Result<impl Iterator<Item = Color> + use<'a>> {
        chain_colors(self.sequence, led_count, self.shift as isize)
    }

    pub fn render<const N: usize>(
        &self,
        encoder: &Encoder,
        led_count: usize,
    ) -> Result<PulseBuffer<N>> {
        encoder.encode(self.sequence, led_count, self.shift as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors::{BLUE, GREEN, RED, WHITE};
    use crate::error::Error;

    #[test]
    fn advance_wraps() {
        let sequence = [RED, GREEN, BLUE];
        let mut pattern = Pattern::new(&sequence);
        assert_eq!(pattern.advance(1), 1);
        assert_eq!(pattern.advance(2), 0);
        assert_eq!(pattern.advance(-1), 2);
    }

    #[test]
    fn set_sequence_resets_offset() {
        let first = [RED, GREEN, BLUE];
        let second = [WHITE];
        let mut pattern = Pattern::new(&first);
        pattern.advance(2);
        pattern.set_sequence(&second);
        assert_eq!(pattern.offset(), 0);
        assert_eq!(pattern.sequence(), &second);
    }

    #[test]
    fn colors_follow_offset() {
        let sequence = [RED, GREEN, BLUE];
        let mut pattern = Pattern::new(&sequence);
        pattern.advance(1);
        let colors: Vec<_> = pattern.colors(5).unwrap().collect();
        assert_eq!(colors, [GREEN, BLUE, RED, GREEN, BLUE]);
    }

    #[test]
    fn render_matches_encode() {
        let sequence = [RED, GREEN];
        let encoder = Encoder::default();
        let mut pattern = Pattern::new(&sequence);
        pattern.advance(1);
        let frame = pattern.render::<96>(&encoder, 3).unwrap();
        assert_eq!(frame, encoder.encode::<96>(&sequence, 3, 1).unwrap());
    }

    #[test]
    fn empty_pattern() {
        let mut pattern = Pattern::new(&[]);
        assert_eq!(pattern.advance(3), 0);
        assert_eq!(pattern.colors(0).unwrap().count(), 0);
        assert!(matches!(pattern.colors(1), Err(Error::EmptySequence)));
    }
}
