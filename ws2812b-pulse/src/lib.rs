//! Encode color sequences for WS2812B LEDs (aka Neopixel) into pulse timing buffers.
//!
//! A color sequence of any length is mapped onto a chain of `led_count` LEDs,
//! wrapping around when the sequence is shorter than the chain. A shift offset
//! picks the sequence entry used for the first LED, so advancing it frame by
//! frame gives a running light. The shift lives with the caller, the encoder
//! holds no animation state.
//!
//! Pulse buffers are handed to a [`PulseSink`], which owns the output pin(s).
//! [`BitBang`] drives any `embedded-hal` output pin, and [`Strip`] makes any
//! sink usable through the `smart-leds` traits.
//!
//! ```
//! use ws2812b_pulse::{PulseBuffer, colors, encode, shift};
//!
//! let sequence = [colors::RED, colors::GREEN, colors::BLUE];
//! let mut offset: usize = 0;
//!
//! let frame: PulseBuffer<{ 5 * 24 }> = encode(&sequence, 5, offset as isize).unwrap();
//! assert_eq!(frame.len(), 5 * 24);
//!
//! offset = shift(offset as isize, 1, sequence.len());
//! assert_eq!(offset, 1);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod bitbang;
pub mod buffer;
pub mod color;
pub mod config;
pub mod encoder;
pub mod error;
pub mod pattern;
pub mod shift;
pub mod sink;
pub mod strip;

pub use bitbang::{BitBang, BitBangError};
pub use buffer::PulseBuffer;
pub use color::{Channel, Color, ColorOrder, colors, from_channels};
pub use config::{ChainConfig, Timing};
pub use encoder::{BITS_PER_LED, Encoder, PulseSymbol, encode};
pub use error::{Error, Result};
pub use pattern::Pattern;
pub use shift::shift;
pub use sink::{Fanout, FanoutError, PulseSink, PulseSinkAsync};
pub use strip::{Strip, StripError};
