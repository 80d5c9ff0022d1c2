//! `smart-leds` support for any [`PulseSink`].

use core::fmt;

use smart_leds_trait::{SmartLedsWrite, SmartLedsWriteAsync};

use crate::buffer::PulseBuffer;
use crate::color::Color;
use crate::config::ChainConfig;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::sink::{PulseSink, PulseSinkAsync};

/// Error while writing a strip.
pub enum StripError<E> {
    /// The colors do not fit into the frame buffer.
    Encode(Error),
    /// The sink failed.
    Sink(E),
}

impl<E: fmt::Debug> fmt::Debug for StripError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripError::Encode(err) => write!(f, "encode error: {:?}", err),
            StripError::Sink(err) => write!(f, "sink error: {:?}", err),
        }
    }
}

/// A chain of LEDs behind a pulse sink. The constant `N` should be 24 times
/// the number of LEDs in the chain.
///
/// Every write encodes the given colors into a frame buffer and sends it.
pub struct Strip<S, const N: usize> {
    sink: S,
    encoder: Encoder,
    frame: PulseBuffer<N>,
}

impl<S, const N: usize> Strip<S, N> {
    /// Fails if the timings of `config` cannot be encoded.
    pub fn new(sink: S, config: &ChainConfig) -> Result<Self> {
        Ok(Self {
            sink,
            encoder: Encoder::new(config)?,
            frame: PulseBuffer::new(),
        })
    }

    /// The last frame sent.
    pub fn frame(&self) -> &PulseBuffer<N> {
        &self.frame
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn release(self) -> S {
        self.sink
    }
}

impl<S: PulseSink, const N: usize> SmartLedsWrite for Strip<S, N> {
    type Error = StripError<S::Error>;
    type Color = Color;

    /// Write all the items of an iterator to the strip
    fn write<T, I>(&mut self, iterator: T) -> core::result::Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frame
            .fill_colors(&self.encoder, iterator.into_iter().map(Into::into))
            .map_err(StripError::Encode)?;
        self.sink.send(&self.frame).map_err(StripError::Sink)
    }
}

impl<S: PulseSinkAsync, const N: usize> SmartLedsWriteAsync for Strip<S, N> {
    type Error = StripError<S::Error>;
    type Color = Color;

    /// Write all the items of an iterator to the strip
    async fn write<T, I>(&mut self, iterator: T) -> core::result::Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frame
            .fill_colors(&self.encoder, iterator.into_iter().map(Into::into))
            .map_err(StripError::Encode)?;
        self.sink.send(&self.frame).await.map_err(StripError::Sink)
    }
}
