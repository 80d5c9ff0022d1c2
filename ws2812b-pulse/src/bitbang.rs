//! # Send pulse buffers by toggling a GPIO
//!
//! Works with any `embedded-hal` output pin and delay. The delay must be able
//! to resolve a few hundred nanoseconds, otherwise the LEDs show wrong colors
//! (typically everything white). Prefer a hardware sink where there is one.

use core::fmt;
use core::num::NonZeroU32;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{ChainConfig, to_nanos};
use crate::encoder::PulseSymbol;
use crate::error::Error;
use crate::sink::PulseSink;

/// Error during bit-bang output.
pub enum BitBangError<E> {
    /// The output pin could not be driven.
    Pin(E),
    /// The chain timings cannot be played with the configured clock.
    Config(Error),
}

impl<E: fmt::Debug> fmt::Debug for BitBangError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitBangError::Pin(err) => write!(f, "pin error: {:?}", err),
            BitBangError::Config(err) => write!(f, "config error: {:?}", err),
        }
    }
}

pub struct BitBang<D, P> {
    delay: D,
    pin: P,
    clock_mhz: NonZeroU32,
    reset_us: u32,
}

impl<D, P> BitBang<D, P>
where
    D: DelayNs,
    P: OutputPin,
{
    /// Drive `pin` low and use it for a chain encoded with `config`.
    pub fn new(delay: D, mut pin: P, config: &ChainConfig) -> Result<Self, BitBangError<P::Error>> {
        config.validate().map_err(BitBangError::Config)?;
        // Validated configs never have a zero clock.
        let clock_mhz = NonZeroU32::new(config.clock_mhz).unwrap_or(NonZeroU32::MIN);
        pin.set_low().map_err(BitBangError::Pin)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "bit-bang sink: {} MHz ticks, {} µs reset",
            config.clock_mhz,
            config.timing.reset_us
        );

        Ok(Self {
            delay,
            pin,
            clock_mhz,
            reset_us: config.timing.reset_us,
        })
    }

    /// Give back the delay and the pin.
    pub fn release(self) -> (D, P) {
        (self.delay, self.pin)
    }
}

impl<D, P> PulseSink for BitBang<D, P>
where
    D: DelayNs,
    P: OutputPin,
{
    type Error = BitBangError<P::Error>;

    fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        for symbol in symbols {
            self.pin.set_high().map_err(BitBangError::Pin)?;
            self.delay.delay_ns(to_nanos(symbol.high, self.clock_mhz));
            self.pin.set_low().map_err(BitBangError::Pin)?;
            self.delay.delay_ns(to_nanos(symbol.low, self.clock_mhz));
        }

        // Latch time, signals the end of the frame.
        self.delay.delay_us(self.reset_us);
        Ok(())
    }
}
