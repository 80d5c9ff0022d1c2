use core::fmt;

use crate::color::Channel;

/// A specialized result type for pulse encoding.
pub type Result<T> = core::result::Result<T, Error>;

/// Error during pulse encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// LEDs were requested but the color sequence is empty.
    EmptySequence,
    /// A color channel value lies outside `0..=255`.
    InvalidColor {
        /// The offending channel.
        channel: Channel,
        /// The rejected value.
        value: i32,
    },
    /// The output storage cannot hold `led_count * 24` symbols.
    BufferTooSmall {
        /// Symbols needed for the frame, saturated on overflow.
        required: usize,
        /// Symbols the storage can hold.
        capacity: usize,
    },
    /// A bit duration cannot be expressed as a pulse symbol: the clock is
    /// zero, a high time rounds down to no tick, or the tick count does not
    /// fit in 16 bits.
    InvalidTiming {
        /// The rejected duration in ns.
        ns: u32,
        /// Tick clock of the sink in MHz.
        clock_mhz: u32,
    },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptySequence => write!(f, "EmptySequence"),
            Error::InvalidColor { channel, value } => {
                write!(f, "InvalidColor({:?} = {})", channel, value)
            }
            Error::BufferTooSmall { required, capacity } => {
                write!(f, "BufferTooSmall({} > {})", required, capacity)
            }
            Error::InvalidTiming { ns, clock_mhz } => {
                write!(f, "InvalidTiming({} ns @ {} MHz)", ns, clock_mhz)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptySequence => {
                write!(f, "color sequence is empty, at least one color is required")
            }
            Error::InvalidColor { channel, value } => {
                write!(f, "{} channel value {} is outside 0..=255", channel, value)
            }
            Error::BufferTooSmall { required, capacity } => write!(
                f,
                "pulse buffer holds {} symbols but the frame needs {}",
                capacity, required
            ),
            Error::InvalidTiming { ns, clock_mhz } => write!(
                f,
                "{} ns cannot be timed in ticks of a {} MHz clock",
                ns, clock_mhz
            ),
        }
    }
}

impl core::error::Error for Error {}
