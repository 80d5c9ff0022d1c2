//! Chain configuration and bit timings.

use core::num::NonZeroU32;

use crate::color::ColorOrder;
use crate::encoder::{BITS_PER_LED, PulseSymbol};
use crate::error::{Error, Result};

/// Convert nanoseconds to ticks of a `clock_mhz` clock, rounding.
///
/// Saturates at `u32::MAX` ticks.
pub const fn to_ticks(ns: u32, clock_mhz: u32) -> u32 {
    let ticks = (ns as u64 * clock_mhz as u64 + 500) / 1000;
    if ticks > u32::MAX as u64 {
        u32::MAX
    } else {
        ticks as u32
    }
}

/// Convert ticks of a `clock_mhz` clock back to nanoseconds, rounding.
pub const fn to_nanos(ticks: u16, clock_mhz: NonZeroU32) -> u32 {
    let clock = clock_mhz.get() as u64;
    ((ticks as u64 * 1000 + clock / 2) / clock) as u32
}

/// High/low durations of the two bit symbols and the latch gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    /// 0-bit high time in ns.
    pub t0h_ns: u32,
    /// 0-bit low time in ns.
    pub t0l_ns: u32,
    /// 1-bit high time in ns.
    pub t1h_ns: u32,
    /// 1-bit low time in ns.
    pub t1l_ns: u32,
    /// Reset (latch) time in µs, sent after every frame.
    pub reset_us: u32,
}

impl Timing {
    /// Datasheet timings (https://cdn-shop.adafruit.com/datasheets/WS2812B.pdf).
    pub const WS2812B: Timing = Timing {
        t0h_ns: 400,
        t0l_ns: 900,
        t1h_ns: 800,
        t1l_ns: 500,
        reset_us: 50,
    };

    /// Timings with a fixed 1250 ns bit period, for PWM sinks that only
    /// control the high time. The reset is 250µs for some newer parts, plus slop.
    pub const WS2812B_PWM: Timing = Timing {
        t0h_ns: 400,
        t0l_ns: 850,
        t1h_ns: 800,
        t1l_ns: 450,
        reset_us: 270,
    };

    /// Longest of the two bit periods in ns.
    pub const fn bit_period_ns(&self) -> u32 {
        let zero = self.t0h_ns.saturating_add(self.t0l_ns);
        let one = self.t1h_ns.saturating_add(self.t1l_ns);
        if zero > one { zero } else { one }
    }

    /// Microseconds needed to send a frame for `led_count` LEDs, reset included.
    pub const fn frame_micros(&self, led_count: usize) -> u64 {
        self.bits_micros(led_count.saturating_mul(BITS_PER_LED))
    }

    /// Microseconds needed to send `bits` symbols, reset included. Partial
    /// microseconds are rounded up.
    pub const fn bits_micros(&self, bits: usize) -> u64 {
        let active_ns = (bits as u64).saturating_mul(self.bit_period_ns() as u64);
        active_ns.div_ceil(1000).saturating_add(self.reset_us as u64)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::WS2812B
    }
}

/// Everything needed to encode frames for one LED chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainConfig {
    /// Number of LEDs in the chain.
    pub led_count: usize,
    /// Wire order of the color channels.
    pub order: ColorOrder,
    /// Bit timings.
    pub timing: Timing,
    /// Clock of the sink, in MHz. Symbol durations are expressed in its ticks.
    pub clock_mhz: u32,
}

impl ChainConfig {
    /// Tick clock used when none is given, 100 ns per tick.
    pub const DEFAULT_CLOCK_MHZ: u32 = 10;

    pub const fn new(led_count: usize) -> Self {
        Self {
            led_count,
            order: ColorOrder::Grb,
            timing: Timing::WS2812B,
            clock_mhz: Self::DEFAULT_CLOCK_MHZ,
        }
    }

    pub const fn with_order(mut self, order: ColorOrder) -> Self {
        self.order = order;
        self
    }

    pub const fn with_timing(mut self, timing: Timing, clock_mhz: u32) -> Self {
        self.timing = timing;
        self.clock_mhz = clock_mhz;
        self
    }

    /// Number of pulse symbols in one frame, saturating on overflow.
    pub const fn frame_len(&self) -> usize {
        self.led_count.saturating_mul(BITS_PER_LED)
    }

    /// Pulse symbol that is high for `high_ns` and low for `low_ns`, in
    /// ticks of the configured clock.
    pub const fn symbol(&self, high_ns: u32, low_ns: u32) -> Result<PulseSymbol> {
        let high = to_ticks(high_ns, self.clock_mhz);
        if high == 0 || high > u16::MAX as u32 {
            return Err(Error::InvalidTiming {
                ns: high_ns,
                clock_mhz: self.clock_mhz,
            });
        }
        let low = to_ticks(low_ns, self.clock_mhz);
        if low > u16::MAX as u32 {
            return Err(Error::InvalidTiming {
                ns: low_ns,
                clock_mhz: self.clock_mhz,
            });
        }
        Ok(PulseSymbol::new(high as u16, low as u16))
    }

    /// Symbols for a 0-bit and a 1-bit.
    pub const fn bit_symbols(&self) -> Result<[PulseSymbol; 2]> {
        let t = &self.timing;
        let zero = match self.symbol(t.t0h_ns, t.t0l_ns) {
            Ok(symbol) => symbol,
            Err(err) => return Err(err),
        };
        let one = match self.symbol(t.t1h_ns, t.t1l_ns) {
            Ok(symbol) => symbol,
            Err(err) => return Err(err),
        };
        Ok([zero, one])
    }

    /// Check that the timings can be expressed in ticks of the clock.
    pub const fn validate(&self) -> Result<()> {
        match self.bit_symbols() {
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_to_nearest() {
        // 100 ns ticks.
        assert_eq!(to_ticks(400, 10), 4);
        assert_eq!(to_ticks(900, 10), 9);
        // 62.5 ns ticks.
        assert_eq!(to_ticks(400, 16), 6);
        assert_eq!(to_ticks(800, 16), 13);
        assert_eq!(to_ticks(1250, 16), 20);
    }

    #[test]
    fn large_durations_do_not_overflow() {
        assert_eq!(to_ticks(u32::MAX, 16), 68_719_477);
        assert_eq!(to_ticks(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn nanos_invert_ticks() {
        let mhz = |clock| NonZeroU32::new(clock).unwrap();
        assert_eq!(to_nanos(4, mhz(10)), 400);
        assert_eq!(to_nanos(20, mhz(16)), 1250);
        assert_eq!(to_nanos(u16::MAX, mhz(1)), 65_535_000);
    }

    #[test]
    fn pwm_timing_has_fixed_period() {
        let t = Timing::WS2812B_PWM;
        assert_eq!(t.t0h_ns + t.t0l_ns, 1250);
        assert_eq!(t.t1h_ns + t.t1l_ns, 1250);
    }

    #[test]
    fn frame_duration_includes_reset() {
        let t = Timing::WS2812B_PWM;
        // 8 LEDs * 24 bits * 1250 ns = 240 µs.
        assert_eq!(t.frame_micros(8), 240 + 270);
        assert_eq!(t.frame_micros(0), 270);
        assert!(t.frame_micros(usize::MAX) > u64::MAX / 1000);
    }

    #[test]
    fn partial_frames_round_up() {
        let t = Timing::WS2812B_PWM;
        // 25 bits * 1250 ns = 31.25 µs.
        assert_eq!(t.bits_micros(25), 32 + 270);
        assert_eq!(t.bits_micros(24), t.frame_micros(1));
    }

    #[test]
    fn zero_clock_is_rejected() {
        let config = ChainConfig::new(1).with_timing(Timing::WS2812B, 0);
        assert_eq!(
            config.validate(),
            Err(Error::InvalidTiming {
                ns: 400,
                clock_mhz: 0
            })
        );
    }

    #[test]
    fn high_time_below_one_tick_is_rejected() {
        // 400 ns is 0.4 ticks at 1 MHz.
        let config = ChainConfig::new(1).with_timing(Timing::WS2812B, 1);
        assert_eq!(
            config.bit_symbols(),
            Err(Error::InvalidTiming {
                ns: 400,
                clock_mhz: 1
            })
        );
    }

    #[test]
    fn ticks_beyond_16_bits_are_rejected() {
        let timing = Timing {
            t1l_ns: 10_000_000,
            ..Timing::WS2812B
        };
        let config = ChainConfig::new(1).with_timing(timing, 10);
        assert_eq!(
            config.validate(),
            Err(Error::InvalidTiming {
                ns: 10_000_000,
                clock_mhz: 10
            })
        );

        let timing = Timing {
            t0h_ns: u32::MAX,
            ..Timing::WS2812B
        };
        let config = ChainConfig::new(1).with_timing(timing, u32::MAX);
        assert_eq!(
            config.validate(),
            Err(Error::InvalidTiming {
                ns: u32::MAX,
                clock_mhz: u32::MAX
            })
        );
    }

    #[test]
    fn presets_are_valid() {
        assert_eq!(ChainConfig::default().validate(), Ok(()));
        let pwm = ChainConfig::new(1).with_timing(Timing::WS2812B_PWM, 16);
        assert_eq!(
            pwm.bit_symbols(),
            Ok([PulseSymbol::new(6, 14), PulseSymbol::new(13, 7)])
        );
    }

    #[test]
    fn default_config() {
        let config = ChainConfig::new(100);
        assert_eq!(config.frame_len(), 2400);
        assert_eq!(ChainConfig::new(usize::MAX).frame_len(), usize::MAX);
        assert_eq!(config.order, ColorOrder::Grb);
        assert_eq!(config.timing, Timing::WS2812B);
        assert_eq!(config.clock_mhz, 10);
    }
}
