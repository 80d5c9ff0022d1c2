//! Send WS2812B pulse buffers (aka Neopixel) with nRFxx PWM and the embassy ecosystem.
//!
//! The driver is a [`PulseSink`]: frames encoded by `ws2812b-pulse` are turned
//! into PWM duty samples and played once, followed by the reset gap. It also
//! implements the `SmartLedsWrite` and `SmartLedsWriteAsync` traits so it can
//! be used with the `smart-leds` crate directly.
//!
//! Based on [ws2812-nrf52833-pwm](https://github.com/BartMassey/ws2812-nrf52833-pwm).

#![no_std]

use core::fmt;

use embassy_nrf::{Peri, gpio, pwm};
use embassy_time::{Duration, Timer, block_for};
use rgb::RGB8;
use smart_leds_trait::{SmartLedsWrite, SmartLedsWriteAsync};
use ws2812b_pulse::{
    BITS_PER_LED, ChainConfig, ColorOrder, Encoder, PulseSink, PulseSinkAsync, PulseSymbol, Timing,
};

/// PWM clock in MHz.
pub const PWM_CLOCK: u32 = 16;
/// Flip bit of a PWM sample: the output starts high and drops at the duty value.
const POLARITY_FALLING: u16 = 0x8000;

/// Convert nanoseconds to PWM ticks, rounding.
const fn to_ticks(ns: u32) -> u32 {
    ws2812b_pulse::config::to_ticks(ns, PWM_CLOCK)
}

/// Chain configuration matching the PWM sink for `led_count` LEDs.
pub const fn chain_config(led_count: usize) -> ChainConfig {
    ChainConfig::new(led_count).with_timing(Timing::WS2812B_PWM, PWM_CLOCK)
}

/// GRB encoder in PWM ticks.
const ENCODER: Encoder = match Encoder::new(&chain_config(0)) {
    Ok(encoder) => encoder,
    Err(_) => panic!("PWM timings do not fit the PWM clock"),
};

/// Error during WS2812B driver operation.
pub enum Error {
    /// PWM error.
    Pwm(pwm::Error),
    /// The frame does not fit into the sample buffer.
    Encode(ws2812b_pulse::Error),
    /// A symbol is high for `high` ticks, which is not shorter than the PWM
    /// period. Frames must be encoded with [`Ws2812bPwm::encoder`].
    Symbol { high: u16 },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pwm(err) => write!(f, "pwm error: {:?}", err),
            Error::Encode(err) => write!(f, "encode error: {:?}", err),
            Error::Symbol { high } => write!(f, "symbol high for {} ticks", high),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Pwm(err) => defmt::write!(f, "pwm error: {}", err),
            Error::Encode(err) => defmt::write!(f, "encode error: {}", err),
            Error::Symbol { high } => defmt::write!(f, "symbol high for {} ticks", high),
        }
    }
}

impl From<pwm::Error> for Error {
    fn from(err: pwm::Error) -> Self {
        Error::Pwm(err)
    }
}

/// Driver for a chain of WS2812B devices using PWM and one or two GPIOs.
///
/// The `N` value is the capacity of the sample buffer in bits, it must be a
/// multiple of 24.
pub struct Ws2812bPwm<const N: usize> {
    pwm: pwm::SequencePwm<'static>,
    buf: &'static mut [u16; N],
    encoder: Encoder,
    timing: Timing,
    /// Bits loaded by the last frame.
    len: usize,
}

impl<const N: usize> Ws2812bPwm<N> {
    /// Set up a WS2812B chain with PWM and an output pin.
    pub fn new<Pwm: pwm::Instance, P: gpio::Pin>(
        pwm: Peri<'static, Pwm>,
        pin: Peri<'static, P>,
        buf: &'static mut [u16; N],
    ) -> Result<Self, Error> {
        let pwm = pwm::SequencePwm::new_1ch(pwm, pin, Self::pwm_config())?;
        Ok(Self::with_pwm(pwm, buf))
    }

    /// Set up two chains that show the same frames, one per pin.
    pub fn new_mirrored<Pwm: pwm::Instance, P0: gpio::Pin, P1: gpio::Pin>(
        pwm: Peri<'static, Pwm>,
        pin0: Peri<'static, P0>,
        pin1: Peri<'static, P1>,
        buf: &'static mut [u16; N],
    ) -> Result<Self, Error> {
        let pwm = pwm::SequencePwm::new_2ch(pwm, pin0, pin1, Self::pwm_config())?;
        Ok(Self::with_pwm(pwm, buf))
    }

    fn with_pwm(pwm: pwm::SequencePwm<'static>, buf: &'static mut [u16; N]) -> Self {
        const { assert!(N % BITS_PER_LED == 0, "N must be a multiple of 24") };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "ws2812b pwm: up to {} LEDs, period {} ticks",
            N / BITS_PER_LED,
            Self::period()
        );

        Self {
            pwm,
            buf,
            encoder: ENCODER,
            timing: Timing::WS2812B_PWM,
            len: 0,
        }
    }

    /// Chain configuration to encode frames for this driver.
    pub const fn config() -> ChainConfig {
        chain_config(N / BITS_PER_LED)
    }

    /// Use another wire order, for WS2812 clones that are not GRB.
    pub fn with_order(mut self, order: ColorOrder) -> Self {
        self.encoder = Encoder::from_symbols(order, ENCODER.zero(), ENCODER.one());
        self
    }

    /// Encoder matching this driver's timings and wire order.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Total PWM period in ticks.
    const fn period() -> u16 {
        to_ticks(Timing::WS2812B_PWM.bit_period_ns()) as u16
    }

    fn pwm_config() -> pwm::Config {
        let mut config = pwm::Config::default();
        config.counter_mode = pwm::CounterMode::Up;
        config.max_duty = Self::period();
        config.prescaler = pwm::Prescaler::Div1;
        config.sequence_load = pwm::SequenceLoad::Common;
        config.ch0_drive = gpio::OutputDrive::HighDrive0Standard1;
        config.ch1_drive = gpio::OutputDrive::HighDrive0Standard1;
        config.ch2_drive = gpio::OutputDrive::HighDrive0Standard1;
        config.ch3_drive = gpio::OutputDrive::HighDrive0Standard1;
        config
    }

    /// Number of microseconds to wait for the loaded frame to run once.
    #[inline(always)]
    fn delay_micros(&self) -> u64 {
        self.timing.bits_micros(self.len)
    }

    #[inline(always)]
    fn sequence_config(&self) -> pwm::SequenceConfig {
        let mut conf = pwm::SequenceConfig::default();
        conf.refresh = 0;
        conf.end_delay = to_ticks(self.timing.reset_us.saturating_mul(1000));
        conf
    }

    /// Turn symbols into PWM samples. Only the high time is used, the low
    /// time is whatever is left of the PWM period.
    ///
    /// Symbols past the buffer capacity are not consumed.
    fn load<I>(&mut self, symbols: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = PulseSymbol>,
    {
        self.len = 0;
        let mut symbols = symbols.into_iter();
        let mut len = 0;
        while let Some(symbol) = symbols.next() {
            let Some(loc) = self.buf.get_mut(len) else {
                let required = (len + 1).saturating_add(symbols.size_hint().0);
                return Err(Error::Encode(ws2812b_pulse::Error::BufferTooSmall {
                    required,
                    capacity: N,
                }));
            };
            // Anything longer would spill into the polarity bit.
            if symbol.high >= Self::period() {
                return Err(Error::Symbol { high: symbol.high });
            }
            *loc = symbol.high | POLARITY_FALLING;
            len += 1;
        }
        self.len = len;
        Ok(())
    }

    fn load_colors<T, I>(&mut self, iterator: T) -> Result<(), Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<RGB8>,
    {
        let encoder = self.encoder;
        self.load(
            iterator
                .into_iter()
                .flat_map(move |item| encoder.led_symbols(item.into())),
        )
    }

    fn send_blocking(&mut self) -> Result<(), Error> {
        let delay = Duration::from_micros(self.delay_micros());
        if self.len == 0 {
            // Nothing to play, the line only has to stay low for the reset.
            block_for(delay);
            return Ok(());
        }

        let conf = self.sequence_config();
        let seq = pwm::SingleSequencer::new(&mut self.pwm, &self.buf[..self.len], conf);
        seq.start(pwm::SingleSequenceMode::Times(1))?;
        block_for(delay);
        drop(seq);

        Ok(())
    }

    async fn send_async(&mut self) -> Result<(), Error> {
        let delay = self.delay_micros();
        if self.len == 0 {
            Timer::after_micros(delay).await;
            return Ok(());
        }

        let conf = self.sequence_config();
        let seq = pwm::SingleSequencer::new(&mut self.pwm, &self.buf[..self.len], conf);
        seq.start(pwm::SingleSequenceMode::Times(1))?;
        Timer::after_micros(delay).await;
        drop(seq);

        Ok(())
    }
}

/// Frames must be encoded with [`Ws2812bPwm::encoder`] (or [`chain_config`]),
/// symbols are taken to be in ticks of the 16 MHz PWM clock.
impl<const N: usize> PulseSink for Ws2812bPwm<N> {
    type Error = Error;

    fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ws2812b pwm: sending {} bits", symbols.len());

        self.load(symbols.iter().copied())?;
        self.send_blocking()
    }
}

impl<const N: usize> PulseSinkAsync for Ws2812bPwm<N> {
    type Error = Error;

    async fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ws2812b pwm: sending {} bits", symbols.len());

        self.load(symbols.iter().copied())?;
        self.send_async().await
    }
}

impl<const N: usize> SmartLedsWrite for Ws2812bPwm<N> {
    type Error = Error;
    type Color = RGB8;

    /// Write all the items of an iterator to a WS2812B strip
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.load_colors(iterator)?;
        self.send_blocking()
    }
}

impl<const N: usize> SmartLedsWriteAsync for Ws2812bPwm<N> {
    type Error = Error;
    type Color = RGB8;

    /// Write all the items of an iterator to a WS2812B strip
    async fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.load_colors(iterator)?;
        self.send_async().await
    }
}
