//! Where pulse buffers go.
//!
//! A sink owns the output pin(s) and emits one whole frame per call, followed
//! by the reset gap that latches the colors. Taking `&mut self` keeps two
//! frames from interleaving on the same output.

use core::fmt;

use crate::encoder::PulseSymbol;

/// Blocking pulse output.
pub trait PulseSink {
    type Error;

    /// Transmit a frame of symbols and the reset gap.
    fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error>;
}

/// Async pulse output.
#[allow(async_fn_in_trait)]
pub trait PulseSinkAsync {
    type Error;

    /// Transmit a frame of symbols and the reset gap.
    async fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error>;
}

impl<S: PulseSink + ?Sized> PulseSink for &mut S {
    type Error = S::Error;

    fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        (**self).send(symbols)
    }
}

impl<S: PulseSinkAsync + ?Sized> PulseSinkAsync for &mut S {
    type Error = S::Error;

    async fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        (**self).send(symbols).await
    }
}

/// Sends the same frame to several sinks, one after another.
///
/// Use it to drive several chains on separate pins with the same pattern.
pub struct Fanout<'a, S> {
    sinks: &'a mut [S],
}

impl<'a, S> Fanout<'a, S> {
    pub fn new(sinks: &'a mut [S]) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

/// A sink behind a [`Fanout`] failed. Sinks before `index` got the frame,
/// the ones after it did not.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FanoutError<E> {
    pub index: usize,
    pub error: E,
}

impl<E: fmt::Debug> fmt::Debug for FanoutError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink {}: {:?}", self.index, self.error)
    }
}

impl<S: PulseSink> PulseSink for Fanout<'_, S> {
    type Error = FanoutError<S::Error>;

    fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            sink.send(symbols)
                .map_err(|error| FanoutError { index, error })?;
        }
        Ok(())
    }
}

impl<S: PulseSinkAsync> PulseSinkAsync for Fanout<'_, S> {
    type Error = FanoutError<S::Error>;

    async fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            sink.send(symbols)
                .await
                .map_err(|error| FanoutError { index, error })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Fanout, FanoutError, PulseSink, PulseSymbol};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<PulseSymbol>>,
        fail: bool,
    }

    impl PulseSink for Recorder {
        type Error = &'static str;

        fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
            if self.fail {
                return Err("broken pin");
            }
            self.frames.push(symbols.to_vec());
            Ok(())
        }
    }

    #[test]
    fn fanout_writes_every_sink() {
        let frame = [PulseSymbol::new(4, 9), PulseSymbol::new(8, 5)];
        let mut sinks = [Recorder::default(), Recorder::default()];

        let mut fanout = Fanout::new(&mut sinks);
        assert_eq!(fanout.len(), 2);
        fanout.send(&frame).unwrap();

        for sink in &sinks {
            assert_eq!(sink.frames, [frame.to_vec()]);
        }
    }

    #[test]
    fn fanout_stops_at_failing_sink() {
        let frame = [PulseSymbol::new(4, 9)];
        let mut sinks = [
            Recorder::default(),
            Recorder {
                fail: true,
                ..Default::default()
            },
            Recorder::default(),
        ];

        let err = Fanout::new(&mut sinks).send(&frame).unwrap_err();
        assert_eq!(
            err,
            FanoutError {
                index: 1,
                error: "broken pin"
            }
        );
        assert_eq!(sinks[0].frames.len(), 1);
        assert!(sinks[2].frames.is_empty());
    }

    #[test]
    fn mut_ref_is_a_sink() {
        fn send_twice<S: PulseSink>(mut sink: S) -> Result<(), S::Error> {
            sink.send(&[])?;
            sink.send(&[])
        }

        let mut recorder = Recorder::default();
        send_twice(&mut recorder).unwrap();
        assert_eq!(recorder.frames.len(), 2);
    }
}

#[cfg(test)]
mod async_tests {
    use embassy_futures::block_on;

    use super::{Fanout, FanoutError, PulseSinkAsync, PulseSymbol};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<PulseSymbol>>,
        fail: bool,
    }

    impl PulseSinkAsync for Recorder {
        type Error = &'static str;

        async fn send(&mut self, symbols: &[PulseSymbol]) -> Result<(), Self::Error> {
            if self.fail {
                return Err("broken pin");
            }
            self.frames.push(symbols.to_vec());
            Ok(())
        }
    }

    #[test]
    fn fanout_writes_every_sink() {
        let frame = [PulseSymbol::new(6, 14), PulseSymbol::new(13, 7)];
        let mut sinks = [Recorder::default(), Recorder::default()];

        block_on(Fanout::new(&mut sinks).send(&frame)).unwrap();

        for sink in &sinks {
            assert_eq!(sink.frames, [frame.to_vec()]);
        }
    }

    #[test]
    fn fanout_stops_at_failing_sink() {
        let frame = [PulseSymbol::new(6, 14)];
        let mut sinks = [
            Recorder::default(),
            Recorder::default(),
            Recorder {
                fail: true,
                ..Default::default()
            },
            Recorder::default(),
        ];

        let err = block_on(Fanout::new(&mut sinks).send(&frame)).unwrap_err();
        assert_eq!(
            err,
            FanoutError {
                index: 2,
                error: "broken pin"
            }
        );
        assert_eq!(sinks[0].frames.len(), 1);
        assert_eq!(sinks[1].frames.len(), 1);
        assert!(sinks[3].frames.is_empty());
    }

    #[test]
    fn mut_ref_is_a_sink() {
        async fn send_twice<S: PulseSinkAsync>(mut sink: S) -> Result<(), S::Error> {
            sink.send(&[]).await?;
            sink.send(&[]).await
        }

        let mut recorder = Recorder::default();
        block_on(send_twice(&mut recorder)).unwrap();
        assert_eq!(recorder.frames.len(), 2);
    }
}
