//! Monotonic time capability used to enforce the clock-pulse width budget.
//!
//! `embedded-hal` offers delays but no way to *measure* elapsed time, and
//! the driver must detect clock pulses stretched past the chip's 60 us
//! power-down threshold by host scheduling jitter. [`Monotonic`] is the
//! narrow capability it needs; implement it for the platform's free-running
//! timer. Hosted targets (e.g. a Raspberry Pi) can enable the `std` feature
//! and use [`StdClock`].

/// Monotonic microsecond clock.
pub trait Monotonic {
    /// Returns the time since some fixed epoch, in microseconds.
    ///
    /// The epoch is arbitrary; only differences are observed. The counter
    /// must never go backwards and should tick at microsecond granularity
    /// or finer, or the pulse-width guard will trip spuriously.
    fn now_us(&mut self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &mut T {
    fn now_us(&mut self) -> u64 {
        T::now_us(*self)
    }
}

#[cfg(feature = "std")]
mod std_clock {
    use std::time::Instant;

    use super::Monotonic;

    /// [`Monotonic`] implementation backed by [`std::time::Instant`].
    #[derive(Debug, Clone)]
    pub struct StdClock {
        epoch: Instant,
    }

    impl StdClock {
        /// Creates a clock anchored at the current instant.
        pub fn new() -> Self {
            Self {
                epoch: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Monotonic for StdClock {
        fn now_us(&mut self) -> u64 {
            self.epoch.elapsed().as_micros() as u64
        }
    }
}

#[cfg(feature = "std")]
pub use std_clock::StdClock;
