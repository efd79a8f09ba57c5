//! Error handling primitives for the HX711 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying digital pins.
    Pin(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The data lines did not settle LOW within the ready-poll budget.
    ///
    /// Recoverable: the conversion was never started, retry on the next
    /// cycle.
    NotReady,
    /// A clock pulse stayed HIGH long enough for the chip to enter
    /// power-down mode.
    ///
    /// The in-progress conversion cycle is abandoned because the chip and
    /// the accumulators no longer agree on the current bit position.
    /// Recoverable: the chip wakes on the next LOW clock, retry the read.
    PulseTooLong,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Pin(err)
    }
}
