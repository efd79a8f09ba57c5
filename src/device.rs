//! High-level HX711 protocol controller.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::cell::{LoadCell, Reading, SAMPLE_BITS};
use crate::clock::Monotonic;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::params::ChannelGain;

/// Driver for a rig of HX711 chips wired to one shared clock line.
///
/// Each chip contributes one data line (`N` in total) and is represented by
/// one [`LoadCell`], in data pin order. All chips are pulsed in lockstep, so
/// the readings of one conversion cycle correspond to the same physical
/// instant across the rig.
///
/// Every protocol method takes `&mut self`; a reentrant conversion is a
/// compile error rather than undefined behavior.
pub struct Hx711<CLK, DIN, MONO, const N: usize> {
    sck: CLK,
    cells: [LoadCell<DIN>; N],
    monotonic: MONO,
    config: Config,
}

impl<CLK, DIN, MONO, const N: usize> Hx711<CLK, DIN, MONO, N> {
    // ==================================================================
    // == Driver Ownership & Access =====================================
    // ==================================================================
    /// Consumes the driver and returns the clock pin, the data pins in
    /// their original order, and the monotonic clock.
    pub fn release(self) -> (CLK, [DIN; N], MONO) {
        (self.sck, self.cells.map(LoadCell::release), self.monotonic)
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The cell attached to the `index`-th data pin.
    pub fn cell(&self, index: usize) -> Option<&LoadCell<DIN>> {
        self.cells.get(index)
    }

    /// Mutable cell access, for clearing histories or setting calibration
    /// fields.
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut LoadCell<DIN>> {
        self.cells.get_mut(index)
    }

    /// All cells in data pin order.
    pub fn cells(&self) -> &[LoadCell<DIN>] {
        &self.cells
    }

    /// All cells in data pin order, mutably.
    pub fn cells_mut(&mut self) -> &mut [LoadCell<DIN>] {
        &mut self.cells
    }
}

impl<CLK, DIN, MONO, E, const N: usize> Hx711<CLK, DIN, MONO, N>
where
    CLK: OutputPin<Error = E>,
    DIN: InputPin<Error = E>,
    MONO: Monotonic,
{
    // ==================================================================
    // == Construction ==================================================
    // ==================================================================
    /// Creates a driver for `N` chips sharing one clock line.
    ///
    /// Pin directions are fixed by the types: the platform HAL hands over
    /// the clock line as an [`OutputPin`] and each data line as an
    /// [`InputPin`]. The clock line is driven LOW so the chips stay out of
    /// power-down while idle.
    ///
    /// Fails with [`Error::InvalidConfig`] when `N == 0` or the
    /// configuration does not validate.
    pub fn new(sck: CLK, data: [DIN; N], monotonic: MONO, config: Config) -> Result<Self, E> {
        if N == 0 {
            return Err(Error::InvalidConfig);
        }
        config.validate().map_err(|_| Error::InvalidConfig)?;

        let mut device = Self {
            sck,
            cells: data.map(LoadCell::new),
            monotonic,
            config,
        };
        device.sck.set_low()?;
        Ok(device)
    }

    // ==================================================================
    // == Readiness =====================================================
    // ==================================================================
    /// Returns true when every chip has a conversion ready to shift out
    /// (all data lines LOW).
    pub fn is_ready(&mut self) -> Result<bool, E> {
        for cell in &mut self.cells {
            if !cell.is_ready()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Drives the clock LOW and polls until every data line reads LOW.
    ///
    /// Polls at most `ready_retries` times, `ready_poll_delay_us` apart
    /// (~200 ms worst case with the defaults), then fails with
    /// [`Error::NotReady`].
    pub fn wait_ready(&mut self, delay: &mut impl DelayNs) -> Result<(), E> {
        self.sck.set_low()?;

        for _ in 0..self.config.ready_retries {
            if self.is_ready()? {
                return Ok(());
            }
            delay.delay_us(self.config.ready_poll_delay_us);
        }

        debug!(
            "data lines still HIGH after {} ready polls",
            self.config.ready_retries
        );
        Err(Error::NotReady)
    }

    // ==================================================================
    // == Conversion Cycle ==============================================
    // ==================================================================
    /// Runs one full conversion cycle and returns the readings in data pin
    /// order.
    ///
    /// The cycle is: ready wait, 24 clock pulses each sampled by every cell
    /// in lockstep, history finalization, then the trailing pulses that arm
    /// the channel/gain for the next conversion.
    ///
    /// On [`Error::NotReady`] or a pulse failure during the 24 data bits,
    /// the cycle is abandoned and no history is recorded. A pulse failure
    /// during the trailing pulses is reported as an error, but by then the
    /// cycle's readings are already recorded and remain in the histories.
    pub fn read(&mut self, delay: &mut impl DelayNs) -> Result<[Reading; N], E> {
        self.wait_ready(delay)?;

        for cell in &mut self.cells {
            cell.begin_read();
        }

        for _ in 0..SAMPLE_BITS {
            self.pulse_sck()?;
            // every cell must observe this pulse before the next one begins
            for cell in &mut self.cells {
                cell.sample_bit()?;
            }
        }

        let mut readings = [Reading::default(); N];
        for (slot, cell) in readings.iter_mut().zip(self.cells.iter_mut()) {
            *slot = cell.finish_read();
        }

        self.write_channel_gain()?;

        Ok(readings)
    }

    // ==================================================================
    // == Clock Pulse Generation ========================================
    // ==================================================================
    /// Emits one clock pulse, enforcing the power-down width budget.
    ///
    /// The chip powers down once its clock is held HIGH for 60 us; a pulse
    /// stretched past the budget (host scheduling jitter) leaves the chip
    /// reset mid-conversion and out of step with the accumulators, so the
    /// cycle must be abandoned.
    fn pulse_sck(&mut self) -> Result<(), E> {
        let start = self.monotonic.now_us();
        self.sck.set_high()?;
        self.sck.set_low()?;
        let width = self.monotonic.now_us().saturating_sub(start);

        if width >= self.config.max_pulse_width_us {
            warn!("sck pulse held for {} us, chip presumed powered down", width);
            return Err(Error::PulseTooLong);
        }
        Ok(())
    }

    /// Emits the trailing pulses that arm the channel/gain setting for the
    /// next conversion.
    fn write_channel_gain(&mut self) -> Result<(), E> {
        for _ in 0..self.config.channel_gain.extra_pulses() {
            self.pulse_sck()?;
        }
        Ok(())
    }

    // ==================================================================
    // == Channel, Gain & Power =========================================
    // ==================================================================
    /// Arms a new channel/gain setting.
    ///
    /// The chip latches the setting during the trailing pulses of the next
    /// completed conversion; that conversion's readings still use the old
    /// setting and are typically discarded.
    pub fn set_channel_gain(&mut self, channel_gain: ChannelGain) {
        self.config.channel_gain = channel_gain;
    }

    /// Holds the clock line HIGH; every chip on it powers down 60 us later.
    pub fn power_down(&mut self) -> Result<(), E> {
        self.sck.set_high().map_err(Error::from)
    }

    /// Releases the clock line, waking the chips.
    ///
    /// After wake-up the chips default to channel A gain 128 until the next
    /// completed conversion re-arms the configured setting.
    pub fn power_up(&mut self) -> Result<(), E> {
        self.sck.set_low().map_err(Error::from)
    }
}
