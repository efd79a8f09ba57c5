//! Per-load-cell sample accumulation and two's-complement decoding.

use embedded_hal::digital::InputPin;
use heapless::Vec;

/// Bits shifted out of each chip per conversion.
pub const SAMPLE_BITS: usize = 24;

/// Number of most-recent readings a [`LoadCell`] retains.
pub const READING_HISTORY: usize = 64;

// Sign bit and value mask of a raw 24-bit conversion.
const SIGN_BIT: u32 = 0x80_0000;
const SAMPLE_MASK: u32 = 0xFF_FFFF;

/// One completed conversion: the raw bit pattern and its signed decode.
///
/// `value` is `None` for an invalid sample. The sentinel keeps its slot in
/// the history so raw and signed entries stay aligned by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Raw 24-bit two's-complement pattern as shifted off the data line.
    pub raw: u32,
    /// Signed decode of `raw`, or `None` for an invalid sample.
    pub value: Option<i32>,
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            raw: 0,
            value: Some(0),
        }
    }
}

/// Decodes a raw 24-bit conversion into a signed value.
///
/// Patterns with bit 23 set are negative two's complement; every genuine
/// 24-bit pattern is representable. `None` is returned only for inputs
/// wider than 24 bits, which cannot come from a correctly counted read.
pub fn decode(raw: u32) -> Option<i32> {
    if raw > SAMPLE_MASK {
        return None;
    }

    if raw & SIGN_BIT != 0 {
        Some(-(((raw ^ SAMPLE_MASK) + 1) as i32))
    } else {
        Some(raw as i32)
    }
}

/// Sample accumulator for one chip's data line.
///
/// Cells are created by [`Hx711`](crate::device::Hx711), one per data pin
/// in pin order, and driven exclusively by it, so every cell sharing the
/// clock line observes each pulse exactly once. The recorded history and
/// the calibration fields are the public surface.
pub struct LoadCell<DIN> {
    dout: DIN,
    acc: u32,
    history: Vec<Reading, READING_HISTORY>,
    offset: i32,
    scale: f32,
}

impl<DIN> LoadCell<DIN> {
    pub(crate) fn new(dout: DIN) -> Self {
        Self {
            dout,
            acc: 0,
            history: Vec::new(),
            offset: 0,
            scale: 1.0,
        }
    }

    pub(crate) fn release(self) -> DIN {
        self.dout
    }

    /// Zeroes the shift register at the start of a conversion cycle.
    pub(crate) fn begin_read(&mut self) {
        self.acc = 0;
    }

    /// Decodes the accumulated conversion and appends it to the history.
    ///
    /// The history holds the most recent [`READING_HISTORY`] conversions;
    /// when full, the oldest entry is evicted.
    pub(crate) fn finish_read(&mut self) -> Reading {
        let reading = Reading {
            raw: self.acc,
            value: decode(self.acc),
        };

        match reading.value {
            Some(value) => trace!("raw sample {} decoded to {}", reading.raw, value),
            None => warn!("invalid raw sample {}", reading.raw),
        }

        if self.history.is_full() {
            self.history.remove(0);
        }
        // eviction above guarantees room
        self.history.push(reading).ok();

        reading
    }

    /// Completed readings, oldest first.
    ///
    /// Grows by one entry per successful conversion cycle, holding at most
    /// the [`READING_HISTORY`] most recent, until [`clear_readings`] is
    /// called.
    ///
    /// [`clear_readings`]: Self::clear_readings
    pub fn readings(&self) -> &[Reading] {
        &self.history
    }

    /// The most recent completed reading.
    pub fn last(&self) -> Option<&Reading> {
        self.history.last()
    }

    /// Discards the recorded history.
    pub fn clear_readings(&mut self) {
        self.history.clear();
    }

    /// Tare offset for the downstream calibration layer.
    ///
    /// Never touched by the read protocol.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Sets the tare offset.
    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    /// Scale ratio for the downstream calibration layer.
    ///
    /// Never touched by the read protocol.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the scale ratio.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

impl<DIN, E> LoadCell<DIN>
where
    DIN: InputPin<Error = E>,
{
    /// A LOW data line signals a conversion is ready to be shifted out.
    pub(crate) fn is_ready(&mut self) -> core::result::Result<bool, E> {
        self.dout.is_low()
    }

    /// Shifts the data line's current level in as the next bit.
    pub(crate) fn sample_bit(&mut self) -> core::result::Result<(), E> {
        let bit = self.dout.is_high()? as u32;
        self.acc = (self.acc << 1) | bit;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, LoadCell, Reading, READING_HISTORY};

    // The pin is never touched by the methods under test.
    struct UnusedPin;

    fn cell() -> LoadCell<UnusedPin> {
        LoadCell::new(UnusedPin)
    }

    #[test]
    fn decode_passes_non_negative_patterns_through() {
        assert_eq!(decode(0x00_0000), Some(0));
        assert_eq!(decode(0x00_0001), Some(1));
        assert_eq!(decode(0x12_3456), Some(0x12_3456));
        assert_eq!(decode(0x7F_FFFF), Some(8_388_607));
    }

    #[test]
    fn decode_recovers_negative_twos_complement_patterns() {
        assert_eq!(decode(0x80_0000), Some(-8_388_608));
        assert_eq!(decode(0xFF_FFFF), Some(-1));
        assert_eq!(decode(0xFF_FFF3), Some(-13));
    }

    #[test]
    fn decode_flags_patterns_wider_than_a_read() {
        assert_eq!(decode(0x100_0000), None);
        assert_eq!(decode(u32::MAX), None);
    }

    #[test]
    fn zeroed_accumulator_finalizes_to_zero() {
        let mut cell = cell();
        cell.begin_read();
        let reading = cell.finish_read();

        assert_eq!(
            reading,
            Reading {
                raw: 0,
                value: Some(0)
            }
        );
        assert_eq!(cell.readings(), &[reading]);
    }

    #[test]
    fn finish_read_appends_in_conversion_order() {
        let mut cell = cell();
        for raw in [0x00_0001, 0x80_0000, 0xFF_FFFF] {
            cell.begin_read();
            cell.acc = raw;
            cell.finish_read();
        }

        let raws: [u32; 3] = [
            cell.readings()[0].raw,
            cell.readings()[1].raw,
            cell.readings()[2].raw,
        ];
        assert_eq!(raws, [0x00_0001, 0x80_0000, 0xFF_FFFF]);
        assert_eq!(cell.last(), Some(&cell.readings()[2]));
    }

    #[test]
    fn full_history_evicts_the_oldest_reading() {
        let mut cell = cell();
        for raw in 0..(READING_HISTORY as u32 + 1) {
            cell.begin_read();
            cell.acc = raw;
            cell.finish_read();
        }

        assert_eq!(cell.readings().len(), READING_HISTORY);
        assert_eq!(cell.readings()[0].raw, 1);
        assert_eq!(cell.last().unwrap().raw, READING_HISTORY as u32);
    }

    #[test]
    fn clear_readings_empties_the_history() {
        let mut cell = cell();
        cell.begin_read();
        cell.finish_read();
        cell.clear_readings();

        assert!(cell.readings().is_empty());
        assert_eq!(cell.last(), None);
    }

    #[test]
    fn calibration_fields_default_to_identity() {
        let mut cell = cell();
        assert_eq!(cell.offset(), 0);
        assert_eq!(cell.scale(), 1.0);

        cell.set_offset(-42);
        cell.set_scale(0.5);
        assert_eq!(cell.offset(), -42);
        assert_eq!(cell.scale(), 0.5);
    }
}
