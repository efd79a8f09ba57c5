//! Strongly typed channel and gain parameters for the HX711 driver.
//!
//! The HX711 has no configuration registers: the input channel and the
//! programmable-gain-amplifier setting used for the *next* conversion are
//! encoded in the number of clock pulses appended after each 24-bit read.
//! Prefer these types over raw pulse counts to keep settings valid and
//! explicit.
//!
//! # Examples
//!
//! ```rust
//! use hx711_multi::params::{Channel, ChannelGain, Gain};
//!
//! let setting = ChannelGain::from_parts(Channel::A, Gain::G64).unwrap();
//! assert_eq!(setting.total_pulses(), 27);
//! ```

use crate::cell::SAMPLE_BITS;
use crate::config::ConfigError;

/// Input channel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel A, the primary differential input (gain 128 or 64).
    A,
    /// Channel B, the secondary differential input (fixed gain 32).
    B,
}

/// Programmable gain amplifier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// Gain factor 128 (channel A only).
    G128,
    /// Gain factor 64 (channel A only).
    G64,
    /// Gain factor 32 (channel B only).
    G32,
}

impl Gain {
    /// Returns the amplification factor as an integer value.
    pub const fn factor(self) -> u32 {
        match self {
            Self::G128 => 128,
            Self::G64 => 64,
            Self::G32 => 32,
        }
    }
}

/// Validated joint channel/gain setting.
///
/// The chip supports exactly three combinations; the enum makes the invalid
/// ones unrepresentable. The discriminant is the number of trailing clock
/// pulses that arm the setting for the next conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChannelGain {
    /// Channel A, gain 128 (1 trailing pulse, 25 per conversion).
    A128 = 1,
    /// Channel B, gain 32 (2 trailing pulses, 26 per conversion).
    B32 = 2,
    /// Channel A, gain 64 (3 trailing pulses, 27 per conversion).
    A64 = 3,
}

impl ChannelGain {
    /// Builds a setting from separate channel and gain selections.
    ///
    /// Fails with [`ConfigError::UnsupportedGain`] for combinations the
    /// chip cannot express, e.g. channel B with gain 128.
    pub fn from_parts(channel: Channel, gain: Gain) -> core::result::Result<Self, ConfigError> {
        match (channel, gain) {
            (Channel::A, Gain::G128) => Ok(Self::A128),
            (Channel::A, Gain::G64) => Ok(Self::A64),
            (Channel::B, Gain::G32) => Ok(Self::B32),
            _ => Err(ConfigError::UnsupportedGain { channel, gain }),
        }
    }

    /// The input channel this setting selects.
    pub const fn channel(self) -> Channel {
        match self {
            Self::A128 | Self::A64 => Channel::A,
            Self::B32 => Channel::B,
        }
    }

    /// The gain this setting selects.
    pub const fn gain(self) -> Gain {
        match self {
            Self::A128 => Gain::G128,
            Self::A64 => Gain::G64,
            Self::B32 => Gain::G32,
        }
    }

    /// Clock pulses appended after the 24 data bits.
    pub const fn extra_pulses(self) -> u8 {
        self as u8
    }

    /// Total clock pulses in one conversion cycle (24 data + trailing).
    pub const fn total_pulses(self) -> u8 {
        SAMPLE_BITS as u8 + self.extra_pulses()
    }
}

impl Default for ChannelGain {
    fn default() -> Self {
        Self::A128
    }
}

#[cfg(test)]
mod tests {
    use super::{Channel, ChannelGain, Gain};
    use crate::config::ConfigError;

    #[test]
    fn pulse_counts_match_the_chip_table() {
        assert_eq!(ChannelGain::A128.extra_pulses(), 1);
        assert_eq!(ChannelGain::B32.extra_pulses(), 2);
        assert_eq!(ChannelGain::A64.extra_pulses(), 3);

        assert_eq!(ChannelGain::A128.total_pulses(), 25);
        assert_eq!(ChannelGain::B32.total_pulses(), 26);
        assert_eq!(ChannelGain::A64.total_pulses(), 27);
    }

    #[test]
    fn from_parts_accepts_the_three_supported_combinations() {
        assert_eq!(
            ChannelGain::from_parts(Channel::A, Gain::G128),
            Ok(ChannelGain::A128)
        );
        assert_eq!(
            ChannelGain::from_parts(Channel::A, Gain::G64),
            Ok(ChannelGain::A64)
        );
        assert_eq!(
            ChannelGain::from_parts(Channel::B, Gain::G32),
            Ok(ChannelGain::B32)
        );
    }

    #[test]
    fn from_parts_rejects_unsupported_combinations() {
        assert_eq!(
            ChannelGain::from_parts(Channel::B, Gain::G128),
            Err(ConfigError::UnsupportedGain {
                channel: Channel::B,
                gain: Gain::G128,
            })
        );
        assert!(ChannelGain::from_parts(Channel::B, Gain::G64).is_err());
        assert!(ChannelGain::from_parts(Channel::A, Gain::G32).is_err());
    }

    #[test]
    fn setting_round_trips_through_its_parts() {
        for setting in [ChannelGain::A128, ChannelGain::A64, ChannelGain::B32] {
            assert_eq!(
                ChannelGain::from_parts(setting.channel(), setting.gain()),
                Ok(setting)
            );
        }
    }
}
