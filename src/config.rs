//! Configuration primitives for the HX711 driver.

use crate::params::{Channel, ChannelGain, Gain};

// Protocol timing defaults, from the chip's documented behavior: 20 polls
// 10 ms apart bound the ready wait to ~200 ms, and a clock held HIGH for
// 60 us sends the chip into power-down mode.
const DEFAULT_READY_RETRIES: u8 = 20;
const DEFAULT_READY_POLL_DELAY_US: u32 = 10_000;
const DEFAULT_MAX_PULSE_WIDTH_US: u64 = 60;

/// User-facing configuration for an [`Hx711`](crate::device::Hx711) rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Channel/gain setting armed for the next conversion.
    pub channel_gain: ChannelGain,
    /// Number of ready polls before a conversion attempt gives up.
    pub ready_retries: u8,
    /// Wait between ready polls, in microseconds.
    pub ready_poll_delay_us: u32,
    /// Clock pulse width at which the chip is presumed powered down, in
    /// microseconds.
    pub max_pulse_width_us: u64,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is usable for the read protocol.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.ready_retries == 0 {
            return Err(ConfigError::NoReadyPolls);
        }

        if self.max_pulse_width_us == 0 {
            return Err(ConfigError::ZeroPulseBudget);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the channel/gain setting.
    pub fn channel_gain(mut self, channel_gain: ChannelGain) -> Self {
        self.config.channel_gain = channel_gain;
        self
    }

    /// Overrides the number of ready polls per conversion attempt.
    pub fn ready_retries(mut self, ready_retries: u8) -> Self {
        self.config.ready_retries = ready_retries;
        self
    }

    /// Overrides the wait between ready polls.
    pub fn ready_poll_delay_us(mut self, ready_poll_delay_us: u32) -> Self {
        self.config.ready_poll_delay_us = ready_poll_delay_us;
        self
    }

    /// Overrides the power-down pulse width budget.
    pub fn max_pulse_width_us(mut self, max_pulse_width_us: u64) -> Self {
        self.config.max_pulse_width_us = max_pulse_width_us;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_gain: ChannelGain::default(),
            ready_retries: DEFAULT_READY_RETRIES,
            ready_poll_delay_us: DEFAULT_READY_POLL_DELAY_US,
            max_pulse_width_us: DEFAULT_MAX_PULSE_WIDTH_US,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The requested channel does not support the requested gain.
    UnsupportedGain {
        /// Requested input channel.
        channel: Channel,
        /// Requested gain selection.
        gain: Gain,
    },
    /// The ready-poll budget must allow at least one poll.
    NoReadyPolls,
    /// The power-down pulse budget must be non-zero.
    ZeroPulseBudget,
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use crate::params::ChannelGain;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.channel_gain, ChannelGain::A128);
        assert_eq!(config.ready_retries, 20);
        assert_eq!(config.ready_poll_delay_us, 10_000);
        assert_eq!(config.max_pulse_width_us, 60);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let config = Config::new()
            .channel_gain(ChannelGain::B32)
            .ready_retries(5)
            .ready_poll_delay_us(1_000)
            .max_pulse_width_us(100)
            .build();

        assert_eq!(config.channel_gain, ChannelGain::B32);
        assert_eq!(config.ready_retries, 5);
        assert_eq!(config.ready_poll_delay_us, 1_000);
        assert_eq!(config.max_pulse_width_us, 100);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_ready_polls_is_rejected() {
        let config = Config::new().ready_retries(0).build();
        assert_eq!(config.validate(), Err(ConfigError::NoReadyPolls));
    }

    #[test]
    fn zero_pulse_budget_is_rejected() {
        let config = Config::new().max_pulse_width_us(0).build();
        assert_eq!(config.validate(), Err(ConfigError::ZeroPulseBudget));
    }
}
