use fugit::{MicrosDurationU32, MillisDurationU32};

use crate::pulse::TIMEOUT;

/// Timing constants used by the [`Dht`](crate::Dht) driver.
///
/// The defaults match a DHT22/AM2302 polled by a 1 MHz loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Minimum time between two acquisitions. Faster reads return the cached result.
    pub min_interval: MillisDurationU32,
    /// How long the line is left floating high before the start signal.
    pub wakeup_settle: MillisDurationU32,
    /// Length of the host start signal (line driven low).
    pub start_low: MicrosDurationU32,
    /// Delay after releasing the line before the sensor's answer is sampled.
    ///
    /// This depends on the sensor model.
    pub pull_time: MicrosDurationU32,
    /// Longest pulse accepted before it is reported as a timeout.
    pub pulse_timeout: MicrosDurationU32,
    /// Polling iterations per microsecond on the target.
    pub cycles_per_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_interval: MillisDurationU32::millis(2000),
            wakeup_settle: MillisDurationU32::millis(1),
            start_low: MicrosDurationU32::micros(1100),
            pull_time: MicrosDurationU32::micros(55),
            pulse_timeout: MicrosDurationU32::millis(1),
            cycles_per_us: 1,
        }
    }
}

impl Config {
    pub fn with_min_interval(mut self, min_interval: MillisDurationU32) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_wakeup_settle(mut self, wakeup_settle: MillisDurationU32) -> Self {
        self.wakeup_settle = wakeup_settle;
        self
    }

    pub fn with_start_low(mut self, start_low: MicrosDurationU32) -> Self {
        self.start_low = start_low;
        self
    }

    pub fn with_pull_time(mut self, pull_time: MicrosDurationU32) -> Self {
        self.pull_time = pull_time;
        self
    }

    pub fn with_pulse_timeout(mut self, pulse_timeout: MicrosDurationU32) -> Self {
        self.pulse_timeout = pulse_timeout;
        self
    }

    pub fn with_cycles_per_us(mut self, cycles_per_us: u32) -> Self {
        self.cycles_per_us = cycles_per_us;
        self
    }

    /// Polling budget for a single pulse.
    ///
    /// Kept strictly below [`TIMEOUT`] so a real count can never be mistaken
    /// for the sentinel.
    pub fn max_cycles(&self) -> u32 {
        self.pulse_timeout
            .to_micros()
            .saturating_mul(self.cycles_per_us)
            .min(TIMEOUT - 1)
    }
}
