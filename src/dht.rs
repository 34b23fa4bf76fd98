use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::config::Config;
use crate::error::DhtError;
use crate::frame::{self, FRAME_LEN, Frame};
use crate::hal::{Clock, DataLine};
use crate::interrupt::{InterruptControl, InterruptFree};
use crate::pulse::{self, PULSE_COUNT, PulseTable, TIMEOUT};

/// Driver for a DHT-family humidity sensor on a single data line.
///
/// Holds the data line, the timebase, a delay provider and interrupt
/// control, together with the state of the last acquisition. Every sensor
/// gets its own instance.
pub struct Dht<LINE, CLOCK, DELAY, IRQ>
where
    LINE: DataLine,
{
    line: LINE,
    clock: CLOCK,
    delay: DELAY,
    interrupts: IRQ,
    config: Config,
    max_cycles: u32,
    last_read_ms: u32,
    last_result: bool,
    last_error: Option<DhtError<LINE::Error>>,
    frame: Frame,
}

impl<LINE, CLOCK, DELAY, IRQ> Dht<LINE, CLOCK, DELAY, IRQ>
where
    LINE: DataLine,
    CLOCK: Clock,
    DELAY: DelayNs,
    IRQ: InterruptControl,
{
    /// Creates a new driver and puts the data line into its idle state.
    ///
    /// # Arguments
    ///
    /// * `line` - The sensor data line.
    /// * `clock` - Millisecond timebase used for rate limiting.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `interrupts` - Interrupt control for the timing-critical part of a read.
    /// * `config` - Timing constants.
    ///
    /// The first call to [`read`](Self::read) always talks to the sensor.
    pub fn new(
        mut line: LINE,
        clock: CLOCK,
        delay: DELAY,
        interrupts: IRQ,
        config: Config,
    ) -> Result<Self, DhtError<LINE::Error>> {
        line.set_input_pullup()?;

        // Pretend the last read happened exactly one interval ago. Wraps
        // the same way the elapsed-time subtraction does.
        let last_read_ms = clock.now_ms().wrapping_sub(config.min_interval.to_millis());

        Ok(Dht {
            line,
            clock,
            delay,
            interrupts,
            max_cycles: config.max_cycles(),
            config,
            last_read_ms,
            last_result: false,
            last_error: None,
            frame: Frame::default(),
        })
    }

    /// Reads the sensor and returns whether a valid frame is available.
    ///
    /// Unless `force` is set, a call made less than `min_interval` after the
    /// previous acquisition does not touch the line and returns the previous
    /// result.
    pub fn read(&mut self, force: bool) -> bool {
        let now = self.clock.now_ms();
        let min_interval = self.config.min_interval.to_millis();
        if !force && !interval_elapsed(now, self.last_read_ms, min_interval) {
            debug!("returning cached result");
            return self.last_result;
        }

        debug!("starting new acquisition");
        self.last_read_ms = now;
        self.frame = Frame::default();

        match self.acquire() {
            Ok(frame) => {
                self.frame = frame;
                self.last_result = true;
                self.last_error = None;
            }
            Err(err) => {
                self.last_result = false;
                self.last_error = Some(err);
            }
        }
        self.last_result
    }

    /// Reads the sensor (subject to rate limiting) and returns the relative
    /// humidity in percent.
    ///
    /// Returns `None` if the last acquisition failed, so a stale or zeroed
    /// buffer is never reported as a measurement.
    pub fn read_humidity(&mut self) -> Option<f32> {
        self.read(false);
        let humidity = self.frame().map(Frame::humidity);
        if let Some(value) = humidity {
            debug!("humidity raw: {}, value: {}", self.frame.humidity_raw(), value);
        }
        humidity
    }

    /// Runs one full acquisition, ignoring rate limiting.
    ///
    /// This sends the start signal, waits for the sensor's handshake,
    /// captures the 80 data pulses, decodes them and validates the checksum.
    /// It does not update the cached result used by [`read`](Self::read).
    pub fn acquire(&mut self) -> Result<Frame, DhtError<LINE::Error>> {
        self.start()?;

        let pulses = self.capture()?;
        let frame = Frame::decode(&pulses).ok_or(DhtError::Timeout)?;

        let bytes = frame.bytes();
        let expected = frame::checksum(&bytes[..FRAME_LEN - 1]);
        if expected != frame.checksum() {
            warn!("checksum failure");
            return Err(DhtError::ChecksumMismatch {
                expected,
                received: frame.checksum(),
            });
        }

        debug!("checksum matches");
        Ok(frame)
    }

    /// The last frame, if the last acquisition succeeded.
    pub fn frame(&self) -> Option<&Frame> {
        self.last_result.then_some(&self.frame)
    }

    /// Raw payload buffer.
    ///
    /// Only meaningful when [`last_result`](Self::last_result) is `true`.
    pub fn data(&self) -> &[u8; FRAME_LEN] {
        self.frame.bytes()
    }

    /// Whether the last acquisition produced a valid frame.
    pub fn last_result(&self) -> bool {
        self.last_result
    }

    /// Why the last acquisition failed, if it did.
    pub fn last_error(&self) -> Option<&DhtError<LINE::Error>> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Polling budget for a single pulse, derived from the config.
    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    /// Releases the hardware resources.
    pub fn release(self) -> (LINE, CLOCK, DELAY, IRQ) {
        (self.line, self.clock, self.delay, self.interrupts)
    }

    /// Sends the start signal.
    ///
    /// Lets the line float high for a moment, drives it low long enough to
    /// wake the sensor, then releases it and waits for the sensor to take over.
    fn start(&mut self) -> Result<(), DhtError<LINE::Error>> {
        self.line.set_input_pullup()?;
        self.delay.delay_ms(self.config.wakeup_settle.to_millis());

        // MCU sends start request
        self.line.set_output()?;
        self.line.write(PinState::Low)?;
        self.delay.delay_us(self.config.start_low.to_micros());

        self.line.set_input_pullup()?;
        self.delay.delay_us(self.config.pull_time.to_micros());
        Ok(())
    }

    /// Waits for the handshake and records the 80 data pulses.
    ///
    /// Runs with interrupts disabled; they are enabled again on every return.
    fn capture(&mut self) -> Result<PulseTable, DhtError<LINE::Error>> {
        let max_cycles = self.max_cycles;
        let line = &mut self.line;
        let _irq = InterruptFree::new(&mut self.interrupts);

        // Sensor answers with ~80us low then ~80us high
        if pulse::expect_pulse(line, PinState::Low, max_cycles)? == TIMEOUT {
            warn!("no handshake (low)");
            return Err(DhtError::Timeout);
        }
        if pulse::expect_pulse(line, PinState::High, max_cycles)? == TIMEOUT {
            warn!("no handshake (high)");
            return Err(DhtError::Timeout);
        }

        // Timeouts here are left in the table and caught while decoding
        let mut pulses = [0; PULSE_COUNT];
        for pair in pulses.chunks_exact_mut(2) {
            pair[0] = pulse::expect_pulse(line, PinState::Low, max_cycles)?;
            pair[1] = pulse::expect_pulse(line, PinState::High, max_cycles)?;
        }
        Ok(pulses)
    }
}

/// Whether at least `interval` ms passed between `last` and `now`.
///
/// The subtraction wraps, so this stays correct across a timer overflow.
fn interval_elapsed(now: u32, last: u32, interval: u32) -> bool {
    now.wrapping_sub(last) >= interval
}
