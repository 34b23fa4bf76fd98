//! Hardware access used by the driver.
//!
//! The data line is reached through [`DataLine`]. [`OpenDrainLine`] is the
//! portable implementation on top of `embedded-hal` pins; a HAL with faster
//! register-level access can implement [`DataLine`] directly and is picked
//! by type at build time.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// A single bidirectional data line.
pub trait DataLine {
    type Error;

    /// Stop driving the line and let the pull-up raise it.
    fn set_input_pullup(&mut self) -> Result<(), Self::Error>;

    /// Prepare the line to be driven by [`write`](DataLine::write).
    fn set_output(&mut self) -> Result<(), Self::Error>;

    /// Drive the line to `state`.
    fn write(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Sample the current level of the line.
    fn read(&mut self) -> Result<PinState, Self::Error>;
}

impl<T: DataLine + ?Sized> DataLine for &mut T {
    type Error = T::Error;

    #[inline(always)]
    fn set_input_pullup(&mut self) -> Result<(), Self::Error> {
        T::set_input_pullup(self)
    }

    #[inline(always)]
    fn set_output(&mut self) -> Result<(), Self::Error> {
        T::set_output(self)
    }

    #[inline(always)]
    fn write(&mut self, state: PinState) -> Result<(), Self::Error> {
        T::write(self, state)
    }

    #[inline(always)]
    fn read(&mut self) -> Result<PinState, Self::Error> {
        T::read(self)
    }
}

/// [`DataLine`] over an `embedded-hal` pin configured as open-drain output.
///
/// With an open-drain pin and an external pull-up, "input with pull-up" is
/// the same as writing high, and the pin can be sampled at any time.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    /// Wraps an open-drain GPIO pin.
    pub fn new(pin: P) -> Self {
        OpenDrainLine { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> DataLine for OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    type Error = P::Error;

    fn set_input_pullup(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    fn set_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::Low => self.pin.set_low(),
            PinState::High => self.pin.set_high(),
        }
    }

    #[inline(always)]
    fn read(&mut self) -> Result<PinState, Self::Error> {
        Ok(PinState::from(self.pin.is_high()?))
    }
}

/// Millisecond timebase. Wraps around at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        C::now_ms(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTx,
    };

    #[test]
    fn test_open_drain_line() {
        let mut pin = PinMock::new(&[
            // set_input_pullup releases the line
            PinTx::set(MockState::High),
            // set_output leaves the pin alone, write drives it
            PinTx::set(MockState::Low),
            PinTx::get(MockState::Low),
            PinTx::set(MockState::High),
            PinTx::get(MockState::High),
        ]);

        let mut line = OpenDrainLine::new(pin.clone());
        line.set_input_pullup().unwrap();
        line.set_output().unwrap();
        line.write(PinState::Low).unwrap();
        assert_eq!(line.read().unwrap(), PinState::Low);
        line.write(PinState::High).unwrap();
        assert_eq!(line.read().unwrap(), PinState::High);

        pin.done();
    }
}
