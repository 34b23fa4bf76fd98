use embedded_hal::digital::PinState;

use crate::hal::DataLine;

/// Returned by [`expect_pulse`] when the line never changed level within the budget.
pub const TIMEOUT: u32 = u32::MAX;

/// Number of pulses captured per frame: a low and a high phase for each of the 40 bits.
pub const PULSE_COUNT: usize = 80;

/// Polling counts captured for one frame, in line order (low, high, low, high, ...).
pub type PulseTable = [u32; PULSE_COUNT];

/// Polls `line` while it still reads `level` and returns how many polls that took.
///
/// The count is a relative duration only; its unit depends on the speed of
/// the polling loop. If the line still reads `level` once `max_cycles`
/// polls have been counted, [`TIMEOUT`] is returned instead. A timeout is an
/// ordinary outcome (no sensor attached, for example) and is left to the
/// caller to handle.
///
/// # Errors
///
/// Only errors from the line itself are returned.
#[inline(always)]
pub fn expect_pulse<L>(line: &mut L, level: PinState, max_cycles: u32) -> Result<u32, L::Error>
where
    L: DataLine + ?Sized,
{
    let mut count: u32 = 0;
    while line.read()? == level {
        if count >= max_cycles {
            return Ok(TIMEOUT);
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::OpenDrainLine;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTx,
    };

    #[test]
    fn test_counts_polls_until_level_changes() {
        let mut pin = PinMock::new(&[
            PinTx::get(MockState::Low),
            PinTx::get(MockState::Low),
            PinTx::get(MockState::Low),
            // Level change ends the pulse, this poll is not counted
            PinTx::get(MockState::High),
        ]);

        let mut line = OpenDrainLine::new(pin.clone());
        assert_eq!(expect_pulse(&mut line, PinState::Low, 10).unwrap(), 3);

        pin.done();
    }

    #[test]
    fn test_already_changed_level_is_zero() {
        let mut pin = PinMock::new(&[PinTx::get(MockState::Low)]);

        let mut line = OpenDrainLine::new(pin.clone());
        assert_eq!(expect_pulse(&mut line, PinState::High, 10).unwrap(), 0);

        pin.done();
    }

    #[test]
    fn test_timeout_after_budget() {
        // The budget is checked before each increment, so one extra poll
        // is made before giving up.
        let pin_expects: Vec<PinTx> = (0..5).map(|_| PinTx::get(MockState::High)).collect();
        let mut pin = PinMock::new(&pin_expects);

        let mut line = OpenDrainLine::new(pin.clone());
        assert_eq!(expect_pulse(&mut line, PinState::High, 4).unwrap(), TIMEOUT);

        pin.done();
    }

    #[test]
    fn test_pulse_of_exactly_budget_length() {
        let mut pin_expects: Vec<PinTx> = (0..4).map(|_| PinTx::get(MockState::High)).collect();
        pin_expects.push(PinTx::get(MockState::Low));
        let mut pin = PinMock::new(&pin_expects);

        let mut line = OpenDrainLine::new(pin.clone());
        assert_eq!(expect_pulse(&mut line, PinState::High, 4).unwrap(), 4);

        pin.done();
    }
}
