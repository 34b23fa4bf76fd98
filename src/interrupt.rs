//! Interrupt suppression around the timing-critical part of a read.

/// Controls delivery of interrupts (or other preemption) on the target.
pub trait InterruptControl {
    /// Stop interrupts from being serviced.
    fn disable(&mut self);

    /// Resume interrupt delivery.
    fn enable(&mut self);
}

impl<T: InterruptControl + ?Sized> InterruptControl for &mut T {
    fn disable(&mut self) {
        T::disable(self)
    }

    fn enable(&mut self) {
        T::enable(self)
    }
}

/// Leaves interrupts untouched.
///
/// For hosted targets, or when the caller already runs the read with
/// interrupts masked.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterruptControl;

impl InterruptControl for NoInterruptControl {
    fn disable(&mut self) {}

    fn enable(&mut self) {}
}

/// Interrupts stay disabled for as long as this guard lives.
///
/// Dropping the guard re-enables them, so every exit path of the enclosing
/// scope (including `?` and early returns) releases the section.
pub struct InterruptFree<'a, I: InterruptControl + ?Sized> {
    ctrl: &'a mut I,
}

impl<'a, I: InterruptControl + ?Sized> InterruptFree<'a, I> {
    pub fn new(ctrl: &'a mut I) -> Self {
        ctrl.disable();
        InterruptFree { ctrl }
    }
}

impl<I: InterruptControl + ?Sized> Drop for InterruptFree<'_, I> {
    fn drop(&mut self) {
        self.ctrl.enable();
    }
}

/// [`InterruptControl`] backed by the `critical-section` crate.
///
/// Only one section is held at a time; a second `disable` while already
/// disabled is ignored.
#[cfg(feature = "critical-section")]
#[derive(Default)]
pub struct CriticalSectionControl {
    restore: Option<critical_section::RestoreState>,
}

#[cfg(feature = "critical-section")]
impl CriticalSectionControl {
    pub const fn new() -> Self {
        CriticalSectionControl { restore: None }
    }

    /// Whether a critical section is currently held.
    pub fn is_active(&self) -> bool {
        self.restore.is_some()
    }
}

#[cfg(feature = "critical-section")]
impl InterruptControl for CriticalSectionControl {
    fn disable(&mut self) {
        if self.restore.is_none() {
            // SAFETY: the matching release happens in `enable` or `drop`,
            // with the state returned here.
            self.restore = Some(unsafe { critical_section::acquire() });
        }
    }

    fn enable(&mut self) {
        if let Some(state) = self.restore.take() {
            // SAFETY: `state` came from the `acquire` in `disable`.
            unsafe { critical_section::release(state) };
        }
    }
}

#[cfg(feature = "critical-section")]
impl Drop for CriticalSectionControl {
    fn drop(&mut self) {
        self.enable();
    }
}
