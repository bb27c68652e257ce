use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Logical actions the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    RotateLeft,
    RotateRight,
    Fire,
}

impl Action {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            Action::Forward => 1 << 0,
            Action::Backward => 1 << 1,
            Action::RotateLeft => 1 << 2,
            Action::RotateRight => 1 << 3,
            Action::Fire => 1 << 4,
        }
    }
}

/// Per-frame snapshot of which actions are held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    bits: u8,
}

impl InputState {
    pub fn with(mut self, action: Action) -> Self {
        self.bits |= action.bit();
        self
    }

    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }
}

/// Held-action flags shared between the event source and the frame loop.
///
/// Events flip individual bits; the frame loop reads all of them with a
/// single atomic load so it never sees a half-applied update.
#[derive(Clone, Debug, Default)]
pub struct SharedInput {
    bits: Arc<AtomicU8>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, action: Action) {
        self.bits.fetch_or(action.bit(), Ordering::AcqRel);
    }

    pub fn release(&self, action: Action) {
        self.bits.fetch_and(!action.bit(), Ordering::AcqRel);
    }

    pub fn snapshot(&self) -> InputState {
        InputState {
            bits: self.bits.load(Ordering::Acquire),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_are_independent() {
        let input = SharedInput::new();
        input.press(Action::Forward);
        input.press(Action::RotateLeft);
        input.release(Action::Forward);

        let snap = input.snapshot();
        assert!(!snap.is_held(Action::Forward));
        assert!(snap.is_held(Action::RotateLeft));
        assert!(!snap.is_held(Action::Fire));
    }

    #[test]
    fn clones_share_state_across_threads() {
        let input = SharedInput::new();
        let writer = input.clone();
        std::thread::spawn(move || writer.press(Action::Fire))
            .join()
            .unwrap();
        assert!(input.snapshot().is_held(Action::Fire));
    }
}
