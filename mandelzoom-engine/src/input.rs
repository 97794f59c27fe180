/// Keys the engine cares about; the host maps its own key codes onto these.
///
/// `Modifier` is the designated chord modifier (e.g. the command/super
/// keys), `Undo` the designated letter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Modifier,
    Undo,
    Other,
}

/// Latch for the undo chord: modifier held down plus the letter key.
///
/// The latch is updated by key-down/key-up and only consulted by the
/// trigger check, so an undo never changes modifier state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordTracker {
    modifier_held: bool,
}

impl ChordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key transition; returns `true` when the undo chord fired.
    pub fn process(&mut self, key: Key, pressed: bool) -> bool {
        match (key, pressed) {
            (Key::Modifier, down) => {
                self.modifier_held = down;
                false
            }
            (Key::Undo, true) => self.modifier_held,
            _ => false,
        }
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_requires_modifier() {
        let mut chord = ChordTracker::new();
        assert!(!chord.process(Key::Undo, true));

        assert!(!chord.process(Key::Modifier, true));
        assert!(chord.process(Key::Undo, true));
    }

    #[test]
    fn releasing_modifier_disarms_chord() {
        let mut chord = ChordTracker::new();
        chord.process(Key::Modifier, true);
        chord.process(Key::Modifier, false);
        assert!(!chord.process(Key::Undo, true));
    }

    #[test]
    fn chord_repeats_while_held() {
        let mut chord = ChordTracker::new();
        chord.process(Key::Modifier, true);
        assert!(chord.process(Key::Undo, true));
        chord.process(Key::Undo, false);
        assert!(chord.process(Key::Undo, true));
    }

    #[test]
    fn other_keys_do_not_fire_or_disturb() {
        let mut chord = ChordTracker::new();
        chord.process(Key::Modifier, true);
        assert!(!chord.process(Key::Other, true));
        assert!(!chord.process(Key::Other, false));
        assert!(chord.process(Key::Undo, true), "modifier latch undisturbed");
    }

    #[test]
    fn undo_release_never_fires() {
        let mut chord = ChordTracker::new();
        chord.process(Key::Modifier, true);
        assert!(!chord.process(Key::Undo, false));
    }
}
