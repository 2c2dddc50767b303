//! Input management system
//!
//! The host owns the key state: it records key-down/key-up events into
//! [`KeyStates`] between frames, and the frame loop reads it once per frame.
//! Nothing in the engine or the game ever clears a key; one-shot actions are
//! derived with a [`ToggleLatch`] that fires on the released→pressed edge.

use std::collections::HashMap;

/// Pressed state per logical key name
///
/// Keys are stored lowercase, so `"C"` and `"c"` are the same key. Space is
/// the string `" "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStates {
    keys: HashMap<String, bool>,
}

impl KeyStates {
    /// Create an empty key map (every key released)
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down (`true`) or key-up (`false`)
    pub fn set(&mut self, key: &str, pressed: bool) {
        let key = key.to_lowercase();
        log::trace!("Key {:?} {}", key, if pressed { "down" } else { "up" });
        self.keys.insert(key, pressed);
    }

    /// Press a key
    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    /// Release a key
    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    /// Whether `key` is currently held; unknown keys are released
    pub fn is_pressed(&self, key: &str) -> bool {
        if let Some(pressed) = self.keys.get(key) {
            return *pressed;
        }
        self.keys.get(&key.to_lowercase()).copied().unwrap_or(false)
    }

    /// Keys currently held
    pub fn pressed_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter(|(_, pressed)| **pressed).map(|(key, _)| key.as_str())
    }
}

/// Rising-edge detector for toggle keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleLatch {
    was_pressed: bool,
}

impl ToggleLatch {
    /// Create a latch that considers the key released
    pub const fn new() -> Self {
        Self { was_pressed: false }
    }

    /// Feed this frame's key state; `true` exactly once per press
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_default_to_released() {
        let keys = KeyStates::new();
        assert!(!keys.is_pressed("w"));
        assert!(!keys.is_pressed(" "));
    }

    #[test]
    fn test_key_names_are_case_insensitive() {
        let mut keys = KeyStates::new();
        keys.press("C");
        assert!(keys.is_pressed("c"));
        assert!(keys.is_pressed("C"));
        keys.release("c");
        assert!(!keys.is_pressed("C"));
    }

    #[test]
    fn test_reading_never_clears() {
        let mut keys = KeyStates::new();
        keys.press(" ");
        for _ in 0..5 {
            assert!(keys.is_pressed(" "));
        }
        assert_eq!(keys.pressed_keys().collect::<Vec<_>>(), vec![" "]);
    }

    #[test]
    fn test_latch_fires_once_per_press() {
        let mut latch = ToggleLatch::new();
        let held = [false, true, true, true, false, true, false];
        let fired: Vec<bool> = held.iter().map(|pressed| latch.update(*pressed)).collect();
        assert_eq!(fired, vec![false, true, false, false, false, true, false]);
    }
}
