//! Key bindings to per-frame control flags

use flight_engine::input::{KeyStates, ToggleLatch};

use crate::config::ControlsConfig;

/// Control flags for one frame
///
/// Steering and throttle flags mirror held keys. The two toggles are true
/// only on the frame their key goes down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    /// Negative pitch impulse
    pub pitch_left: bool,
    /// Positive pitch impulse
    pub pitch_right: bool,
    /// Negative roll impulse
    pub roll_up: bool,
    /// Positive roll impulse
    pub roll_down: bool,
    /// Accelerate
    pub thrust: bool,
    /// Decelerate
    pub brake: bool,
    /// Switch lens this frame
    pub toggle_projection: bool,
    /// Switch ship model this frame
    pub toggle_design: bool,
}

/// Reads [`ControlInput`] from the host's key state
#[derive(Debug, Clone)]
pub struct Controls {
    bindings: ControlsConfig,
    projection_latch: ToggleLatch,
    design_latch: ToggleLatch,
}

impl Controls {
    /// Controls using `bindings`
    pub const fn new(bindings: ControlsConfig) -> Self {
        Self { bindings, projection_latch: ToggleLatch::new(), design_latch: ToggleLatch::new() }
    }

    /// Sample this frame's flags
    pub fn read(&mut self, keys: &KeyStates) -> ControlInput {
        let b = &self.bindings;
        let input = ControlInput {
            pitch_left: keys.is_pressed(&b.pitch_left),
            pitch_right: keys.is_pressed(&b.pitch_right),
            roll_up: keys.is_pressed(&b.roll_up),
            roll_down: keys.is_pressed(&b.roll_down),
            thrust: keys.is_pressed(&b.thrust),
            brake: keys.is_pressed(&b.brake),
            toggle_projection: self.projection_latch.update(keys.is_pressed(&b.toggle_projection)),
            toggle_design: self.design_latch.update(keys.is_pressed(&b.toggle_design)),
        };
        if input != ControlInput::default() {
            log::trace!("Controls: {:?}", input);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let mut controls = Controls::new(ControlsConfig::default());
        let mut keys = KeyStates::new();
        keys.press("a");
        keys.press(" ");
        keys.press("S");

        let input = controls.read(&keys);
        assert!(input.pitch_left && input.thrust && input.roll_down);
        assert!(!input.pitch_right && !input.roll_up && !input.brake);
    }

    #[test]
    fn test_toggles_fire_once_per_press() {
        let mut controls = Controls::new(ControlsConfig::default());
        let mut keys = KeyStates::new();
        keys.press("c");

        assert!(controls.read(&keys).toggle_projection);
        assert!(!controls.read(&keys).toggle_projection);
        keys.release("c");
        assert!(!controls.read(&keys).toggle_projection);
        keys.press("c");
        assert!(controls.read(&keys).toggle_projection);
    }

    #[test]
    fn test_rebound_keys() {
        let bindings = ControlsConfig { thrust: "arrowup".to_string(), ..ControlsConfig::default() };
        let mut controls = Controls::new(bindings);
        let mut keys = KeyStates::new();
        keys.press(" ");
        assert!(!controls.read(&keys).thrust);
        keys.press("ArrowUp");
        assert!(controls.read(&keys).thrust);
    }
}
