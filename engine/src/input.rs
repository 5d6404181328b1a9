use std::collections::HashSet;

use winit::event::VirtualKeyCode;

/// Keyboard state collected over one rendered frame.
///
/// `keys_pressed` and `keys_released` are edge sets cleared at the end of each
/// frame; `keys_down` tracks held keys across frames. OS key auto-repeat is
/// filtered out: a key only re-enters `keys_pressed` after a real release.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<VirtualKeyCode>,
    pub keys_down: HashSet<VirtualKeyCode>,
    pub keys_released: HashSet<VirtualKeyCode>,
}

impl InputFrame {
    pub fn pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn held(&self, key: VirtualKeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn on_key_pressed(&mut self, key: VirtualKeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn on_key_released(&mut self, key: VirtualKeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    /// Drop the per-frame edge sets; held keys carry over.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}
