//! Keyboard/cursor/scroll snapshot
//!
//! Decoupled from winit so states and tests never touch the windowing
//! system. The shell feeds events in; states read the snapshot during
//! their input pass.
//!
//! Keys carry a "processed" latch for edge-triggered handling: a held key
//! reports pressed every frame, but `key_has_been_processed` lets a state
//! act exactly once per physical press. The latch clears on the next
//! press/release event for that key.

/// Generic key codes for the inputs the game binds, independent of the
/// windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    F,
    P,
    C,
    R,
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Digit1,
    Digit2,
    Digit4,
    Digit8,
}

impl Key {
    /// Number of tracked keys (array-index bound)
    pub const COUNT: usize = 19;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame input snapshot read by the active state
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    pressed: [bool; Key::COUNT],
    processed: [bool; Key::COUNT],

    mouse_moved: bool,
    cursor_x_offset: f32,
    cursor_y_offset: f32,

    scroll_wheel_moved: bool,
    scroll_y_offset: f32,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self {
            pressed: [false; Key::COUNT],
            processed: [false; Key::COUNT],
            mouse_moved: false,
            cursor_x_offset: 0.0,
            cursor_y_offset: 0.0,
            scroll_wheel_moved: false,
            scroll_y_offset: 0.0,
        }
    }

    /// Record a key press or release from the shell. Either event clears
    /// the processed latch so the next hold can be acted on again.
    pub fn set_key_pressed(&mut self, key: Key, pressed: bool) {
        self.pressed[key.index()] = pressed;
        self.processed[key.index()] = false;
    }

    pub fn key_is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    pub fn key_has_been_processed(&self, key: Key) -> bool {
        self.processed[key.index()]
    }

    pub fn set_key_as_processed(&mut self, key: Key) {
        self.processed[key.index()] = true;
    }

    /// One-shot check: pressed and not yet acted on this hold. Marks the
    /// key processed when it fires.
    pub fn take_key_press(&mut self, key: Key) -> bool {
        if self.key_is_pressed(key) && !self.key_has_been_processed(key) {
            self.set_key_as_processed(key);
            true
        } else {
            false
        }
    }

    /// Record cursor movement (already converted to per-event offsets,
    /// Y reversed so positive means "up")
    pub fn set_cursor_offsets(&mut self, x_offset: f32, y_offset: f32) {
        self.cursor_x_offset = x_offset;
        self.cursor_y_offset = y_offset;
        self.mouse_moved = true;
    }

    pub fn mouse_moved(&self) -> bool {
        self.mouse_moved
    }

    pub fn cursor_x_offset(&self) -> f32 {
        self.cursor_x_offset
    }

    pub fn cursor_y_offset(&self) -> f32 {
        self.cursor_y_offset
    }

    pub fn reset_mouse_moved(&mut self) {
        self.mouse_moved = false;
    }

    pub fn set_scroll_y_offset(&mut self, y_offset: f32) {
        self.scroll_y_offset = y_offset;
        self.scroll_wheel_moved = true;
    }

    pub fn scroll_wheel_moved(&self) -> bool {
        self.scroll_wheel_moved
    }

    pub fn scroll_y_offset(&self) -> f32 {
        self.scroll_y_offset
    }

    pub fn reset_scroll_wheel_moved(&mut self) {
        self.scroll_wheel_moved = false;
    }

    /// Release every key and clear the motion latches (used when the
    /// window loses focus so keys don't stick)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut input = InputSnapshot::new();
        assert!(!input.key_is_pressed(Key::Space));

        input.set_key_pressed(Key::Space, true);
        assert!(input.key_is_pressed(Key::Space));

        input.set_key_pressed(Key::Space, false);
        assert!(!input.key_is_pressed(Key::Space));
    }

    #[test]
    fn test_edge_trigger_fires_once_per_hold() {
        let mut input = InputSnapshot::new();
        input.set_key_pressed(Key::F, true);

        // First frame of the hold fires, later frames do not.
        assert!(input.take_key_press(Key::F));
        assert!(!input.take_key_press(Key::F));
        assert!(input.key_is_pressed(Key::F));

        // Releasing and pressing again re-arms the latch.
        input.set_key_pressed(Key::F, false);
        input.set_key_pressed(Key::F, true);
        assert!(input.take_key_press(Key::F));
    }

    #[test]
    fn test_mouse_latch_is_consumer_reset() {
        let mut input = InputSnapshot::new();
        input.set_cursor_offsets(3.0, -2.0);
        assert!(input.mouse_moved());
        assert_eq!(input.cursor_x_offset(), 3.0);
        assert_eq!(input.cursor_y_offset(), -2.0);

        input.reset_mouse_moved();
        assert!(!input.mouse_moved());
        // Offsets stay readable until the next event overwrites them.
        assert_eq!(input.cursor_x_offset(), 3.0);
    }

    #[test]
    fn test_scroll_latch() {
        let mut input = InputSnapshot::new();
        assert!(!input.scroll_wheel_moved());

        input.set_scroll_y_offset(1.5);
        assert!(input.scroll_wheel_moved());
        assert_eq!(input.scroll_y_offset(), 1.5);

        input.reset_scroll_wheel_moved();
        assert!(!input.scroll_wheel_moved());
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut input = InputSnapshot::new();
        input.set_key_pressed(Key::W, true);
        input.set_cursor_offsets(1.0, 1.0);
        input.reset();
        assert!(!input.key_is_pressed(Key::W));
        assert!(!input.mouse_moved());
    }
}
