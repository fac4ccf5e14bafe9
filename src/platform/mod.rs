//! Window control surface
//!
//! States talk to the OS window exclusively through [`WindowControl`]: they
//! read the framebuffer size and fullscreen status, and queue requests
//! (fullscreen, cursor mode, title, close) that the winit shell applies
//! once the frame ends. Tests drive states against a bare `WindowControl`
//! with no window behind it.

pub mod input;

pub use input::{InputSnapshot, Key};

/// Snapshot of window status plus pending requests for the shell
#[derive(Debug, Clone)]
pub struct WindowControl {
    framebuffer_width: u32,
    framebuffer_height: u32,
    fullscreen: bool,
    cursor_enabled: bool,
    should_close: bool,
    title: String,

    fullscreen_dirty: bool,
    cursor_dirty: bool,
    title_dirty: bool,
}

impl WindowControl {
    pub fn new(framebuffer_width: u32, framebuffer_height: u32) -> Self {
        Self {
            framebuffer_width,
            framebuffer_height,
            fullscreen: false,
            cursor_enabled: true,
            should_close: false,
            title: String::new(),
            fullscreen_dirty: false,
            cursor_dirty: false,
            title_dirty: false,
        }
    }

    pub fn width_of_framebuffer_in_pix(&self) -> u32 {
        self.framebuffer_width
    }

    pub fn height_of_framebuffer_in_pix(&self) -> u32 {
        self.framebuffer_height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.framebuffer_width as f32 / self.framebuffer_height.max(1) as f32
    }

    /// Called by the shell when the framebuffer size changes
    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_width = width.max(1);
        self.framebuffer_height = height.max(1);
    }

    pub fn is_full_screen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_full_screen(&mut self, fullscreen: bool) {
        if self.fullscreen != fullscreen {
            self.fullscreen = fullscreen;
            self.fullscreen_dirty = true;
        }
    }

    pub fn cursor_is_enabled(&self) -> bool {
        self.cursor_enabled
    }

    pub fn enable_cursor(&mut self, enable: bool) {
        if self.cursor_enabled != enable {
            self.cursor_enabled = enable;
            self.cursor_dirty = true;
        }
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if self.title != title {
            self.title = title;
            self.title_dirty = true;
        }
    }

    /// Drain the pending fullscreen request, if any
    pub fn take_fullscreen_request(&mut self) -> Option<bool> {
        if self.fullscreen_dirty {
            self.fullscreen_dirty = false;
            Some(self.fullscreen)
        } else {
            None
        }
    }

    /// Drain the pending cursor-mode request, if any
    pub fn take_cursor_request(&mut self) -> Option<bool> {
        if self.cursor_dirty {
            self.cursor_dirty = false;
            Some(self.cursor_enabled)
        } else {
            None
        }
    }

    /// Drain the pending title request, if any
    pub fn take_title_request(&mut self) -> Option<String> {
        if self.title_dirty {
            self.title_dirty = false;
            Some(self.title.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_drained_once() {
        let mut window = WindowControl::new(1280, 720);

        window.set_full_screen(true);
        assert!(window.is_full_screen());
        assert_eq!(window.take_fullscreen_request(), Some(true));
        assert_eq!(window.take_fullscreen_request(), None);
    }

    #[test]
    fn test_redundant_request_is_not_queued() {
        let mut window = WindowControl::new(1280, 720);
        window.enable_cursor(true); // already enabled
        assert_eq!(window.take_cursor_request(), None);

        window.enable_cursor(false);
        assert_eq!(window.take_cursor_request(), Some(false));
    }

    #[test]
    fn test_framebuffer_size_never_zero() {
        let mut window = WindowControl::new(1280, 720);
        window.set_framebuffer_size(0, 0);
        assert_eq!(window.width_of_framebuffer_in_pix(), 1);
        assert_eq!(window.height_of_framebuffer_in_pix(), 1);
    }

    #[test]
    fn test_title_request() {
        let mut window = WindowControl::new(800, 600);
        window.set_title("Teapong");
        assert_eq!(window.take_title_request().as_deref(), Some("Teapong"));
        window.set_title("Teapong"); // unchanged, no request
        assert_eq!(window.take_title_request(), None);
    }
}
