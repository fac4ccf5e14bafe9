//! Debug frame recorder
//!
//! The win sequence can be captured to disk as a numbered image sequence.
//! The recorder is injected at game construction and defaults to a no-op;
//! the renderer only performs the (expensive) readback when a recorder
//! reports itself active.

use std::io;
use std::path::PathBuf;

/// One resolved frame read back from the GPU, tightly packed RGBA8
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Injectable capture channel
pub trait FrameRecorder {
    /// Whether frames should be read back and recorded at all
    fn is_active(&self) -> bool;

    fn record(&mut self, frame: &CapturedFrame) -> io::Result<()>;
}

/// Default recorder: never active, records nothing
#[derive(Debug, Default)]
pub struct NullRecorder;

impl FrameRecorder for NullRecorder {
    fn is_active(&self) -> bool {
        false
    }

    fn record(&mut self, _frame: &CapturedFrame) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `frame_NNNNN.png` files into a directory
pub struct PngSequenceRecorder {
    directory: PathBuf,
    next_index: u32,
}

impl PngSequenceRecorder {
    pub fn new(directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            next_index: 0,
        })
    }

    pub fn frames_written(&self) -> u32 {
        self.next_index
    }
}

impl FrameRecorder for PngSequenceRecorder {
    fn is_active(&self) -> bool {
        true
    }

    fn record(&mut self, frame: &CapturedFrame) -> io::Result<()> {
        let path = self
            .directory
            .join(format!("frame_{:05}.png", self.next_index));
        image::save_buffer(
            &path,
            &frame.rgba,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(io::Error::other)?;
        self.next_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_recorder_is_inert() {
        let mut recorder = NullRecorder;
        assert!(!recorder.is_active());
        let frame = CapturedFrame {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        };
        assert!(recorder.record(&frame).is_ok());
    }

    #[test]
    fn test_png_recorder_writes_numbered_frames() {
        let dir = std::env::temp_dir().join("teapong-capture-test");
        let _ = std::fs::remove_dir_all(&dir);

        let mut recorder = PngSequenceRecorder::new(&dir).unwrap();
        assert!(recorder.is_active());

        let frame = CapturedFrame {
            width: 2,
            height: 2,
            rgba: vec![255; 16],
        };
        recorder.record(&frame).unwrap();
        recorder.record(&frame).unwrap();

        assert_eq!(recorder.frames_written(), 2);
        assert!(dir.join("frame_00000.png").exists());
        assert!(dir.join("frame_00001.png").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
