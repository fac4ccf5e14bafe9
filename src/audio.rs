//! Sound cue sink
//!
//! The core only *requests* cues; playback lives behind [`AudioSink`] so a
//! real backend can be injected without the simulation ever knowing about
//! it. The default sink is a no-op, which also keeps headless tests silent.

/// Sound effect types the game can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits a side wall
    WallHit,
    /// Ball launched from the serve pose
    Serve,
    /// A point was scored
    Score,
    /// A side reached the win threshold
    Win,
}

/// Injectable cue consumer
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Default sink: swallows every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Records requested cues in order; used by tests to assert that gameplay
/// asked for the right sounds.
#[derive(Debug, Default)]
pub struct CueRecorder {
    pub cues: Vec<SoundEffect>,
}

impl AudioSink for CueRecorder {
    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_recorder_keeps_order() {
        let mut sink = CueRecorder::default();
        sink.play(SoundEffect::Serve);
        sink.play(SoundEffect::PaddleHit);
        sink.play(SoundEffect::Score);
        assert_eq!(
            sink.cues,
            vec![SoundEffect::Serve, SoundEffect::PaddleHit, SoundEffect::Score]
        );
    }
}
