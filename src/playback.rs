//! Playback time source boundary

use tgmd_core::time::clamp;

/// Media playback position, owned by the host player.
///
/// The annotation engine only reads it; seeking is driven by the UI.
pub trait TimeSource {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds (0 until known)
    fn duration(&self) -> f64;

    fn seek(&mut self, time: f64);
}

/// Player controls the UI drives alongside the read-only time source
pub trait PlaybackControl: TimeSource {
    /// Flip play/pause, returning the new playing state
    fn toggle_play(&mut self) -> bool;

    /// Move by `delta` seconds, returning the new position
    fn jump(&mut self, delta: f64) -> f64;

    /// Prepare for a newly loaded source
    fn load(&mut self, duration: f64);
}

/// Manually driven clock used for scripted replays and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualClock {
    current_time: f64,
    duration: f64,
    playing: bool,
}

impl ManualClock {
    pub fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }
}

impl TimeSource for ManualClock {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        let upper = if self.duration > 0.0 { self.duration } else { f64::MAX };
        self.current_time = clamp(time, 0.0, upper);
    }
}

impl PlaybackControl for ManualClock {
    fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Rewind, pause and adopt the new duration
    fn load(&mut self, duration: f64) {
        self.current_time = 0.0;
        self.duration = duration;
        self.playing = false;
    }

    /// Clamped to `[0, duration]`; while the duration is unknown the current
    /// position is the upper bound.
    fn jump(&mut self, delta: f64) -> f64 {
        if !delta.is_finite() {
            return self.current_time;
        }
        let upper = if self.duration > 0.0 {
            self.duration
        } else {
            self.current_time
        };
        self.current_time = clamp(self.current_time + delta, 0.0, upper);
        self.current_time
    }
}
