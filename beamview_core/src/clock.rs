//! Playback clock - wall-clock delta accumulation with loop wraparound.
//!
//! The clock advances a playback time in `[0, duration)` from whatever
//! per-frame timestamps the host supplies. It assumes no particular tick
//! cadence: variable deltas, a zero first delta, and even a rewinding
//! host clock must all produce smooth, forward-only playback.

/// Outcome of a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Playback time crossed the loop boundary and reset to zero
    pub wrapped: bool,
}

/// Play/pause state and the accumulated playback time.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    playing: bool,
    animation_time: f64,
    last_tick: Option<f64>,
    duration: f64,
}

impl PlaybackClock {
    /// Creates a paused clock at time zero for the given loop period.
    pub fn new(duration: f64) -> Self {
        Self {
            playing: false,
            animation_time: 0.0,
            last_tick: None,
            duration,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current playback time in seconds.
    pub fn time(&self) -> f64 {
        self.animation_time
    }

    /// Loop period in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playback progress as a percentage of the loop period.
    pub fn progress_percent(&self) -> f64 {
        self.animation_time / self.duration * 100.0
    }

    /// Flips between playing and paused; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Jumps to `ratio * duration`, in either play state.
    ///
    /// The ratio is clamped to `[0, 1]`. Returns the new playback time.
    pub fn seek(&mut self, ratio: f64) -> f64 {
        let ratio = ratio.clamp(0.0, 1.0);
        self.animation_time = ratio * self.duration;
        self.animation_time
    }

    /// Advances playback to the host timestamp `now` (seconds).
    ///
    /// Paused ticks advance nothing but still record `now`, so resuming
    /// never applies a stale delta. The first tick has no prior timestamp
    /// and uses delta zero; a non-monotonic host timestamp is treated as
    /// delta zero rather than rewinding.
    pub fn tick(&mut self, now: f64) -> TickReport {
        let mut wrapped = false;

        if self.playing {
            let delta = match self.last_tick {
                Some(last) => (now - last).max(0.0),
                None => 0.0,
            };
            self.animation_time += delta;
            if self.animation_time >= self.duration {
                self.animation_time = 0.0;
                wrapped = true;
            }
        }
        self.last_tick = Some(now);

        TickReport { wrapped }
    }
}
