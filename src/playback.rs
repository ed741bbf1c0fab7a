//! Frame-advance clock for ASCII playback.

/// Lowest accepted playback rate. Anything below (including NaN) is clamped.
pub const MIN_FPS: f64 = 0.1;

/// Current state of playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Clock is stopped
    #[default]
    Stopped,
    /// Clock is running
    Playing,
}

/// Platform-agnostic playback clock.
///
/// The clock does not own a timer. The caller invokes `tick()` from its
/// per-frame callback with a monotonic timestamp in milliseconds; the clock
/// decides whether enough time has elapsed to switch frames.
///
/// ## Example
///
/// ```rust
/// use ascii_stage::PlaybackClock;
///
/// let mut clock = PlaybackClock::new(10.0); // 100 ms per frame
/// clock.set_frames(3, 0.0);
/// clock.start(0.0);
///
/// assert_eq!(clock.tick(16.0), None); // too early
/// assert_eq!(clock.tick(100.0), Some(0));
/// assert_eq!(clock.tick(200.0), Some(1));
/// assert_eq!(clock.tick(300.0), Some(2));
/// assert_eq!(clock.tick(400.0), Some(0)); // wraps
/// ```
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    /// Index of the next frame to show
    current_frame: usize,
    /// Total number of frames
    frame_count: usize,
    /// Frames per second
    fps: f64,
    /// Current playback state
    state: PlaybackState,
    /// Timestamp of the last frame switch
    last_switch_ms: f64,
}

impl PlaybackClock {
    /// Create a stopped clock with the given FPS.
    pub fn new(fps: f64) -> Self {
        Self {
            current_frame: 0,
            frame_count: 0,
            fps: fps.max(MIN_FPS),
            state: PlaybackState::Stopped,
            last_switch_ms: 0.0,
        }
    }

    /// Replace the frame set.
    ///
    /// Playback restarts from the first frame and the interval is measured
    /// from `now_ms`.
    pub fn set_frames(&mut self, count: usize, now_ms: f64) {
        self.frame_count = count;
        self.current_frame = 0;
        self.last_switch_ms = now_ms;
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps.max(MIN_FPS);
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Minimum time between frame switches.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Start the clock; the first switch happens one interval after `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.state = PlaybackState::Playing;
        self.last_switch_ms = now_ms;
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Index of the frame the next switch will show.
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Per-frame callback.
    ///
    /// Returns the index of the frame to render when the interval has
    /// elapsed, and advances to the next frame (wrapping). Returns `None`
    /// otherwise, including while stopped or when there are no frames.
    pub fn tick(&mut self, now_ms: f64) -> Option<usize> {
        if self.state != PlaybackState::Playing || self.frame_count == 0 {
            return None;
        }

        if now_ms - self.last_switch_ms < self.interval_ms() {
            return None;
        }

        let frame = self.current_frame;
        self.current_frame = (self.current_frame + 1) % self.frame_count;
        self.last_switch_ms = now_ms;
        Some(frame)
    }
}
