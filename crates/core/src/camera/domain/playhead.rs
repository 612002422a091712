use std::time::SystemTime;

/// Logical position in the replayed stream plus the time of the last fetch.
///
/// The playhead moves by however many frames of real time have passed since
/// the previous successful fetch, so replay speed tracks wall-clock time no
/// matter how often it is polled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playhead {
    last_call: SystemTime,
    frame_index: usize,
}

impl Playhead {
    pub fn new(now: SystemTime) -> Self {
        Self {
            last_call: now,
            frame_index: 0,
        }
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn last_call(&self) -> SystemTime {
        self.last_call
    }

    /// Moves forward by the frames elapsed at `fps` since the last fetch and
    /// returns the new index.
    ///
    /// A clock that went backwards yields a negative advance; the index then
    /// moves back, stopping at 0.
    pub fn advance(&mut self, now: SystemTime, fps: f64) -> usize {
        let elapsed = elapsed_seconds(self.last_call, now);
        if elapsed < 0.0 {
            log::warn!("Clock moved back {:.3}s since last frame fetch", -elapsed);
        }
        let advance = frame_advance(fps, elapsed);
        self.frame_index = self.frame_index.saturating_add_signed(advance as isize);
        self.frame_index
    }

    /// Wraparound: back to the first frame.
    pub fn rewind(&mut self) {
        self.frame_index = 0;
    }

    /// Records a successful fetch.
    pub fn mark_fetched(&mut self, now: SystemTime) {
        self.last_call = now;
    }
}

/// Signed seconds from `earlier` to `later`.
pub fn elapsed_seconds(earlier: SystemTime, later: SystemTime) -> f64 {
    match later.duration_since(earlier) {
        Ok(forward) => forward.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Whole frames covered by `elapsed` seconds at `fps`, truncated toward zero.
pub fn frame_advance(fps: f64, elapsed: f64) -> i64 {
    // `as` saturates and maps NaN to 0.
    (fps * elapsed).trunc() as i64
}
