use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Variable-timestep frame clock.
///
/// Each frame samples a monotonic clock and differences it against the
/// previous sample. The first frame has no previous sample and reports a zero
/// delta. Deltas longer than `max_delta` (a debugger pause, a dragged window)
/// are capped so a single frame cannot teleport entities.
pub struct FrameClock {
    pub max_delta: f64,
    pub dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Option<Instant>,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_delta: 0.25,
            dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: None,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Sample the system monotonic clock and return this frame's delta.
    pub fn begin_frame(&mut self) -> f64 {
        self.tick(Instant::now())
    }

    /// Record a clock sample taken at `now` and return seconds since the
    /// previous sample.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let raw = match self.last_instant {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f64(),
            None => 0.0,
        };
        self.last_instant = Some(now);

        self.dt = if raw > self.max_delta {
            log::warn!(
                "Frame took {:.1}ms, capping delta to {}ms",
                raw * 1000.0,
                self.max_delta * 1000.0
            );
            self.max_delta
        } else {
            raw
        };
        self.total_time += self.dt;
        self.frame_count += 1;

        if self.frame_count > 1 {
            self.fps_samples[self.fps_sample_index] = self.dt;
            self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
            let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
            self.smoothed_frame_time_ms = avg_dt * 1000.0;
            self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        }

        self.dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
