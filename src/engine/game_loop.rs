/// Game loop timing and control system
///
/// Implements a fixed timestep loop: the simulation advances in whole ticks
/// at a constant rate regardless of how often the window redraws, which
/// keeps frame-indexed animation playback deterministic.
use std::time::{Duration, Instant};

/// Simulation rate in ticks per second; the capture data is authored for
/// this rate, so a 12-step blend lasts half a second
pub const TICK_RATE: u32 = 24;

/// Seconds per tick
pub const TICK_INTERVAL: f32 = 1.0 / TICK_RATE as f32;
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Maximum ticks to run in one frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time not yet consumed by ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Total ticks executed
    tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            tick_count: 0,
        }
    }

    /// Begin a new frame, returning the number of simulation ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        // A paused loop discards elapsed time instead of accumulating it
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK_DURATION;
            ticks += 1;
        }

        // Long stalls (window drags, debugger pauses) would otherwise burst
        // once the cap lifts
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Total number of ticks executed
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.tick_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_tick_interval_matches_rate() {
        assert!((TICK_INTERVAL - 1.0 / 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_pause_resume() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert!(game_loop.is_paused());
        game_loop.resume();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_paused_runs_no_ticks() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        thread::sleep(Duration::from_millis(60));
        assert_eq!(game_loop.begin_frame(), 0);
    }

    #[test]
    fn test_tick_accumulation() {
        let mut game_loop = GameLoop::new();
        thread::sleep(TICK_DURATION);
        let ticks = game_loop.begin_frame();
        assert!(ticks >= 1);
        assert!(ticks <= MAX_TICKS_PER_FRAME);
        assert_eq!(game_loop.tick_count(), ticks as u64);
    }

    #[test]
    fn test_ticks_capped_after_stall() {
        let mut game_loop = GameLoop::new();
        // 400ms would be ~9 ticks at 24/s without the cap
        thread::sleep(Duration::from_millis(400));
        assert!(game_loop.begin_frame() <= MAX_TICKS_PER_FRAME);
    }
}
