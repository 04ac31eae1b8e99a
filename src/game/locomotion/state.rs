// Playback and locomotion state machine for one character

use std::sync::Arc;

use glam::Vec2;
use log::debug;

use crate::core::math::wrap_degrees;

use super::blend::{compute_transition, BlendTransition};
use super::cycle::{JointRotation, MotionCycle, MotionLibrary};

/// The character's commanded locomotion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Standing in place
    Rest,
    /// Running straight ahead
    Forward,
    /// Running while veering left
    Left,
    /// Running while veering right
    Right,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Rest
    }
}

/// Tuning constants for locomotion playback.
///
/// Compiled-in defaults match the reference capture data: 12 blend steps is
/// half a second at 24 ticks/second, and frames 24..33 of the veer cycles
/// are where the turn visually happens.
#[derive(Debug, Clone)]
pub struct LocomotionConfig {
    /// Number of synthesized frames in a blend transition
    pub blend_steps: usize,
    /// Local frame window `[start, end)` during which heading rotates
    pub turn_window: (usize, usize),
    /// Ground speed while running forward, in units per tick
    pub forward_speed: f32,
    /// Ground speed while veering, in units per tick
    pub turning_speed: f32,
    /// Total heading change accumulated over one turn window, in degrees
    pub turn_angle_degrees: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            blend_steps: 12,
            turn_window: (24, 33),
            forward_speed: 0.2,
            turning_speed: 0.15,
            turn_angle_degrees: 90.0,
        }
    }
}

impl LocomotionConfig {
    /// Ground speed for a direction (rest stands still)
    pub fn speed_for(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Rest => 0.0,
            Direction::Forward => self.forward_speed,
            Direction::Left | Direction::Right => self.turning_speed,
        }
    }

    /// Signed total turn for a direction: positive right, negative left
    pub fn turn_for(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Right => self.turn_angle_degrees,
            Direction::Left => -self.turn_angle_degrees,
            Direction::Rest | Direction::Forward => 0.0,
        }
    }
}

/// Whether playback is looping a cycle or crossing a blend window
#[derive(Debug, Clone)]
enum Playback {
    Steady,
    Blending {
        start_tick: u64,
        end_tick: u64,
        transition: BlendTransition,
    },
}

/// The pose and world placement resolved for one tick
#[derive(Debug)]
pub struct ResolvedFrame<'a> {
    /// Joint rotations to hand to the renderer
    pub pose: &'a [JointRotation],
    /// Ground position (height comes from the terrain, queried per tick)
    pub position: Vec2,
    /// Heading about the vertical axis, in degrees
    pub heading_degrees: f32,
}

/// Per-character locomotion state: current cycle, blend window, position,
/// heading and speed.
///
/// Purely deterministic: direction events and the tick counter are the only
/// inputs, and all mutation happens on the single tick thread. The one live
/// `BlendTransition` is owned here and wholly replaced on each direction
/// change, so a rapid burst of events simply keeps the last one.
#[derive(Debug)]
pub struct CharacterLocomotion {
    config: LocomotionConfig,
    library: MotionLibrary,
    direction: Direction,
    cycle: Arc<MotionCycle>,
    playback: Playback,
    /// Tick at which the most recent blend ended; steady frame indices are
    /// phased from here so the incoming cycle starts at its frame 0
    last_blend_end: u64,
    position: Vec2,
    heading_degrees: f32,
    speed: f32,
}

impl CharacterLocomotion {
    pub fn new(library: MotionLibrary, config: LocomotionConfig) -> Self {
        let cycle = library.rest();
        Self {
            config,
            library,
            direction: Direction::Rest,
            cycle,
            playback: Playback::Steady,
            last_blend_end: 0,
            position: Vec2::ZERO,
            heading_degrees: 0.0,
            speed: 0.0,
        }
    }

    /// Return to the origin, facing the identity heading, at rest.
    ///
    /// Idempotent: calling twice leaves the same state as calling once.
    pub fn reset(&mut self) {
        self.direction = Direction::Rest;
        self.cycle = self.library.rest();
        self.playback = Playback::Steady;
        self.last_blend_end = 0;
        self.position = Vec2::ZERO;
        self.heading_degrees = 0.0;
        self.speed = 0.0;
        debug!("character reset to origin at rest");
    }

    /// Handle a direction-change event issued at `tick`.
    ///
    /// Re-issuing the current direction is a no-op so a held key does not
    /// restart the blend mid-stride. Otherwise the pose displayed at `tick`
    /// is captured, a fresh transition to the target cycle's frame 0 is
    /// built (discarding any in-flight one), and the blend window is set to
    /// `[tick, tick + blend_steps)`.
    pub fn set_direction(&mut self, direction: Direction, tick: u64) {
        if direction == self.direction {
            return;
        }

        self.finish_expired_blend(tick);

        let captured = self.displayed_pose(tick).to_vec();
        let target = self.library.cycle_for(direction);
        let transition = compute_transition(&captured, target.frame(0), self.config.blend_steps);

        debug!(
            "direction {:?} -> {:?} at tick {tick}: blending '{}' into '{}' over {} steps",
            self.direction,
            direction,
            self.cycle.name(),
            target.name(),
            transition.len()
        );

        self.playback = Playback::Blending {
            start_tick: tick,
            end_tick: tick + self.config.blend_steps as u64,
            transition,
        };
        self.direction = direction;
        self.speed = self.config.speed_for(direction);
        self.cycle = target;
    }

    /// Resolve the pose and placement for `tick`, advancing locomotion.
    ///
    /// Called exactly once per tick after the frame counter increments.
    /// While a blend window is active the synthesized frames play back and
    /// position and heading are held; in steady playback the cycle loops,
    /// heading integrates across the turn window, and position accumulates
    /// along the heading.
    pub fn advance_and_resolve(&mut self, tick: u64) -> ResolvedFrame<'_> {
        self.finish_expired_blend(tick);

        if matches!(self.playback, Playback::Steady) {
            let local_frame = self.steady_frame_index(tick);

            let (window_start, window_end) = self.config.turn_window;
            if local_frame >= window_start && local_frame < window_end {
                let total = self.config.turn_for(self.direction);
                if total != 0.0 {
                    let per_tick = total / (window_end - window_start) as f32;
                    self.heading_degrees = wrap_degrees(self.heading_degrees + per_tick);
                }
            }

            self.position += heading_step(self.heading_degrees, self.speed);
        }

        match &self.playback {
            Playback::Blending {
                start_tick,
                transition,
                ..
            } => {
                assert!(
                    tick >= *start_tick,
                    "tick {tick} precedes the active blend window starting at {start_tick}"
                );
                ResolvedFrame {
                    pose: transition.frame((tick - start_tick) as usize),
                    position: self.position,
                    heading_degrees: self.heading_degrees,
                }
            }
            Playback::Steady => ResolvedFrame {
                pose: self.cycle.frame(self.steady_frame_index(tick)),
                position: self.position,
                heading_degrees: self.heading_degrees,
            },
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_blending(&self) -> bool {
        matches!(self.playback, Playback::Blending { .. })
    }

    /// The active blend window `[start, end)`, if any
    pub fn blend_window(&self) -> Option<(u64, u64)> {
        match self.playback {
            Playback::Blending {
                start_tick,
                end_tick,
                ..
            } => Some((start_tick, end_tick)),
            Playback::Steady => None,
        }
    }

    /// Close out a blend whose window has elapsed; the tick the window ends
    /// on becomes the phase reference, so the incoming cycle's frame 0 lands
    /// exactly on `end_tick` with no skipped or repeated frame.
    fn finish_expired_blend(&mut self, tick: u64) {
        if let Playback::Blending { end_tick, .. } = self.playback {
            if tick >= end_tick {
                self.last_blend_end = end_tick;
                self.playback = Playback::Steady;
                debug!(
                    "blend complete at tick {end_tick}; steady on '{}'",
                    self.cycle.name()
                );
            }
        }
    }

    /// Frame of the current cycle shown at `tick` in steady playback
    fn steady_frame_index(&self, tick: u64) -> usize {
        ((tick - self.last_blend_end) % self.cycle.frame_count() as u64) as usize
    }

    /// The pose on screen at `tick`: a blend frame while a window is active,
    /// otherwise the looping cycle frame. A direction change captures this,
    /// so interrupting a blend fades out from the half-blended pose rather
    /// than snapping back to the underlying cycle.
    ///
    /// Ticks are monotonic; looking up a tick before the active window is an
    /// integration bug and fails loudly.
    fn displayed_pose(&self, tick: u64) -> &[JointRotation] {
        match &self.playback {
            Playback::Blending {
                start_tick,
                transition,
                ..
            } => {
                assert!(
                    tick >= *start_tick,
                    "tick {tick} precedes the active blend window starting at {start_tick}"
                );
                transition.frame((tick - start_tick) as usize)
            }
            Playback::Steady => self.cycle.frame(self.steady_frame_index(tick)),
        }
    }
}

/// Displacement for one tick: the local forward vector (-Y) scaled by speed
/// and rotated by the heading about the vertical axis
fn heading_step(heading_degrees: f32, speed: f32) -> Vec2 {
    let (sin, cos) = heading_degrees.to_radians().sin_cos();
    Vec2::new(speed * sin, -speed * cos)
}
