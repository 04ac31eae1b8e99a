// Locomotion system
//
// This module contains the character animation core:
// - Motion cycle store holding the loaded capture data
// - Blend engine synthesizing cross-fade transitions
// - Playback state machine driving pose, position and heading per tick

pub mod blend;
pub mod cycle;
pub mod state;

// Re-export commonly used types
pub use blend::BlendTransition;
pub use cycle::{CycleError, JointRotation, MotionCycle, MotionLibrary};
pub use state::{CharacterLocomotion, Direction, LocomotionConfig, ResolvedFrame};

/// Joint count of the reference capture data; loaded libraries are checked
/// against this at startup
pub const REFERENCE_JOINT_COUNT: usize = 65;
