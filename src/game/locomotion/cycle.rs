// Motion cycle store: parsed capture cycles, shared read-only after load

use std::sync::Arc;

use glam::Vec3;
use thiserror::Error;

use super::state::Direction;

/// Euler rotation triple (degrees) for one skeletal joint in one frame
pub type JointRotation = Vec3;

/// Errors raised when cycle data fails validation at load time.
///
/// These are fatal: the game cannot run with a partial or inconsistent
/// motion library, so they are reported once at startup and never per tick.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("motion cycle '{0}' has no frames")]
    Empty(String),

    #[error("motion cycle '{name}': frame {frame} has {found} joints, expected {expected}")]
    JointCountMismatch {
        name: String,
        frame: usize,
        found: usize,
        expected: usize,
    },

    #[error("motion cycles '{first}' ({first_joints} joints) and '{second}' ({second_joints} joints) cannot be blended together")]
    IncompatibleCycles {
        first: String,
        first_joints: usize,
        second: String,
        second_joints: usize,
    },

    #[error("motion library has {found} joints per frame, expected {expected}")]
    UnexpectedJointCount { found: usize, expected: usize },
}

/// A fixed-length, cyclic sequence of skeletal pose frames.
///
/// Created once at startup by the motion loader and read-only thereafter;
/// every frame carries exactly one rotation per joint.
#[derive(Debug, Clone)]
pub struct MotionCycle {
    name: String,
    frames: Vec<Vec<JointRotation>>,
}

impl MotionCycle {
    /// Build a cycle from raw per-frame joint rotations, validating shape
    pub fn new(name: &str, frames: Vec<Vec<JointRotation>>) -> Result<Self, CycleError> {
        if frames.is_empty() {
            return Err(CycleError::Empty(name.to_string()));
        }

        let expected = frames[0].len();
        for (index, frame) in frames.iter().enumerate() {
            if frame.len() != expected {
                return Err(CycleError::JointCountMismatch {
                    name: name.to_string(),
                    frame: index,
                    found: frame.len(),
                    expected,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            frames,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn joint_count(&self) -> usize {
        self.frames[0].len()
    }

    /// Get the pose at a local frame index (caller keeps it in range)
    pub fn frame(&self, index: usize) -> &[JointRotation] {
        &self.frames[index]
    }
}

/// Named, pre-loaded motion cycles for the four locomotion directions.
///
/// Cycles are handed out as `Arc` handles so multiple characters can share
/// them without copying frame data.
#[derive(Debug, Clone)]
pub struct MotionLibrary {
    rest: Arc<MotionCycle>,
    run: Arc<MotionCycle>,
    veer_left: Arc<MotionCycle>,
    veer_right: Arc<MotionCycle>,
}

impl MotionLibrary {
    /// Assemble the library, validating that all cycles agree on joint count
    pub fn new(
        rest: MotionCycle,
        run: MotionCycle,
        veer_left: MotionCycle,
        veer_right: MotionCycle,
    ) -> Result<Self, CycleError> {
        let expected = rest.joint_count();
        for cycle in [&run, &veer_left, &veer_right] {
            if cycle.joint_count() != expected {
                return Err(CycleError::IncompatibleCycles {
                    first: rest.name().to_string(),
                    first_joints: expected,
                    second: cycle.name().to_string(),
                    second_joints: cycle.joint_count(),
                });
            }
        }

        Ok(Self {
            rest: Arc::new(rest),
            run: Arc::new(run),
            veer_left: Arc::new(veer_left),
            veer_right: Arc::new(veer_right),
        })
    }

    /// Check the loaded data against the configured skeleton size
    pub fn expect_joint_count(&self, expected: usize) -> Result<(), CycleError> {
        let found = self.rest.joint_count();
        if found != expected {
            return Err(CycleError::UnexpectedJointCount { found, expected });
        }
        Ok(())
    }

    pub fn joint_count(&self) -> usize {
        self.rest.joint_count()
    }

    /// The cycle driving a given locomotion direction
    pub fn cycle_for(&self, direction: Direction) -> Arc<MotionCycle> {
        match direction {
            Direction::Rest => Arc::clone(&self.rest),
            Direction::Forward => Arc::clone(&self.run),
            Direction::Left => Arc::clone(&self.veer_left),
            Direction::Right => Arc::clone(&self.veer_right),
        }
    }

    pub fn rest(&self) -> Arc<MotionCycle> {
        Arc::clone(&self.rest)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A cycle where frame f has every joint rotation set to (f, f, f)
    pub fn counting_cycle(name: &str, frame_count: usize, joint_count: usize) -> MotionCycle {
        let frames = (0..frame_count)
            .map(|f| vec![Vec3::splat(f as f32); joint_count])
            .collect();
        MotionCycle::new(name, frames).unwrap()
    }

    /// A library of four counting cycles with the given shape
    pub fn test_library(frame_count: usize, joint_count: usize) -> MotionLibrary {
        MotionLibrary::new(
            counting_cycle("rest", frame_count, joint_count),
            counting_cycle("run", frame_count, joint_count),
            counting_cycle("veer_left", frame_count, joint_count),
            counting_cycle("veer_right", frame_count, joint_count),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_cycle_shape() {
        let cycle = counting_cycle("run", 40, 65);
        assert_eq!(cycle.frame_count(), 40);
        assert_eq!(cycle.joint_count(), 65);
        assert_eq!(cycle.name(), "run");
    }

    #[test]
    fn test_empty_cycle_rejected() {
        let result = MotionCycle::new("empty", Vec::new());
        assert!(matches!(result, Err(CycleError::Empty(_))));
    }

    #[test]
    fn test_ragged_frames_rejected() {
        let frames = vec![vec![Vec3::ZERO; 3], vec![Vec3::ZERO; 2]];
        let result = MotionCycle::new("ragged", frames);
        assert!(matches!(
            result,
            Err(CycleError::JointCountMismatch { frame: 1, .. })
        ));
    }

    #[test]
    fn test_library_joint_count_must_agree() {
        let result = MotionLibrary::new(
            counting_cycle("rest", 4, 65),
            counting_cycle("run", 4, 64),
            counting_cycle("veer_left", 4, 65),
            counting_cycle("veer_right", 4, 65),
        );
        assert!(matches!(result, Err(CycleError::IncompatibleCycles { .. })));
    }

    #[test]
    fn test_library_expected_joint_count() {
        let library = test_library(4, 65);
        assert!(library.expect_joint_count(65).is_ok());
        assert!(matches!(
            library.expect_joint_count(60),
            Err(CycleError::UnexpectedJointCount {
                found: 65,
                expected: 60
            })
        ));
    }

    #[test]
    fn test_cycle_for_direction() {
        let library = test_library(4, 3);
        assert_eq!(library.cycle_for(Direction::Rest).name(), "rest");
        assert_eq!(library.cycle_for(Direction::Forward).name(), "run");
        assert_eq!(library.cycle_for(Direction::Left).name(), "veer_left");
        assert_eq!(library.cycle_for(Direction::Right).name(), "veer_right");
    }
}
