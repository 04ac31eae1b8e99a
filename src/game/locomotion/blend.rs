// Blend engine: synthesizes a short cross-fade between two motion cycles

use crate::core::math::clamp;

use super::cycle::JointRotation;

/// A short, non-cyclic sequence of synthesized frames bridging two cycles.
///
/// At most one transition is live per character; issuing a new direction
/// change replaces the whole buffer.
#[derive(Debug, Clone)]
pub struct BlendTransition {
    frames: Vec<Vec<JointRotation>>,
}

impl BlendTransition {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn joint_count(&self) -> usize {
        self.frames[0].len()
    }

    pub fn frame(&self, index: usize) -> &[JointRotation] {
        &self.frames[index]
    }
}

/// Linearly cross-fade from a captured outgoing pose to an incoming pose.
///
/// For transition index `i` in `[0, steps)` the outgoing weight is
/// `t_i = 1 - i / (steps - 1)`, so the first frame reproduces the outgoing
/// pose exactly and the last frame reproduces the incoming pose exactly.
/// Rotations are interpolated per joint as plain Euler triples, not slerped;
/// that matches the captured reference behavior and is intentional.
///
/// Mismatched joint counts indicate an integration bug (cycle geometry is
/// fixed at load time), so they panic rather than return an error.
pub fn compute_transition(
    outgoing: &[JointRotation],
    incoming: &[JointRotation],
    steps: usize,
) -> BlendTransition {
    assert!(steps >= 2, "a blend needs at least its two endpoint frames");
    assert_eq!(
        outgoing.len(),
        incoming.len(),
        "outgoing and incoming poses must have the same joint count"
    );

    let last = (steps - 1) as f32;
    let mut frames = Vec::with_capacity(steps);

    for i in 0..steps {
        // Computed per index rather than accumulated, so the endpoint
        // weights are exactly 1 and 0
        let t = 1.0 - i as f32 / last;
        let out_weight = clamp(t, 0.0, 1.0);
        let in_weight = clamp(1.0 - t, 0.0, 1.0);
        let frame = outgoing
            .iter()
            .zip(incoming)
            .map(|(from, to)| *from * out_weight + *to * in_weight)
            .collect();
        frames.push(frame);
    }

    BlendTransition { frames }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    fn pose(value: f32, joints: usize) -> Vec<JointRotation> {
        vec![Vec3::splat(value); joints]
    }

    #[test]
    fn test_transition_length_and_shape() {
        let transition = compute_transition(&pose(0.0, 65), &pose(1.0, 65), 12);
        assert_eq!(transition.len(), 12);
        assert_eq!(transition.joint_count(), 65);
    }

    #[test]
    fn test_endpoints_are_exact() {
        let outgoing = vec![Vec3::new(10.0, -20.0, 30.0), Vec3::new(1.0, 2.0, 3.0)];
        let incoming = vec![Vec3::new(-5.0, 5.0, 0.0), Vec3::new(4.0, 4.0, 4.0)];
        let transition = compute_transition(&outgoing, &incoming, 12);

        // t_0 = 1 and t_{steps-1} = 0 exactly
        for joint in 0..2 {
            assert_relative_eq!(transition.frame(0)[joint].x, outgoing[joint].x);
            assert_relative_eq!(transition.frame(0)[joint].y, outgoing[joint].y);
            assert_relative_eq!(transition.frame(11)[joint].x, incoming[joint].x);
            assert_relative_eq!(transition.frame(11)[joint].z, incoming[joint].z);
        }
    }

    #[test]
    fn test_weights_monotonically_decrease() {
        // Blending 1 -> 0 makes the stored value equal the outgoing weight
        let transition = compute_transition(&pose(1.0, 1), &pose(0.0, 1), 12);
        for i in 1..transition.len() {
            let previous = transition.frame(i - 1)[0].x;
            let current = transition.frame(i)[0].x;
            assert!(current <= previous, "weight rose at step {i}");
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        // 3 steps puts the middle frame at exactly t = 0.5
        let transition = compute_transition(&pose(0.0, 4), &pose(8.0, 4), 3);
        assert_relative_eq!(transition.frame(1)[2].x, 4.0);
    }

    #[test]
    #[should_panic(expected = "same joint count")]
    fn test_joint_count_mismatch_panics() {
        compute_transition(&pose(0.0, 65), &pose(1.0, 64), 12);
    }

    #[test]
    #[should_panic(expected = "at least its two endpoint frames")]
    fn test_single_step_panics() {
        compute_transition(&pose(0.0, 2), &pose(1.0, 2), 1);
    }
}
