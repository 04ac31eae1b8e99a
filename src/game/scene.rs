// Scene driver: advances the frame counter and feeds poses to the renderer

use glam::{Mat4, Vec3};
use log::trace;

use crate::engine::camera::Camera;
use crate::engine::terrain::Terrain;

use super::locomotion::{CharacterLocomotion, Direction, JointRotation};

/// Sink for resolved poses. The scene never reads anything back from it.
pub trait Renderer {
    /// Draw one skeletal pose under the combined camera/world transform
    fn draw(&mut self, pose: &[JointRotation], world_transform: Mat4);
}

/// Renderer that only logs, for running headless or before a real
/// rasterizer is wired up
#[derive(Debug, Default)]
pub struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn draw(&mut self, pose: &[JointRotation], world_transform: Mat4) {
        trace!(
            "draw: {} joints at {:?}",
            pose.len(),
            world_transform.w_axis
        );
    }
}

/// Owns the frame counter and wires the locomotion core to its
/// collaborators: terrain height queries, the camera, and the renderer.
#[derive(Debug)]
pub struct Scene {
    terrain: Terrain,
    camera: Camera,
    character: CharacterLocomotion,
    frame_number: u64,
}

impl Scene {
    pub fn new(terrain: Terrain, camera: Camera, character: CharacterLocomotion) -> Self {
        Self {
            terrain,
            camera,
            character,
            frame_number: 0,
        }
    }

    /// Advance one tick: bump the frame counter, resolve the character's
    /// pose and placement, look up the ground height at its position (every
    /// tick, never cached: the terrain is static but the character moves),
    /// and hand the result to the renderer.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) {
        self.frame_number += 1;

        let frame = self.character.advance_and_resolve(self.frame_number);
        let height = self.terrain.height_at(frame.position.x, frame.position.y);

        let world = Mat4::from_translation(Vec3::new(frame.position.x, frame.position.y, height))
            * Mat4::from_rotation_z(frame.heading_degrees.to_radians());
        let transform = self.camera.view_matrix() * world;

        renderer.draw(frame.pose, transform);
    }

    /// Direction-change event; takes effect on the next tick
    pub fn on_direction(&mut self, direction: Direction) {
        self.character.set_direction(direction, self.frame_number + 1);
    }

    /// Reset the character to the origin at rest
    pub fn on_reset(&mut self) {
        self.character.reset();
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn character(&self) -> &CharacterLocomotion {
        &self.character
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}
