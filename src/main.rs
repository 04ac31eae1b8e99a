use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::camera::Camera;
use engine::game_loop::GameLoop;
use engine::motion;
use engine::terrain::Terrain;
use game::locomotion::{
    CharacterLocomotion, Direction, LocomotionConfig, REFERENCE_JOINT_COUNT,
};
use game::scene::{Scene, TraceRenderer};

/// World units between terrain height samples in the reference data
const TERRAIN_SPACING: f32 = 3.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Terrain Runner...");

    let models_dir = PathBuf::from(env::args().nth(1).unwrap_or_else(|| "./models".to_string()));

    // Load the motion library and terrain; either failing aborts startup
    let library = motion::load_library(&models_dir)
        .with_context(|| format!("loading motion cycles from {}", models_dir.display()))?;
    library
        .expect_joint_count(REFERENCE_JOINT_COUNT)
        .context("validating motion library")?;
    info!("Motion library ready: {} joints per frame", library.joint_count());
    let terrain = Terrain::load(&models_dir.join("randomland.dem"), TERRAIN_SPACING)
        .context("loading terrain")?;

    let character = CharacterLocomotion::new(library, LocomotionConfig::default());
    let mut scene = Scene::new(terrain, Camera::new(), character);
    let mut game_loop = GameLoop::new();
    let mut renderer = TraceRenderer;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Terrain Runner")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created; arrow keys steer the character, P resets, WASD/RF pan the camera, QE turn it, Space pauses");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => {
                handle_key(code, &mut scene, &mut game_loop);
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                let ticks = game_loop.begin_frame();
                for _ in 0..ticks {
                    scene.tick(&mut renderer);
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

fn handle_key(code: KeyCode, scene: &mut Scene, game_loop: &mut GameLoop) {
    match code {
        // Character direction events
        KeyCode::ArrowUp => scene.on_direction(Direction::Forward),
        KeyCode::ArrowDown => scene.on_direction(Direction::Rest),
        KeyCode::ArrowLeft => scene.on_direction(Direction::Left),
        KeyCode::ArrowRight => scene.on_direction(Direction::Right),
        KeyCode::KeyP => scene.on_reset(),

        // Camera pan and turn
        KeyCode::KeyW => scene.camera_mut().pan_forward(),
        KeyCode::KeyS => scene.camera_mut().pan_backward(),
        KeyCode::KeyA => scene.camera_mut().pan_left(),
        KeyCode::KeyD => scene.camera_mut().pan_right(),
        KeyCode::KeyR => scene.camera_mut().pan_up(),
        KeyCode::KeyF => scene.camera_mut().pan_down(),
        KeyCode::KeyQ => scene.camera_mut().turn_left(),
        KeyCode::KeyE => scene.camera_mut().turn_right(),

        KeyCode::Space => game_loop.toggle_pause(),
        _ => {}
    }
}
