// Motion capture loader: a minimal BVH reader for locomotion cycles

use std::fs;
use std::path::Path;

use glam::Vec3;
use log::info;
use thiserror::Error;

use crate::game::locomotion::{CycleError, JointRotation, MotionCycle, MotionLibrary};

/// Errors raised while loading motion capture data. All fatal at startup;
/// cycle geometry is never re-validated per tick.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("failed to read motion file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed BVH data: {0}")]
    Parse(String),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

/// Parse BVH text into a motion cycle of per-joint Euler rotations.
///
/// The HIERARCHY section is walked only for joint order and rotation channel
/// layout; offsets and End Sites are skipped, and position channels are read
/// but discarded (the locomotion state machine owns translation). Frame
/// timing is likewise ignored: playback runs at the engine tick rate.
pub fn parse_bvh(name: &str, source: &str) -> Result<MotionCycle, MotionError> {
    let mut joint_count = 0usize;
    // One entry per motion-line value: which joint and axis it rotates, if any
    let mut targets: Vec<Option<(usize, Axis)>> = Vec::new();
    let mut frames: Vec<Vec<JointRotation>> = Vec::new();
    let mut declared_frames: Option<usize> = None;
    let mut in_motion = false;

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !in_motion {
            if line.starts_with("ROOT") || line.starts_with("JOINT") {
                joint_count += 1;
            } else if line.starts_with("CHANNELS") {
                if joint_count == 0 {
                    return Err(MotionError::Parse(
                        "CHANNELS before any joint declaration".to_string(),
                    ));
                }
                let joint = joint_count - 1;
                let mut parts = line.split_whitespace().skip(1);
                let declared: usize = parts
                    .next()
                    .and_then(|count| count.parse().ok())
                    .ok_or_else(|| {
                        MotionError::Parse(format!("invalid CHANNELS count in '{line}'"))
                    })?;

                let mut seen = 0usize;
                for channel in parts {
                    seen += 1;
                    let target = match channel {
                        "Xrotation" => Some((joint, Axis::X)),
                        "Yrotation" => Some((joint, Axis::Y)),
                        "Zrotation" => Some((joint, Axis::Z)),
                        "Xposition" | "Yposition" | "Zposition" => None,
                        other => {
                            return Err(MotionError::Parse(format!(
                                "unknown channel type '{other}'"
                            )))
                        }
                    };
                    targets.push(target);
                }
                if seen != declared {
                    return Err(MotionError::Parse(format!(
                        "CHANNELS declares {declared} channels but lists {seen}"
                    )));
                }
            } else if line == "MOTION" {
                in_motion = true;
            }
        } else if let Some(rest) = line.strip_prefix("Frames:") {
            declared_frames = Some(rest.trim().parse().map_err(|_| {
                MotionError::Parse(format!("invalid frame count '{}'", rest.trim()))
            })?);
        } else if line.starts_with("Frame Time:") {
            // Capture timing is ignored; the engine tick rate drives playback
        } else {
            let values = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f32>().map_err(|_| {
                        MotionError::Parse(format!("invalid channel value '{token}'"))
                    })
                })
                .collect::<Result<Vec<f32>, MotionError>>()?;

            if values.len() != targets.len() {
                return Err(MotionError::Parse(format!(
                    "frame {} has {} channel values, expected {}",
                    frames.len(),
                    values.len(),
                    targets.len()
                )));
            }

            let mut frame = vec![Vec3::ZERO; joint_count];
            for (value, target) in values.iter().zip(&targets) {
                if let Some((joint, axis)) = target {
                    match axis {
                        Axis::X => frame[*joint].x = *value,
                        Axis::Y => frame[*joint].y = *value,
                        Axis::Z => frame[*joint].z = *value,
                    }
                }
            }
            frames.push(frame);
        }
    }

    if let Some(declared) = declared_frames {
        if declared != frames.len() {
            return Err(MotionError::Parse(format!(
                "header declares {declared} frames but {} were read",
                frames.len()
            )));
        }
    }

    Ok(MotionCycle::new(name, frames)?)
}

/// Load one cycle from a BVH file, named after the file stem
pub fn load_cycle(path: &Path) -> Result<MotionCycle, MotionError> {
    let source = fs::read_to_string(path).map_err(|source| MotionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "cycle".to_string());

    let cycle = parse_bvh(&name, &source)?;
    info!(
        "loaded motion cycle '{}': {} frames, {} joints",
        cycle.name(),
        cycle.frame_count(),
        cycle.joint_count()
    );
    Ok(cycle)
}

/// Load the four locomotion cycles from a models directory
pub fn load_library(dir: &Path) -> Result<MotionLibrary, MotionError> {
    let rest = load_cycle(&dir.join("stand.bvh"))?;
    let run = load_cycle(&dir.join("fast_run.bvh"))?;
    let veer_left = load_cycle(&dir.join("veer_left.bvh"))?;
    let veer_right = load_cycle(&dir.join("veer_right.bvh"))?;
    Ok(MotionLibrary::new(rest, run, veer_left, veer_right)?)
}
