// Engine modules: timing, camera bookkeeping, terrain, motion capture loading

pub mod camera;
pub mod game_loop;
pub mod motion;
pub mod terrain;
