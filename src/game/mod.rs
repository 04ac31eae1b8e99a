// Game layer: the locomotion core and the scene driver around it

pub mod locomotion;
pub mod scene;
