//! First-person grid ray caster over procedurally generated dungeons.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod input;
pub mod movement;
pub mod raycaster;
pub mod scaler;
pub mod surface;
pub mod texture;
pub mod weapon;
