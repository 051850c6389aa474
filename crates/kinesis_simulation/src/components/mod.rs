//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Health, Stamina)
//! - player: player control marker (Player)
//! - physics: custom velocity body + scene-object маркеры (Solid, Grabbable, VisualMesh)
//! - camera: first-person camera rig (eye offset + pitch)

pub mod actor;
pub mod camera;
pub mod physics;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use camera::*;
pub use physics::*;
pub use player::*;
