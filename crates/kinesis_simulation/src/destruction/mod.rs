//! Destruction module: breakable targets
//!
//! Fracture solving принадлежит движку (geometry collection); симуляция
//! владеет только реакцией: сломанная цель перестаёт быть препятствием
//! и рассыпает debris.

use bevy::prelude::*;

pub mod breakable;

// Re-export основных типов
pub use breakable::{
    spawn_breakable_target, Breakable, Broken, DebrisBurst, Fractured,
};

/// Destruction Plugin
///
/// Порядок выполнения:
/// 1. collapse_on_depletion — Health упал до 0 → Fractured event
/// 2. react_to_fracture — Broken marker, снятие Solid, debris scatter
pub struct DestructionPlugin;

impl Plugin for DestructionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Fractured>().add_event::<DebrisBurst>();

        // После combat phase: смерть от урона превращается в fracture
        // в том же тике
        app.add_systems(
            FixedUpdate,
            (breakable::collapse_on_depletion, breakable::react_to_fracture)
                .chain()
                .in_set(crate::SimulationSet::Destruction),
        );
    }
}
