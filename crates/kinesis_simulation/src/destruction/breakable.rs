//! Breakable target: реакция на fracture event
//!
//! Событие Fractured приходит двумя путями:
//! - от destruction subsystem движка (geometry collection сломалась)
//! - изнутри: Health breakable цели упал до 0 (collapse_on_depletion)
//!
//! Terminal state: сломанная цель перестаёт быть препятствием —
//! Solid/Grabbable снимаются, raycasts и grab проходят сквозь.
//! Повторный fracture — no-op.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::combat::EntityDied;
use crate::components::{BoundingSphere, Grabbable, Health, PhysicsBody, Solid, VisualMesh};
use crate::DeterministicRng;

/// Breakable target component
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Breakable {
    /// Сколько debris impulses рассыпать при fracture
    pub debris_count: u32,
    /// Величина каждого debris impulse
    pub debris_impulse: f32,
}

impl Default for Breakable {
    fn default() -> Self {
        Self {
            debris_count: 8,
            debris_impulse: 5.0,
        }
    }
}

/// Маркер: цель сломана (terminal, не снимается)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Broken;

/// Event: fracture произошёл (inbound от движка или collapse_on_depletion)
#[derive(Event, Debug, Clone)]
pub struct Fractured {
    pub entity: Entity,
    pub impact_point: Vec3,
}

/// Event: debris разлетелся (outbound — движок спавнит осколки/VFX)
#[derive(Event, Debug, Clone)]
pub struct DebrisBurst {
    pub position: Vec3,
    /// Импульсы осколков (deterministic при фиксированном seed)
    pub impulses: Vec<Vec3>,
}

/// Система: Health breakable цели упал до 0 → Fractured
///
/// Движок обычно сам шлёт Fractured от chaos-события; этот путь
/// покрывает headless симуляцию и чисто урон-driven разрушение.
pub fn collapse_on_depletion(
    mut death_events: EventReader<EntityDied>,
    breakables: Query<&Transform, With<Breakable>>,
    mut fracture_events: EventWriter<Fractured>,
) {
    for event in death_events.read() {
        let Ok(transform) = breakables.get(event.entity) else {
            continue; // Умер не breakable — не наше дело
        };

        fracture_events.write(Fractured {
            entity: event.entity,
            impact_point: transform.translation,
        });
    }
}

/// Система: реакция на Fractured
///
/// 1. Broken marker (идемпотентно: уже сломанные пропускаем)
/// 2. Снимаем Solid + Grabbable — цель больше не препятствие
/// 3. Рассыпаем debris impulses наружу от impact point (seeded RNG)
pub fn react_to_fracture(
    mut commands: Commands,
    mut fracture_events: EventReader<Fractured>,
    targets: Query<(&Breakable, &Transform), Without<Broken>>,
    mut rng: ResMut<DeterministicRng>,
    mut debris_events: EventWriter<DebrisBurst>,
) {
    for event in fracture_events.read() {
        let Ok((breakable, transform)) = targets.get(event.entity) else {
            // Уже Broken или вообще не breakable — no-op
            continue;
        };

        commands
            .entity(event.entity)
            .insert(Broken)
            .remove::<Solid>()
            .remove::<Grabbable>();

        let impulses = scatter_impulses(
            &mut rng.rng,
            breakable.debris_count,
            breakable.debris_impulse,
        );
        debris_events.write(DebrisBurst {
            position: event.impact_point,
            impulses,
        });

        crate::logger::log_info(&format!(
            "Breakable {:?} fractured at {:?} ({} debris pieces)",
            event.entity, event.impact_point, breakable.debris_count
        ));
    }
}

/// Debris impulses: равномерно по yaw, с подбросом вверх
fn scatter_impulses(rng: &mut impl Rng, count: u32, magnitude: f32) -> Vec<Vec3> {
    use std::f32::consts::TAU;

    (0..count)
        .map(|_| {
            let yaw: f32 = rng.gen_range(0.0..TAU);
            let up: f32 = rng.gen_range(0.3..1.0);
            Vec3::new(yaw.cos(), up, yaw.sin()).normalize() * magnitude
        })
        .collect()
}

/// Spawn helper: breakable target
///
/// Solid препятствие с Health; fracturable body живёт в движке,
/// симуляция держит reaction hook.
pub fn spawn_breakable_target(commands: &mut Commands, position: Vec3, radius: f32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Breakable::default(),
            Health::new(50.0),
            PhysicsBody::new(50.0),
            BoundingSphere { radius },
            Solid,
            VisualMesh::new("meshes/breakable_target"),
            // Rapier physics
            RigidBody::Dynamic,
            Collider::cuboid(radius, radius, radius),
            Velocity::default(),
            CollisionGroups::default(),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scatter_impulses_deterministic() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);

        let a = scatter_impulses(&mut rng1, 8, 5.0);
        let b = scatter_impulses(&mut rng2, 8, 5.0);

        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_scatter_impulses_magnitude_and_lift() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let impulses = scatter_impulses(&mut rng, 16, 5.0);

        for impulse in impulses {
            assert!((impulse.length() - 5.0).abs() < 1e-4);
            // Осколки летят вверх, не в пол
            assert!(impulse.y > 0.0);
        }
    }
}
