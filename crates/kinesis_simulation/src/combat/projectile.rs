//! Physical projectile (spawn при Fire, урон на собственном collision)
//!
//! Архитектура:
//! - Снаряд — короткоживущий entity с PhysicsBody (летит через общую
//!   velocity integration, без гравитации)
//! - Overlap check против Solid целей каждый тик (sphere vs sphere)
//! - Hit → WeaponImpact + ImpactEffectRequest, despawn
//! - Lifetime истёк без попадания → тихий despawn

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{BoundingSphere, PhysicsBody, Solid};

use super::damage::{DamageSpec, WeaponImpact};
use super::weapon::ImpactEffectRequest;

/// Projectile component (несёт DamageSpec от выстрелившего оружия)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    /// Кто выстрелил (исключается из коллизий — никакого self-hit)
    pub shooter: Entity,
    /// Tuning data оружия
    pub damage: DamageSpec,
    /// Оставшееся время жизни (секунды)
    pub lifetime: f32,
    /// Радиус снаряда для overlap check (метры)
    pub radius: f32,
    /// Пройденная дистанция (для falloff)
    pub traveled: f32,
}

/// Spawn helper: снаряд с полным набором компонентов
///
/// Rapier sensor — не физическое препятствие, только detection.
/// Снаряд НЕ Solid: raycasts и чужие выстрелы сквозь него проходят.
pub fn spawn_projectile(
    commands: &mut Commands,
    shooter: Entity,
    origin: Vec3,
    velocity: Vec3,
    lifetime: f32,
    damage: DamageSpec,
) -> Entity {
    const PROJECTILE_RADIUS: f32 = 0.1;
    const PROJECTILE_MASS: f32 = 0.2;

    let mut body = PhysicsBody::new(PROJECTILE_MASS);
    body.velocity = velocity;

    commands
        .spawn((
            Transform::from_translation(origin),
            Projectile {
                shooter,
                damage,
                lifetime,
                radius: PROJECTILE_RADIUS,
                traveled: 0.0,
            },
            body,
            // Rapier sensor (не физическое тело, только detection)
            Collider::ball(PROJECTILE_RADIUS),
            Sensor,
            CollisionGroups::default(),
            Velocity::default(),
        ))
        .id()
}

/// Система: lifetime + overlap check снарядов
///
/// Позиция уже проинтегрирована общей системой integrate_bodies;
/// здесь только детект попаданий и истечение lifetime.
pub fn update_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile, &Transform, &PhysicsBody)>,
    targets: Query<(Entity, &Transform, &BoundingSphere), With<Solid>>,
    mut impact_events: EventWriter<WeaponImpact>,
    mut effect_events: EventWriter<ImpactEffectRequest>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, transform, body) in projectiles.iter_mut() {
        projectile.lifetime -= delta;
        projectile.traveled += body.velocity.length() * delta;

        if projectile.lifetime <= 0.0 {
            // Истёк без попадания — тихий despawn
            commands.entity(entity).despawn();
            continue;
        }

        let position = transform.translation;

        for (target, target_transform, sphere) in targets.iter() {
            // Не бьем самого стрелка
            if target == projectile.shooter {
                continue;
            }

            let distance = position.distance(target_transform.translation);
            if distance < projectile.radius + sphere.radius {
                let direction = body.velocity.normalize_or_zero();

                impact_events.write(WeaponImpact {
                    shooter: projectile.shooter,
                    target,
                    position,
                    direction,
                    distance: projectile.traveled,
                    damage: projectile.damage.clone(),
                });
                effect_events.write(ImpactEffectRequest { position });

                crate::logger::log(&format!(
                    "Projectile {:?} hit {:?} after {:.2}m",
                    entity, target, projectile.traveled
                ));

                commands.entity(entity).despawn();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ImpulseKind;

    #[test]
    fn test_projectile_overlap_logic() {
        // Простая проверка sphere-sphere overlap
        let projectile_pos = Vec3::new(0.0, 1.0, -4.95);
        let projectile_radius = 0.1;

        let target_near = Vec3::new(0.0, 1.0, -5.0); // distance 0.05 < 0.6 ✓
        let target_far = Vec3::new(0.0, 1.0, -8.0);

        let target_radius = 0.5;
        assert!(projectile_pos.distance(target_near) < projectile_radius + target_radius);
        assert!(projectile_pos.distance(target_far) > projectile_radius + target_radius);
    }

    #[test]
    fn test_projectile_carries_damage_spec() {
        let damage = DamageSpec::new(80.0, 0.0, ImpulseKind::Radial, "projectile");
        let projectile = Projectile {
            shooter: Entity::PLACEHOLDER,
            damage: damage.clone(),
            lifetime: 5.0,
            radius: 0.1,
            traveled: 0.0,
        };

        assert_eq!(projectile.damage, damage);
        assert_eq!(projectile.lifetime, 5.0);
    }
}
