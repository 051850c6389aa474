//! Weapon: полиморфный Fire (Hitscan / Projectile)
//!
//! Контракт Fire():
//! - Hitscan: swept-sphere trace от камеры (с muzzle offset 1m) до range,
//!   стрелок исключён из коллизий. Hit → ровно одно применение Damage
//!   Model + одно HitscanImpact уведомление + один ImpactEffectRequest.
//!   Промах → тишина (ожидаемый исход, не ошибка).
//! - Projectile: spawn летящего тела, несущего DamageSpec; урон
//!   применяется на его собственном collision event (projectile.rs).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{BoundingSphere, CameraRig, Solid};
use crate::spatial;

use super::damage::{DamageSpec, ImpulseKind, WeaponImpact};
use super::projectile;

/// Смещение начала trace вперёд от камеры (метры) —
/// чтобы не цеплять собственную capsule стрелка
pub const MUZZLE_OFFSET: f32 = 1.0;

/// Вид оружия — единственный полиморфный шов
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Мгновенный swept-sphere trace
    Hitscan {
        /// Дальность trace от камеры (метры)
        range: f32,
        /// Радиус swept sphere (метры)
        trace_radius: f32,
    },
    /// Spawn физического снаряда
    Projectile {
        /// Начальная скорость снаряда (m/s)
        speed: f32,
        /// Время жизни снаряда (секунды)
        lifetime: f32,
    },
}

/// Weapon component
///
/// Конфигурируется при spawn, стреляет многократно; между выстрелами
/// живёт только cooldown timer.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: DamageSpec,
    /// Cooldown между выстрелами (секунды)
    pub fire_cooldown: f32,
    /// Текущий cooldown timer (уменьшается до 0)
    pub cooldown_timer: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::hitscan_rifle()
    }
}

impl Weapon {
    /// Hitscan rifle: дальний trace, линейный impulse
    pub fn hitscan_rifle() -> Self {
        Self {
            kind: WeaponKind::Hitscan {
                range: 50.0,
                trace_radius: 0.5,
            },
            damage: DamageSpec::new(100.0, 200.0, ImpulseKind::Linear, "hitscan"),
            fire_cooldown: 0.5,
            cooldown_timer: 0.0,
        }
    }

    /// Projectile launcher: медленный снаряд, radial impulse
    pub fn projectile_launcher() -> Self {
        Self {
            kind: WeaponKind::Projectile {
                speed: 30.0,
                lifetime: 5.0,
            },
            damage: DamageSpec::new(80.0, 0.0, ImpulseKind::Radial, "projectile"),
            fire_cooldown: 1.0,
            cooldown_timer: 0.0,
        }
    }

    /// Может ли weapon стрелять (cooldown == 0)
    pub fn can_fire(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Начать cooldown после выстрела
    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.fire_cooldown;
    }
}

/// Event: актёр хочет выстрелить (inbound от input движка)
#[derive(Event, Debug, Clone)]
pub struct FireIntent {
    pub shooter: Entity,
}

/// Event: hitscan попал (outbound delegate для подписчиков —
/// UI, audio, analytics)
#[derive(Event, Debug, Clone)]
pub struct HitscanImpact {
    pub actor: Entity,
    pub position: Vec3,
    pub direction: Vec3,
}

/// Event: запрос косметического эффекта в точке (fire-and-forget,
/// движок спавнит particle system)
#[derive(Event, Debug, Clone)]
pub struct ImpactEffectRequest {
    pub position: Vec3,
}

/// Система: обновление weapon cooldowns
pub fn tick_weapon_cooldowns(mut weapons: Query<&mut Weapon>, time: Res<Time<Fixed>>) {
    for mut weapon in weapons.iter_mut() {
        if weapon.cooldown_timer > 0.0 {
            weapon.cooldown_timer = (weapon.cooldown_timer - time.delta_secs()).max(0.0);
        }
    }
}

/// Система: обработка FireIntent → hitscan trace или projectile spawn
pub fn fire_weapons(
    mut commands: Commands,
    mut intents: EventReader<FireIntent>,
    mut shooters: Query<(&Transform, &CameraRig, &mut Weapon)>,
    solids: Query<(Entity, &Transform, &BoundingSphere), With<Solid>>,
    mut impact_events: EventWriter<WeaponImpact>,
    mut hitscan_events: EventWriter<HitscanImpact>,
    mut effect_events: EventWriter<ImpactEffectRequest>,
) {
    for intent in intents.read() {
        let Ok((transform, rig, mut weapon)) = shooters.get_mut(intent.shooter) else {
            crate::logger::log_warning(&format!(
                "FireIntent: shooter {:?} has no Weapon/CameraRig",
                intent.shooter
            ));
            continue;
        };

        if !weapon.can_fire() {
            continue;
        }
        weapon.start_cooldown();

        let camera_position = rig.position(transform);
        let forward = rig.forward(transform);
        let origin = camera_position + forward * MUZZLE_OFFSET;

        match weapon.kind {
            WeaponKind::Hitscan {
                range,
                trace_radius,
            } => {
                let candidates: Vec<spatial::Candidate> = solids
                    .iter()
                    .map(|(entity, t, sphere)| (entity, t.translation, sphere.radius))
                    .collect();

                // Trace до range от камеры (начало уже сдвинуто на muzzle offset)
                let max_distance = (range - MUZZLE_OFFSET).max(0.0);
                let Some(hit) = spatial::sphere_cast(
                    origin,
                    forward,
                    trace_radius,
                    max_distance,
                    &[intent.shooter],
                    &candidates,
                ) else {
                    continue; // Silent miss: ни урона, ни эффекта
                };

                impact_events.write(WeaponImpact {
                    shooter: intent.shooter,
                    target: hit.entity,
                    position: hit.point,
                    direction: forward,
                    distance: MUZZLE_OFFSET + hit.distance,
                    damage: weapon.damage.clone(),
                });
                hitscan_events.write(HitscanImpact {
                    actor: hit.entity,
                    position: hit.point,
                    direction: forward,
                });
                effect_events.write(ImpactEffectRequest {
                    position: hit.point,
                });

                crate::logger::log(&format!(
                    "Hitscan {:?} hit {:?} at {:.2}m",
                    intent.shooter, hit.entity, hit.distance
                ));
            }
            WeaponKind::Projectile { speed, lifetime } => {
                projectile::spawn_projectile(
                    &mut commands,
                    intent.shooter,
                    origin,
                    forward * speed,
                    lifetime,
                    weapon.damage.clone(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_cooldown() {
        let mut weapon = Weapon::hitscan_rifle();
        assert!(weapon.can_fire());

        weapon.start_cooldown();
        assert!(!weapon.can_fire());
        assert_eq!(weapon.cooldown_timer, 0.5);

        // Simulate tick
        weapon.cooldown_timer -= 0.25;
        assert!(!weapon.can_fire());

        weapon.cooldown_timer -= 0.25;
        assert!(weapon.can_fire());
    }

    #[test]
    fn test_weapon_presets() {
        let rifle = Weapon::hitscan_rifle();
        assert!(matches!(rifle.kind, WeaponKind::Hitscan { .. }));
        assert_eq!(rifle.damage.impulse, ImpulseKind::Linear);

        let launcher = Weapon::projectile_launcher();
        assert!(matches!(launcher.kind, WeaponKind::Projectile { .. }));
        assert_eq!(launcher.damage.impulse, ImpulseKind::Radial);
    }

    #[test]
    fn test_hitscan_trace_resolution() {
        // Логика trace напрямую через spatial (без App schedule):
        // камера в origin, цель прямо по курсу на 10m
        let target = Entity::from_raw(2);
        let shooter = Entity::from_raw(1);
        let candidates = vec![
            (shooter, Vec3::ZERO, 0.5), // Собственная capsule стрелка
            (target, Vec3::new(0.0, 0.0, -10.0), 0.5),
        ];

        let origin = Vec3::NEG_Z * MUZZLE_OFFSET;
        let hit = spatial::sphere_cast(origin, Vec3::NEG_Z, 0.5, 49.0, &[shooter], &candidates)
            .expect("target straight ahead");

        assert_eq!(hit.entity, target);
        // Поверхность swept sphere: 10 - 0.5 - 0.5 - muzzle = 8.0
        assert!((hit.distance - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_hitscan_miss_is_silent() {
        // Промах — None, никакой damage application
        let candidates: Vec<spatial::Candidate> = vec![];
        let hit = spatial::sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 0.5, 50.0, &[], &candidates);
        assert!(hit.is_none());
    }
}
