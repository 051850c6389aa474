//! Damage Model: чистые данные + применение к target
//!
//! DamageSpec — immutable tuning data оружия: сколько здоровья снять
//! и какой физический impulse приложить (Linear/Radial/None).
//!
//! Falloff решение (open question в дизайне): линейный спад от 1.0 на
//! нулевой дистанции до 0.0 на falloff_radius; falloff_radius == 0
//! отключает спад (полный урон на любой дистанции).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Health, PhysicsBody};

/// Как impulse попадания прикладывается к телу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ImpulseKind {
    /// Вдоль направления выстрела, масштаб = amount
    Linear,
    /// Наружу от точки попадания (взрывной толчок)
    Radial,
    /// Без физического impulse
    None,
}

/// Damage tuning data (immutable, конфигурируется при spawn оружия)
///
/// Инварианты: amount ≥ 0, falloff_radius ≥ 0 (конструктор clamp'ит).
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct DamageSpec {
    /// Базовый урон
    pub amount: f32,
    /// Радиус спада урона (метры); 0 = без спада
    pub falloff_radius: f32,
    /// Вид физического impulse
    pub impulse: ImpulseKind,
    /// Opaque классификатор типа урона (для подписчиков движка)
    pub damage_type: String,
}

impl Default for DamageSpec {
    fn default() -> Self {
        Self::new(100.0, 200.0, ImpulseKind::Linear, "generic")
    }
}

impl DamageSpec {
    pub fn new(
        amount: f32,
        falloff_radius: f32,
        impulse: ImpulseKind,
        damage_type: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.max(0.0),
            falloff_radius: falloff_radius.max(0.0),
            impulse,
            damage_type: damage_type.into(),
        }
    }

    /// Множитель урона на дистанции: линейный спад до нуля на falloff_radius
    pub fn falloff_scale(&self, distance: f32) -> f32 {
        if self.falloff_radius <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.falloff_radius).clamp(0.0, 1.0)
    }

    /// Итоговый урон на дистанции
    pub fn damage_at(&self, distance: f32) -> f32 {
        self.amount * self.falloff_scale(distance)
    }

    /// Impulse для тела в target_position при попадании
    /// в hit_point с направлением direction
    pub fn impulse_for(&self, hit_point: Vec3, direction: Vec3, target_position: Vec3) -> Vec3 {
        match self.impulse {
            ImpulseKind::Linear => direction * self.amount,
            ImpulseKind::Radial => {
                let outward = (target_position - hit_point).normalize_or_zero();
                // Попадание точно в центр — fallback на направление выстрела
                if outward == Vec3::ZERO {
                    direction * self.amount
                } else {
                    outward * self.amount
                }
            }
            ImpulseKind::None => Vec3::ZERO,
        }
    }
}

/// Event: оружие попало по entity (внутренний, hitscan + projectile)
#[derive(Event, Debug, Clone)]
pub struct WeaponImpact {
    pub shooter: Entity,
    pub target: Entity,
    /// Точка попадания (world)
    pub position: Vec3,
    /// Направление выстрела (normalized)
    pub direction: Vec3,
    /// Пройденная выстрелом дистанция (для falloff)
    pub distance: f32,
    /// Tuning data оружия
    pub damage: DamageSpec,
}

/// Событие: урон нанесен (для UI, звуков, эффектов)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health упал до 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
#[derive(Component, Debug)]
pub struct Dead;

/// Система: apply damage от WeaponImpact событий
///
/// 1. Урон со спадом по дистанции → Health (если компонент есть)
/// 2. Impulse → PhysicsBody (если компонент есть; Δv = impulse / mass)
/// 3. События DamageDealt / EntityDied
///
/// Target без Health (обычный prop) получает только impulse — это
/// ожидаемо, не ошибка.
pub fn apply_damage(
    mut impacts: EventReader<WeaponImpact>,
    mut targets: Query<(&Transform, Option<&mut Health>, Option<&mut PhysicsBody>)>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for impact in impacts.read() {
        let Ok((transform, health, body)) = targets.get_mut(impact.target) else {
            crate::logger::log_warning(&format!(
                "WeaponImpact: target {:?} not found",
                impact.target
            ));
            continue;
        };

        // Физический impulse
        if let Some(mut body) = body {
            let impulse =
                impact
                    .damage
                    .impulse_for(impact.position, impact.direction, transform.translation);
            body.apply_impulse(impulse);
        }

        // Урон
        if let Some(mut health) = health {
            let final_damage = impact.damage.damage_at(impact.distance);

            let was_alive = health.is_alive();
            health.take_damage(final_damage);
            let is_alive = health.is_alive();

            damage_dealt_events.write(DamageDealt {
                attacker: impact.shooter,
                target: impact.target,
                damage: final_damage,
                target_died: was_alive && !is_alive,
            });

            if was_alive && !is_alive {
                entity_died_events.write(EntityDied {
                    entity: impact.target,
                    killer: Some(impact.shooter),
                });

                crate::logger::log_info(&format!(
                    "Entity {:?} killed by {:?} ({})",
                    impact.target, impact.shooter, impact.damage.damage_type
                ));
            }
        }
    }
}

/// Система: обработка смерти
///
/// Ставит Dead marker и обнуляет velocity — труп перестаёт двигаться.
pub fn handle_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut bodies: Query<&mut PhysicsBody>,
) {
    for event in death_events.read() {
        if let Ok(mut body) = bodies.get_mut(event.entity) {
            body.velocity = Vec3::ZERO;
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_linear_decay() {
        let spec = DamageSpec::new(100.0, 10.0, ImpulseKind::None, "test");

        assert_eq!(spec.damage_at(0.0), 100.0);
        assert_eq!(spec.damage_at(5.0), 50.0);
        assert_eq!(spec.damage_at(10.0), 0.0);
        // За радиусом — clamp к нулю, не отрицательный
        assert_eq!(spec.damage_at(20.0), 0.0);
    }

    #[test]
    fn test_falloff_disabled_at_zero_radius() {
        let spec = DamageSpec::new(100.0, 0.0, ImpulseKind::None, "test");

        assert_eq!(spec.damage_at(0.0), 100.0);
        assert_eq!(spec.damage_at(999.0), 100.0);
    }

    #[test]
    fn test_spec_clamps_negative_config() {
        // Инвариант: amount ≥ 0, falloff_radius ≥ 0
        let spec = DamageSpec::new(-5.0, -1.0, ImpulseKind::None, "test");
        assert_eq!(spec.amount, 0.0);
        assert_eq!(spec.falloff_radius, 0.0);
    }

    #[test]
    fn test_linear_impulse_along_direction() {
        let spec = DamageSpec::new(50.0, 0.0, ImpulseKind::Linear, "test");
        let impulse = spec.impulse_for(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(impulse, Vec3::NEG_Z * 50.0);
    }

    #[test]
    fn test_radial_impulse_outward_from_hit_point() {
        let spec = DamageSpec::new(50.0, 0.0, ImpulseKind::Radial, "test");
        let hit_point = Vec3::new(0.0, 0.0, -1.0); // Попадание в край
        let target_center = Vec3::new(0.0, 0.0, -2.0);

        let impulse = spec.impulse_for(hit_point, Vec3::NEG_Z, target_center);

        // Наружу от точки попадания = от hit к центру тела
        assert!((impulse - Vec3::NEG_Z * 50.0).length() < 1e-4);
    }

    #[test]
    fn test_radial_impulse_center_hit_fallback() {
        let spec = DamageSpec::new(50.0, 0.0, ImpulseKind::Radial, "test");
        // Hit точно в центр тела — outward не определён, fallback на direction
        let impulse = spec.impulse_for(Vec3::ZERO, Vec3::X, Vec3::ZERO);

        assert_eq!(impulse, Vec3::X * 50.0);
    }

    #[test]
    fn test_none_impulse() {
        let spec = DamageSpec::new(50.0, 0.0, ImpulseKind::None, "test");
        assert_eq!(spec.impulse_for(Vec3::ZERO, Vec3::X, Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn test_damage_dealt_event() {
        let event = DamageDealt {
            attacker: Entity::PLACEHOLDER,
            target: Entity::PLACEHOLDER,
            damage: 15.0,
            target_died: false,
        };

        assert_eq!(event.damage, 15.0);
        assert!(!event.target_died);
    }
}
