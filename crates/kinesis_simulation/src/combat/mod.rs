//! Combat module: Weapon (Hitscan/Projectile) + Damage Model
//!
//! ECS ответственность:
//! - Weapon state: range/trace radius/cooldown, fire dispatch
//! - Damage rules: falloff, impulse kind (Linear/Radial/None)
//! - Events: WeaponImpact → DamageDealt / EntityDied
//!
//! Движок ответственность:
//! - VFX по ImpactEffectRequest (fire-and-forget)
//! - Подписчики HitscanImpact (UI, audio, analytics)

use bevy::prelude::*;

pub mod damage;
pub mod projectile;
pub mod weapon;

// Re-export основных типов
pub use damage::{DamageDealt, DamageSpec, Dead, EntityDied, ImpulseKind, WeaponImpact};
pub use projectile::Projectile;
pub use weapon::{FireIntent, HitscanImpact, ImpactEffectRequest, Weapon, WeaponKind};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. tick_weapon_cooldowns — обновление cooldown таймеров
/// 2. fire_weapons — FireIntent → hitscan trace / projectile spawn
/// 3. update_projectiles — lifetime + overlap check
/// 4. apply_damage — WeaponImpact → health loss + impulse
/// 5. handle_death — Dead marker, обнуление velocity
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<FireIntent>()
            .add_event::<WeaponImpact>()
            .add_event::<HitscanImpact>()
            .add_event::<ImpactEffectRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        // Регистрация систем в FixedUpdate (после character phase —
        // стреляем по уже проинтегрированным позициям)
        app.add_systems(
            FixedUpdate,
            (
                weapon::tick_weapon_cooldowns,
                weapon::fire_weapons,
                projectile::update_projectiles,
                damage::apply_damage,
                damage::handle_death,
            )
                .chain() // Последовательное выполнение
                .in_set(crate::SimulationSet::Combat),
        );
    }
}
