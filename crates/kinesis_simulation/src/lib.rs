//! KINESIS Simulation Core
//!
//! Headless ECS-симуляция first-person physics-interaction gameplay
//! (Bevy 0.16, fixed timestep 60Hz).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = gameplay layer (stamina/sprint rules, grab spring, weapon fire,
//!   damage + impulse model, breakable reactions)
//! - Host engine = presentation layer (rendering, real input devices,
//!   fracture solving, VFX) — общается через inbound/outbound events

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod character;
pub mod combat;
pub mod components;
pub mod destruction;
pub mod logger;
pub mod spatial;

// Re-export базовых типов для удобства
pub use character::{
    CharacterPlugin, GrabInput, HighlightChanged, HighlightTarget, Highlighted, JumpIntent,
    LookInput, MoveInput, PhysicsHandle, SprintInput, SprintState,
};
pub use combat::{
    DamageDealt, DamageSpec, Dead, EntityDied, FireIntent, HitscanImpact, ImpactEffectRequest,
    ImpulseKind, Projectile, Weapon, WeaponImpact, WeaponKind,
};
pub use components::*;
pub use destruction::{Breakable, Broken, DebrisBurst, DestructionPlugin, Fractured};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};

/// Фазы simulation tick'а
///
/// Каждый plugin кладёт свой chain в свой set; между set'ами порядок
/// фиксирован (character → combat → destruction). Без явного порядка
/// multi_threaded executor волен переставлять конфликтующие системы
/// между группами от прогона к прогону, ломая детерминизм.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Input, движение, grab, highlight, интеграция velocity
    Character,
    /// Выстрелы, снаряды, урон, смерть
    Combat,
    /// Fracture reactions
    Destruction,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG: не перетираем seed из create_headless_app
        if app.world().get_resource::<DeterministicRng>().is_none() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Жёсткий порядок фаз внутри тика
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Character,
                SimulationSet::Combat,
                SimulationSet::Destruction,
            )
                .chain(),
        );

        // Подсистемы gameplay layer
        app.add_plugins((CharacterPlugin, combat::CombatPlugin, DestructionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Упрощённая версия: сериализуем компоненты через Debug, сортируем по
/// Entity ID чтобы порядок iteration не влиял на результат.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
