//! Character controller module (first-person gameplay layer)
//!
//! ECS ответственность:
//! - Sprint/stamina state machine (debounce при depletion)
//! - Движение: look (yaw/pitch), WASD velocity, gravity, jump
//! - Highlight: один подсвеченный объект, подавляется во время grab
//! - Grab: physics handle, spring-pull удерживаемого тела каждый тик
//!
//! Движок отвечает за: input mapping, overlay material, реальную камеру.
//! Граница — intent events (Move/Look/Sprint/Grab) + HighlightChanged.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod grab;
pub mod highlight;
pub mod movement;
pub mod sprint;

// Re-export основных типов
pub use grab::{GrabInput, PhysicsHandle};
pub use highlight::{HighlightChanged, HighlightTarget, Highlighted};
pub use movement::{CharacterController, JumpIntent, LookInput, MoveInput};
pub use sprint::{SprintInput, SprintState};

use crate::combat::Weapon;
use crate::components::{BoundingSphere, CameraRig, Health, PhysicsBody, Player, Solid, Stamina};

/// Character Plugin
///
/// Регистрирует character системы в FixedUpdate (60Hz).
///
/// Порядок выполнения (level-triggered каждый тик, кроме input edges):
/// 1. ground_detection — до gravity/jump
/// 2. apply_look_input — yaw тела + pitch камеры
/// 3. handle_sprint_input / update_sprint — edge + per-tick stamina rules
/// 4. apply_movement_input / handle_jump_intents / apply_gravity
/// 5. handle_grab_input — grab/release edges (raycast при grab)
/// 6. update_highlight — подавлен пока объект удерживается
/// 7. update_grab_target — spring-pull к camera pose (no-op без held)
/// 8. integrate_bodies — velocity → Transform (все PhysicsBody)
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        use bevy_rapier3d::plugin::PhysicsSet;

        // Регистрация событий
        app.add_event::<LookInput>()
            .add_event::<JumpIntent>()
            .add_event::<SprintInput>()
            .add_event::<GrabInput>()
            .add_event::<HighlightChanged>();

        // Наши системы запускаются ДО rapier physics step
        app.add_systems(
            FixedUpdate,
            (
                movement::ground_detection,
                movement::apply_look_input,
                sprint::handle_sprint_input,
                sprint::update_sprint,
                movement::apply_movement_input,
                movement::handle_jump_intents,
                movement::apply_gravity,
                grab::handle_grab_input,
                highlight::update_highlight,
                grab::update_grab_target,
                movement::integrate_bodies,
            )
                .chain() // Последовательное выполнение
                .in_set(crate::SimulationSet::Character)
                .before(PhysicsSet::SyncBackend),
        );
    }
}

/// Spawn helper для first-person персонажа
///
/// Создает entity с полным набором компонентов:
/// - Transform + PhysicsBody + CameraRig
/// - Health, Stamina, sprint/grab/highlight state
/// - Weapon (ровно одно, default hitscan rifle)
/// - Rapier: RigidBody + Collider (capsule)
pub fn spawn_character(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            // Bevy transform
            Transform::from_translation(position),
            // Наши компоненты
            Player,
            Health::default(),
            Stamina::default(),
            CameraRig::default(),
            CharacterController::default(),
            SprintState::default(),
            MoveInput::default(),
            PhysicsHandle::default(),
            HighlightTarget::default(),
            Weapon::default(),
            PhysicsBody::new(80.0),
            BoundingSphere { radius: 0.5 },
            Solid,
            // Rapier physics
            (
                RigidBody::KinematicPositionBased,
                Collider::capsule_y(0.5, 0.4), // Высота 1.0m (0.5 + 0.5), радиус 0.4m
                Velocity::default(),
                CollisionGroups::default(),
            ),
        ))
        .id()
}
