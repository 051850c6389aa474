//! Движение first-person персонажа
//!
//! Архитектура:
//! - Custom velocity integration (Rapier только для collisions)
//! - Look input → yaw тела + pitch CameraRig
//! - Gravity + ground check + jump
//!
//! Детерминизм: fixed timestep (60Hz), все системы в FixedUpdate.

use bevy::prelude::*;

use crate::combat::Projectile;
use crate::components::{BoundingSphere, CameraRig, PhysicsBody, Player};

/// Параметры движения персонажа
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterController {
    /// Базовая скорость ходьбы (m/s)
    pub base_speed: f32,
    /// Множитель скорости при спринте
    pub sprint_multiplier: f32,
    /// Текущая max скорость (base × multiplier при спринте)
    pub speed: f32,
    /// Сила гравитации (m/s²)
    pub gravity: f32,
    /// Вертикальная скорость прыжка (m/s)
    pub jump_speed: f32,
    /// На земле ли персонаж
    pub grounded: bool,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self {
            base_speed: 5.0, // 5 m/s (средняя скорость ходьбы)
            sprint_multiplier: 1.6,
            speed: 5.0,
            gravity: -9.81, // Earth gravity
            jump_speed: 4.5,
            grounded: false,
        }
    }
}

/// Входные данные для движения (WASD axis)
///
/// Для headless тестов — mock input через этот компонент.
/// В игре заполняется движком из input mapping.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MoveInput {
    /// x = strafe right, y = forward (normalized движком)
    pub axis: Vec2,
}

/// Event: look input (mouse/gamepad delta)
#[derive(Event, Debug, Clone)]
pub struct LookInput {
    pub entity: Entity,
    pub delta: Vec2,
}

/// Event: jump intent (edge)
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

/// Система ground detection через простую Y-проверку
///
/// Origin персонажа в ногах, пол на y=0: grounded если y ≤ epsilon.
/// TODO: заменить на raycast вниз когда подключим полный Rapier plugin
pub fn ground_detection(mut query: Query<(&Transform, &mut CharacterController)>) {
    const GROUND_EPSILON: f32 = 0.01;

    for (transform, mut controller) in query.iter_mut() {
        controller.grounded = transform.translation.y <= GROUND_EPSILON;
    }
}

/// Система: look input → yaw тела + pitch камеры
///
/// Yaw применяем к Transform (вместе с телом поворачивается walk direction),
/// pitch остаётся на CameraRig.
pub fn apply_look_input(
    mut events: EventReader<LookInput>,
    mut query: Query<(&mut Transform, &mut CameraRig), With<Player>>,
) {
    for event in events.read() {
        let Ok((mut transform, mut rig)) = query.get_mut(event.entity) else {
            continue;
        };

        let sensitivity = rig.sensitivity;
        transform.rotate_y(-event.delta.x * sensitivity);
        rig.add_pitch(-event.delta.y * sensitivity);
    }
}

/// Система применения движения от input
///
/// Горизонтальная velocity из axis, повёрнутого yaw'ом тела.
/// Y velocity не трогаем (gravity/jump handling).
pub fn apply_movement_input(
    mut query: Query<(
        &CharacterController,
        &MoveInput,
        &Transform,
        &mut PhysicsBody,
    )>,
) {
    for (controller, input, transform, mut body) in query.iter_mut() {
        if input.axis.length_squared() > 0.01 {
            let local = Vec3::new(input.axis.x, 0.0, -input.axis.y);
            let mut direction = transform.rotation * local;
            direction.y = 0.0;
            let direction = direction.normalize_or_zero();

            body.velocity.x = direction.x * controller.speed;
            body.velocity.z = direction.z * controller.speed;
        } else {
            // Останавливаем горизонтальное движение
            body.velocity.x = 0.0;
            body.velocity.z = 0.0;
        }
    }
}

/// Система: jump intents (edge)
pub fn handle_jump_intents(
    mut events: EventReader<JumpIntent>,
    mut query: Query<(&CharacterController, &mut PhysicsBody), With<Player>>,
) {
    for event in events.read() {
        let Ok((controller, mut body)) = query.get_mut(event.entity) else {
            continue;
        };

        if controller.grounded {
            body.velocity.y = controller.jump_speed;
        }
    }
}

/// Система применения gravity к velocity персонажей
pub fn apply_gravity(
    mut query: Query<(&CharacterController, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body) in query.iter_mut() {
        if !controller.grounded {
            body.velocity.y += controller.gravity * delta;
        }
    }
}

/// Система интеграции velocity → Transform для всех PhysicsBody
///
/// Персонажи упираются в пол на y=0 (origin в ногах), props — на
/// y=radius (центр bounding sphere). Projectiles летят без floor clamp.
pub fn integrate_bodies(
    mut characters: Query<(&mut PhysicsBody, &mut Transform), With<CharacterController>>,
    mut props: Query<
        (&mut PhysicsBody, &mut Transform, &BoundingSphere),
        (Without<CharacterController>, Without<Projectile>),
    >,
    mut projectiles: Query<
        (&PhysicsBody, &mut Transform),
        (With<Projectile>, Without<CharacterController>),
    >,
    time: Res<Time<Fixed>>,
) {
    const PROP_GRAVITY: f32 = -9.81;
    const GROUND_FRICTION: f32 = 4.0;

    let delta = time.delta_secs();

    for (mut body, mut transform) in characters.iter_mut() {
        transform.translation = transform.translation + body.velocity * delta;
        if transform.translation.y < 0.0 {
            transform.translation.y = 0.0;
            body.velocity.y = body.velocity.y.max(0.0);
        }
    }

    for (mut body, mut transform, sphere) in props.iter_mut() {
        // Props получают гравитацию здесь (у них нет CharacterController)
        body.velocity.y += PROP_GRAVITY * delta;
        transform.translation = transform.translation + body.velocity * delta;

        if transform.translation.y < sphere.radius {
            transform.translation.y = sphere.radius;
            body.velocity.y = body.velocity.y.max(0.0);
            // Трение на полу: гасим горизонтальную скорость
            let damping = (1.0 - GROUND_FRICTION * delta).max(0.0);
            body.velocity.x *= damping;
            body.velocity.z *= damping;
        }
    }

    for (body, mut transform) in projectiles.iter_mut() {
        transform.translation = transform.translation + body.velocity * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_logic() {
        // Логика гравитации напрямую (без App schedule)
        let controller = CharacterController {
            grounded: false,
            ..default()
        };
        let mut body = PhysicsBody::new(80.0);

        let delta = 1.0 / 60.0; // 1 FixedUpdate tick

        if !controller.grounded {
            body.velocity.y += controller.gravity * delta;
        }

        // После 1/60 sec: velocity.y = -9.81 / 60 ≈ -0.1635
        assert!(body.velocity.y < -0.16);
        assert!(body.velocity.y > -0.17);
    }

    #[test]
    fn test_movement_input_forward() {
        let controller = CharacterController::default();
        let input = MoveInput { axis: Vec2::Y }; // Forward
        let transform = Transform::IDENTITY;
        let mut body = PhysicsBody::new(80.0);

        if input.axis.length_squared() > 0.01 {
            let local = Vec3::new(input.axis.x, 0.0, -input.axis.y);
            let direction = (transform.rotation * local).normalize_or_zero();
            body.velocity.x = direction.x * controller.speed;
            body.velocity.z = direction.z * controller.speed;
        }

        // Forward = -Z в Bevy
        assert!((body.velocity.z + 5.0).abs() < 0.01, "velocity.z = {}", body.velocity.z);
        assert!(body.velocity.x.abs() < 0.01);
    }

    #[test]
    fn test_grounded_stops_gravity_logic() {
        let controller = CharacterController {
            grounded: true,
            ..default()
        };
        let mut body = PhysicsBody::new(80.0);

        if !controller.grounded {
            body.velocity.y += controller.gravity * (1.0 / 60.0);
        }

        assert_eq!(body.velocity.y, 0.0);
    }
}
