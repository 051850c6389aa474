//! Grab mechanic (physics handle)
//!
//! Spring-like constraint: удерживаемое тело каждый тик подтягивается
//! к target pose перед камерой (camera pos + forward × grab_distance,
//! ориентация камеры). Interpolation speed обратно пропорциональна
//! половине массы — тяжёлые объекты "устаканиваются" медленнее.
//!
//! Cancellation: release input, либо удерживаемое тело пропало из мира
//! (despawn на стороне движка) — handle сбрасывается сам. Таймаута нет.

use bevy::prelude::*;

use crate::components::{BoundingSphere, CameraRig, Grabbable, PhysicsBody, Player, Solid, VisualMesh};
use crate::spatial;

use super::highlight::{set_highlight, HighlightChanged, HighlightTarget};

/// Physics handle персонажа (0 или 1 удерживаемый объект)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsHandle {
    /// Удерживаемое тело (externally-owned reference, не ownership)
    pub held: Option<Entity>,
    /// Максимальная дистанция grab raycast (метры)
    pub max_grab_distance: f32,
    /// Зафиксированная дистанция удержания = hit distance при grab
    pub grab_distance: f32,
    /// Базовая interpolation speed (для массы 2kg)
    pub base_interpolation_speed: f32,
    /// Текущая interpolation speed = base / (mass / 2)
    pub interpolation_speed: f32,
}

impl Default for PhysicsHandle {
    fn default() -> Self {
        Self {
            held: None,
            max_grab_distance: 5.0,
            grab_distance: 0.0,
            base_interpolation_speed: 12.0,
            interpolation_speed: 12.0,
        }
    }
}

/// Event: grab input edge (press = grab, release = отпустить)
#[derive(Event, Debug, Clone)]
pub struct GrabInput {
    pub entity: Entity,
    pub pressed: bool,
}

/// Target pose для удерживаемого тела
pub fn grab_target_position(camera_position: Vec3, camera_forward: Vec3, distance: f32) -> Vec3 {
    camera_position + camera_forward * distance
}

/// Interpolation speed для массы: base / (mass / 2)
///
/// Формула из оригинальной механики — объект массой 2kg двигается
/// с base speed, тяжелее — медленнее.
pub fn interpolation_speed_for_mass(base: f32, mass: f32) -> f32 {
    base / (mass / 2.0).max(0.1)
}

/// Система: grab/release input edges
///
/// Grab: raycast из камеры до max_grab_distance; hit по Grabbable телу →
/// захват в точке попадания, grab_distance = hit distance, подсветка
/// переезжает на захваченный объект.
/// Release: если что-то держим — отпустить и снять подсветку, иначе no-op.
pub fn handle_grab_input(
    mut commands: Commands,
    mut events: EventReader<GrabInput>,
    mut characters: Query<
        (&Transform, &CameraRig, &mut PhysicsHandle, &mut HighlightTarget),
        With<Player>,
    >,
    solids: Query<(Entity, &Transform, &BoundingSphere), With<Solid>>,
    grabbables: Query<(&PhysicsBody, Option<&VisualMesh>), With<Grabbable>>,
    mut highlight_events: EventWriter<HighlightChanged>,
) {
    for event in events.read() {
        let Ok((transform, rig, mut handle, mut target)) = characters.get_mut(event.entity) else {
            crate::logger::log_warning(&format!(
                "GrabInput for entity {:?} without PhysicsHandle",
                event.entity
            ));
            continue;
        };

        if event.pressed {
            if handle.held.is_some() {
                continue;
            }

            let candidates: Vec<spatial::Candidate> = solids
                .iter()
                .map(|(entity, t, sphere)| (entity, t.translation, sphere.radius))
                .collect();

            let Some(hit) = spatial::raycast(
                rig.position(transform),
                rig.forward(transform),
                handle.max_grab_distance,
                &[event.entity],
                &candidates,
            ) else {
                continue; // Промах — ожидаемый исход
            };

            // Хватаем только Grabbable физические тела
            let Ok((body, mesh)) = grabbables.get(hit.entity) else {
                continue;
            };

            handle.held = Some(hit.entity);
            handle.grab_distance = hit.distance;
            handle.interpolation_speed =
                interpolation_speed_for_mass(handle.base_interpolation_speed, body.mass);

            // Подсвечиваем захваченный объект (если у него есть mesh)
            if mesh.is_some() {
                set_highlight(&mut commands, &mut target, &mut highlight_events, Some(hit.entity));
            }

            crate::logger::log(&format!(
                "Grabbed {:?} at distance {:.2} (interp speed {:.2})",
                hit.entity, handle.grab_distance, handle.interpolation_speed
            ));
        } else {
            // Release с пустыми руками — no-op
            if handle.held.take().is_some() {
                set_highlight(&mut commands, &mut target, &mut highlight_events, None);
            }
        }
    }
}

/// Система: per-tick подтягивание удерживаемого тела к target pose
///
/// Выполняется безусловно каждый тик (no-op если ничего не держим).
/// Velocity = (target - position) × interpolation_speed — spring без
/// осцилляций; ориентация slerp'ится к камере той же скоростью.
///
/// Тело без Transform/PhysicsBody (despawn движком) → handle и подсветка
/// сбрасываются, иначе warning лился бы каждый тик до конца симуляции.
pub fn update_grab_target(
    mut commands: Commands,
    mut characters: Query<
        (&Transform, &CameraRig, &mut PhysicsHandle, &mut HighlightTarget),
        With<Player>,
    >,
    mut held_bodies: Query<(&mut Transform, &mut PhysicsBody), Without<Player>>,
    mut highlight_events: EventWriter<HighlightChanged>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, rig, mut handle, mut highlight) in characters.iter_mut() {
        let Some(held) = handle.held else {
            continue;
        };

        let Ok((mut held_transform, mut body)) = held_bodies.get_mut(held) else {
            crate::logger::log_warning(&format!(
                "Held entity {:?} lost its physics body, dropping grab",
                held
            ));
            handle.held = None;
            set_highlight(&mut commands, &mut highlight, &mut highlight_events, None);
            continue;
        };

        let target = grab_target_position(
            rig.position(transform),
            rig.forward(transform),
            handle.grab_distance,
        );

        body.velocity = (target - held_transform.translation) * handle.interpolation_speed;

        let t = (handle.interpolation_speed * delta).min(1.0);
        held_transform.rotation = held_transform.rotation.slerp(rig.rotation(transform), t);
    }
}
