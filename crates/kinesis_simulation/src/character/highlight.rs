//! Highlight lookable/grabbable объектов
//!
//! Правила:
//! - Максимум один подсвеченный объект
//! - Система не работает пока что-то удерживается (grab сам управляет
//!   подсветкой удерживаемого объекта)
//! - Подсвечиваются только объекты с VisualMesh (движку нужен mesh
//!   чтобы повесить overlay material)

use bevy::prelude::*;

use crate::components::{BoundingSphere, CameraRig, Player, Solid, VisualMesh};
use crate::spatial;

use super::grab::PhysicsHandle;

/// Маркер: объект сейчас подсвечен
///
/// Движок читает добавление/удаление (через HighlightChanged)
/// и включает/выключает overlay material.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Highlighted;

/// Текущая цель подсветки персонажа (0 или 1 объект)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct HighlightTarget {
    pub current: Option<Entity>,
}

/// Event: подсветка переключилась (outbound для движка)
#[derive(Event, Debug, Clone)]
pub struct HighlightChanged {
    pub previous: Option<Entity>,
    pub current: Option<Entity>,
}

/// Переключает подсветку на new (swap маркеров + event)
///
/// Идемпотентно: та же цель — ничего не делаем, event не шлём.
pub fn set_highlight(
    commands: &mut Commands,
    target: &mut HighlightTarget,
    events: &mut EventWriter<HighlightChanged>,
    new: Option<Entity>,
) {
    if target.current == new {
        return;
    }

    if let Some(previous) = target.current {
        if let Ok(mut entity_commands) = commands.get_entity(previous) {
            entity_commands.remove::<Highlighted>();
        }
    }
    if let Some(entity) = new {
        commands.entity(entity).insert(Highlighted);
    }

    events.write(HighlightChanged {
        previous: target.current,
        current: new,
    });
    target.current = new;
}

/// Система: per-tick highlight update
///
/// Raycast из камеры вперёд до max_grab_distance:
/// - hit по объекту с VisualMesh → подсветить его (swap)
/// - промах или hit по объекту без mesh → очистить
///
/// Пока объект удерживается — система не трогает подсветку вообще.
pub fn update_highlight(
    mut commands: Commands,
    mut characters: Query<
        (Entity, &Transform, &CameraRig, &PhysicsHandle, &mut HighlightTarget),
        With<Player>,
    >,
    solids: Query<(Entity, &Transform, &BoundingSphere), With<Solid>>,
    meshes: Query<&VisualMesh>,
    mut events: EventWriter<HighlightChanged>,
) {
    for (character, transform, rig, handle, mut target) in characters.iter_mut() {
        // Подсветка подавлена пока объект удерживается
        if handle.held.is_some() {
            continue;
        }

        let candidates: Vec<spatial::Candidate> = solids
            .iter()
            .map(|(entity, t, sphere)| (entity, t.translation, sphere.radius))
            .collect();

        let hit = spatial::raycast(
            rig.position(transform),
            rig.forward(transform),
            handle.max_grab_distance,
            &[character],
            &candidates,
        );

        match hit {
            Some(hit) if meshes.get(hit.entity).is_ok() => {
                set_highlight(&mut commands, &mut target, &mut events, Some(hit.entity));
            }
            // Промах или препятствие без visual mesh — гасим подсветку
            _ => {
                set_highlight(&mut commands, &mut target, &mut events, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_target_default_empty() {
        let target = HighlightTarget::default();
        assert!(target.current.is_none());
    }

    #[test]
    fn test_highlight_changed_event() {
        let event = HighlightChanged {
            previous: None,
            current: Some(Entity::from_raw(3)),
        };

        assert!(event.previous.is_none());
        assert_eq!(event.current, Some(Entity::from_raw(3)));
    }
}
