//! Geometric queries поверх ECS entities
//!
//! Упрощённая замена physics-world queries движка: препятствия
//! аппроксимируем bounding sphere'ами и пересекаем лучи/swept spheres
//! чистыми функциями — gameplay-правила тестируются без живого
//! physics backend (кандидаты собираются из Query и передаются сюда).
//!
//! TODO: заменить на Rapier QueryPipeline когда подключим полный plugin

use bevy::prelude::*;

/// Кандидат для query: entity + центр + радиус bounding sphere
pub type Candidate = (Entity, Vec3, f32);

/// Результат ray/sphere cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    /// Точка контакта (для sphere cast — центр swept sphere в момент контакта)
    pub point: Vec3,
    /// Дистанция от origin вдоль луча
    pub distance: f32,
}

/// Ray cast против списка кандидатов, ближайший hit
///
/// `direction` должен быть нормализован. `exclude` — стрелок/владелец,
/// исключается из коллизий. Промах — `None` (ожидаемый исход, не ошибка).
pub fn raycast(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    exclude: &[Entity],
    candidates: &[Candidate],
) -> Option<RayHit> {
    sphere_cast(origin, direction, 0.0, max_distance, exclude, candidates)
}

/// Swept-sphere cast против списка кандидатов, ближайший hit
///
/// Классический приём: swept sphere радиуса r против sphere радиуса R
/// эквивалентен лучу против sphere радиуса R + r.
pub fn sphere_cast(
    origin: Vec3,
    direction: Vec3,
    cast_radius: f32,
    max_distance: f32,
    exclude: &[Entity],
    candidates: &[Candidate],
) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;

    for &(entity, center, radius) in candidates {
        if exclude.contains(&entity) {
            continue;
        }

        let Some(distance) = ray_sphere_distance(origin, direction, center, radius + cast_radius)
        else {
            continue;
        };

        if distance > max_distance {
            continue;
        }

        if nearest.is_none_or(|hit| distance < hit.distance) {
            nearest = Some(RayHit {
                entity,
                point: origin + direction * distance,
                distance,
            });
        }
    }

    nearest
}

/// Дистанция вдоль луча до пересечения со сферой, либо None
///
/// Origin внутри сферы считается hit'ом на дистанции 0
/// (grab вплотную к объекту должен работать).
fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;

    if c <= 0.0 {
        // Внутри сферы
        return Some(0.0);
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    if t < 0.0 {
        // Сфера позади луча
        return None;
    }

    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(index: u32, center: Vec3, radius: f32) -> Candidate {
        (Entity::from_raw(index), center, radius)
    }

    #[test]
    fn test_raycast_hit_straight_ahead() {
        let candidates = vec![prop(1, Vec3::new(0.0, 0.0, -5.0), 0.5)];

        let hit = raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).unwrap();
        assert_eq!(hit.entity, Entity::from_raw(1));
        // Поверхность сферы на z=-4.5 → дистанция 4.5
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert!((hit.point.z - (-4.5)).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_miss() {
        let candidates = vec![prop(1, Vec3::new(5.0, 0.0, -5.0), 0.5)];

        // Луч в -Z, объект сбоку
        assert!(raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).is_none());
    }

    #[test]
    fn test_raycast_beyond_max_distance() {
        let candidates = vec![prop(1, Vec3::new(0.0, 0.0, -20.0), 0.5)];

        assert!(raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).is_none());
    }

    #[test]
    fn test_raycast_nearest_of_two() {
        let candidates = vec![
            prop(1, Vec3::new(0.0, 0.0, -8.0), 0.5),
            prop(2, Vec3::new(0.0, 0.0, -3.0), 0.5),
        ];

        let hit = raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).unwrap();
        assert_eq!(hit.entity, Entity::from_raw(2));
    }

    #[test]
    fn test_raycast_exclude() {
        let shooter = Entity::from_raw(7);
        let candidates = vec![
            (shooter, Vec3::new(0.0, 0.0, -1.0), 0.5),
            prop(2, Vec3::new(0.0, 0.0, -5.0), 0.5),
        ];

        let hit = raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[shooter], &candidates).unwrap();
        assert_eq!(hit.entity, Entity::from_raw(2));
    }

    #[test]
    fn test_raycast_behind_ignored() {
        let candidates = vec![prop(1, Vec3::new(0.0, 0.0, 5.0), 0.5)];

        assert!(raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).is_none());
    }

    #[test]
    fn test_sphere_cast_wider_than_ray() {
        // Объект на 0.8m в стороне от оси луча, радиус 0.5 — луч мимо
        let candidates = vec![prop(1, Vec3::new(0.8, 0.0, -5.0), 0.5)];
        assert!(raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).is_none());

        // Swept sphere радиуса 0.5 достаёт (0.8 < 0.5 + 0.5)
        let hit = sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 0.5, 10.0, &[], &candidates);
        assert!(hit.is_some());
    }

    #[test]
    fn test_origin_inside_sphere() {
        let candidates = vec![prop(1, Vec3::ZERO, 2.0)];

        let hit = raycast(Vec3::ZERO, Vec3::NEG_Z, 10.0, &[], &candidates).unwrap();
        assert_eq!(hit.distance, 0.0);
    }
}
