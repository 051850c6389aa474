//! Физические компоненты и scene-object маркеры
//!
//! Архитектура:
//! - PhysicsBody: custom velocity integration (Rapier только для collisions)
//! - BoundingSphere: extent для наших geometric queries (см. spatial/)
//! - Маркеры Solid/Grabbable/VisualMesh описывают как объект участвует
//!   в raycast'ах, grab'е и подсветке

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Физическое тело с custom velocity
///
/// Velocity интегрируем сами в FixedUpdate (детерминизм),
/// Rapier components на entity — для будущего полного physics backend.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    /// Текущая скорость (m/s)
    pub velocity: Vec3,
    /// Масса (kg) — делитель для impulses и grab interpolation speed
    pub mass: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 10.0,
        }
    }
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass,
        }
    }

    /// Применяет импульс: Δv = impulse / mass
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}

/// Extent объекта для geometric queries (ray/sphere cast)
///
/// Упрощение: все препятствия аппроксимируем сферой.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BoundingSphere {
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Маркер: объект участвует в raycast/sphere-cast queries
///
/// Убирается при fracture — сломанная цель перестаёт быть препятствием.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Solid;

/// Маркер: объект можно схватить physics handle'ом
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Grabbable;

/// Визуальный mesh объекта (opaque handle для движка)
///
/// Highlight работает только по объектам с этим компонентом —
/// движок вешает overlay material на указанный mesh.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct VisualMesh {
    pub mesh: String,
}

impl Default for VisualMesh {
    fn default() -> Self {
        Self {
            mesh: "meshes/prop_cube".to_string(),
        }
    }
}

impl VisualMesh {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self { mesh: mesh.into() }
    }
}

/// Spawn helper: динамический prop (хватаемый, простреливаемый)
///
/// Полный набор компонентов:
/// - Transform + PhysicsBody + BoundingSphere
/// - Маркеры Solid + Grabbable + VisualMesh
/// - Rapier: RigidBody::Dynamic + Collider (ball)
pub fn spawn_prop(commands: &mut Commands, position: Vec3, mass: f32, radius: f32) -> Entity {
    commands
        .spawn((
            // Bevy transform
            Transform::from_translation(position),
            // Наши компоненты
            PhysicsBody::new(mass),
            BoundingSphere { radius },
            Solid,
            Grabbable,
            VisualMesh::default(),
            // Rapier physics
            RigidBody::Dynamic,
            Collider::ball(radius),
            Velocity::default(),
            CollisionGroups::default(),
        ))
        .id()
}
