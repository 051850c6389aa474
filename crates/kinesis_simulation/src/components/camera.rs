//! First-person camera rig
//!
//! Движок владеет реальной камерой; симуляция хранит только позу
//! (eye offset + pitch поверх yaw тела) — она нужна gameplay-логике
//! для raycast'ов (highlight, grab, hitscan).

use bevy::prelude::*;

/// Поза first-person камеры поверх Transform актора
///
/// Yaw живёт в Transform.rotation тела, pitch — здесь
/// (тело не наклоняется когда игрок смотрит вверх/вниз).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    /// Смещение глаз от origin актора (метры)
    pub eye_offset: Vec3,
    /// Наклон камеры (радианы), clamped к ±PITCH_LIMIT
    pub pitch: f32,
    /// Чувствительность look input (радианы на unit delta)
    pub sensitivity: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            eye_offset: Vec3::new(0.0, 1.6, 0.0),
            pitch: 0.0,
            sensitivity: 0.003,
        }
    }
}

impl CameraRig {
    /// Максимальный наклон камеры (чуть меньше 90° чтобы не было gimbal flip)
    pub const PITCH_LIMIT: f32 = 1.55;

    /// Мировая позиция камеры
    pub fn position(&self, body: &Transform) -> Vec3 {
        body.translation + self.eye_offset
    }

    /// Мировая ориентация камеры (yaw тела × pitch rig'а)
    pub fn rotation(&self, body: &Transform) -> Quat {
        body.rotation * Quat::from_rotation_x(self.pitch)
    }

    /// Forward-вектор камеры (направление взгляда)
    pub fn forward(&self, body: &Transform) -> Vec3 {
        self.rotation(body) * Vec3::NEG_Z
    }

    /// Добавляет pitch с clamp'ом
    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }
}
