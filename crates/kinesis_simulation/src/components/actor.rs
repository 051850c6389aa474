//! Базовые компоненты акторов: Health, Stamina

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0.0 ≤ current ≤ max
/// f32 потому что damage falloff даёт дробный урон.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Выносливость (stamina) для спринта
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Deplete: 20 units/sec во время спринта, recover: 10 units/sec default.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub depletion_rate: f32, // units per second (sprinting)
    pub recovery_rate: f32,  // units per second (not sprinting)
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            depletion_rate: 20.0,
            recovery_rate: 10.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Тратит stamina за delta_time секунд спринта.
    /// Возвращает true если stamina закончилась (clamp к 0).
    pub fn deplete(&mut self, delta_time: f32) -> bool {
        self.current -= self.depletion_rate * delta_time;
        if self.current <= 0.0 {
            self.current = 0.0;
            return true;
        }
        false
    }

    pub fn recover(&mut self, delta_time: f32) {
        self.current = (self.current + self.recovery_rate * delta_time).min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);
        assert_eq!(health.current, 100.0);

        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        health.take_damage(100.0); // Clamp к 0
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);
        assert_eq!(health.current, 50.0);

        health.heal(30.0);
        assert_eq!(health.current, 80.0);

        health.heal(100.0); // Clamped to max
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_stamina_deplete() {
        let mut stamina = Stamina::new(100.0);

        // 1 sec спринта: 100 - 20 = 80
        assert!(!stamina.deplete(1.0));
        assert_eq!(stamina.current, 80.0);

        // Ещё 4 секунды — ровно до нуля
        assert!(!stamina.deplete(1.0));
        assert!(!stamina.deplete(1.0));
        assert!(!stamina.deplete(1.0));
        assert!(stamina.deplete(1.0)); // Пустая
        assert_eq!(stamina.current, 0.0);

        // Clamp: не уходит в минус
        assert!(stamina.deplete(1.0));
        assert_eq!(stamina.current, 0.0);
    }

    #[test]
    fn test_stamina_recover() {
        let mut stamina = Stamina::new(100.0);
        stamina.deplete(5.0); // До нуля
        assert!(stamina.is_empty());

        stamina.recover(1.0); // +10
        assert_eq!(stamina.current, 10.0);

        stamina.recover(100.0); // Clamp to max
        assert_eq!(stamina.current, 100.0);
    }
}
