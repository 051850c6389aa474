//! Sprint/stamina state machine
//!
//! Правила (level-triggered каждый тик):
//! - Спринт: stamina -= depletion_rate·Δt; на нуле спринт принудительно
//!   выключается, stamina clamp к 0
//! - Без спринта: stamina += recovery_rate·Δt, clamp к max
//!
//! Debounce (edge-triggered): после принудительного выключения спринт
//! нельзя включить снова пока input не был отпущен хотя бы раз.

use bevy::prelude::*;

use crate::components::{Player, Stamina};

use super::movement::CharacterController;

/// Состояние спринта персонажа
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SprintState {
    /// Спринт активен сейчас
    pub active: bool,
    /// Input был отпущен с момента последнего включения
    /// (debounce: нельзя перезапустить спринт не отпустив кнопку)
    pub released_since_stop: bool,
}

impl Default for SprintState {
    fn default() -> Self {
        Self {
            active: false,
            released_since_stop: true,
        }
    }
}

/// Event: sprint input edge (движок шлёт press/release)
#[derive(Event, Debug, Clone)]
pub struct SprintInput {
    pub entity: Entity,
    pub pressed: bool,
}

/// Попытка переключить спринт (зеркало input edge)
///
/// Включение gated: нужна stamina > 0 И отпущенная с прошлого раза кнопка.
/// Выключение проходит всегда. Возвращает true если состояние изменилось.
pub fn set_sprinting(
    state: &mut SprintState,
    stamina: &Stamina,
    controller: &mut CharacterController,
    enable: bool,
) -> bool {
    if state.active == enable {
        return false;
    }
    if enable && (stamina.is_empty() || !state.released_since_stop) {
        return false;
    }

    state.active = enable;
    controller.speed = controller.base_speed
        * if enable {
            controller.sprint_multiplier
        } else {
            1.0
        };
    true
}

/// Per-tick stamina update (чистая функция для unit-тестов)
pub fn update_sprint_tick(
    state: &mut SprintState,
    stamina: &mut Stamina,
    controller: &mut CharacterController,
    delta: f32,
) {
    if state.active {
        if stamina.deplete(delta) {
            // Принудительное выключение на нуле — debounce flag не трогаем,
            // повторное включение потребует release
            state.active = false;
            controller.speed = controller.base_speed;
        }
    } else {
        stamina.recover(delta);
    }
}

/// Система: обработка sprint input edges
pub fn handle_sprint_input(
    mut events: EventReader<SprintInput>,
    mut query: Query<(&mut SprintState, &Stamina, &mut CharacterController), With<Player>>,
) {
    for event in events.read() {
        let Ok((mut state, stamina, mut controller)) = query.get_mut(event.entity) else {
            crate::logger::log_warning(&format!(
                "SprintInput for entity {:?} without sprint components",
                event.entity
            ));
            continue;
        };

        if event.pressed {
            set_sprinting(&mut state, stamina, &mut controller, true);
            state.released_since_stop = false;
        } else {
            state.released_since_stop = true;
            set_sprinting(&mut state, stamina, &mut controller, false);
        }
    }
}

/// Система: per-tick deplete/recover stamina
///
/// Работает в FixedUpdate для детерминизма.
pub fn update_sprint(
    mut query: Query<(&mut SprintState, &mut Stamina, &mut CharacterController)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut state, mut stamina, mut controller) in query.iter_mut() {
        update_sprint_tick(&mut state, &mut stamina, &mut controller, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SprintState, Stamina, CharacterController) {
        (
            SprintState::default(),
            Stamina::new(100.0), // depletion 20/s, recovery 10/s
            CharacterController::default(),
        )
    }

    #[test]
    fn test_sprint_depletion_sequence() {
        // max 100, deplete 20/s, шаги по 1 сек
        let (mut state, mut stamina, mut ctrl) = setup();
        assert!(set_sprinting(&mut state, &stamina, &mut ctrl, true));

        let expected = [80.0, 60.0, 40.0, 20.0, 0.0];
        for value in expected {
            update_sprint_tick(&mut state, &mut stamina, &mut ctrl, 1.0);
            assert_eq!(stamina.current, value);
        }

        // На нуле спринт принудительно выключен, скорость вернулась к base
        assert!(!state.active);
        assert_eq!(ctrl.speed, ctrl.base_speed);

        // Recovery: +10 за следующую секунду
        update_sprint_tick(&mut state, &mut stamina, &mut ctrl, 1.0);
        assert_eq!(stamina.current, 10.0);
    }

    #[test]
    fn test_sprint_debounce_after_depletion() {
        let (mut state, mut stamina, mut ctrl) = setup();

        // Зажали спринт и выжгли stamina
        set_sprinting(&mut state, &stamina, &mut ctrl, true);
        state.released_since_stop = false;
        update_sprint_tick(&mut state, &mut stamina, &mut ctrl, 10.0);
        assert!(!state.active);
        assert!(stamina.is_empty());

        // Кнопка всё ещё зажата + немного stamina восстановилось —
        // повторный trigger НЕ должен включить спринт (debounce)
        update_sprint_tick(&mut state, &mut stamina, &mut ctrl, 1.0);
        assert!(!set_sprinting(&mut state, &stamina, &mut ctrl, true));
        assert!(!state.active);

        // После release — можно снова
        state.released_since_stop = true;
        assert!(set_sprinting(&mut state, &stamina, &mut ctrl, true));
        assert!(state.active);
    }

    #[test]
    fn test_sprint_blocked_at_zero_stamina() {
        let (mut state, mut stamina, mut ctrl) = setup();
        stamina.deplete(10.0); // До нуля

        assert!(!set_sprinting(&mut state, &stamina, &mut ctrl, true));
        assert!(!state.active);
    }

    #[test]
    fn test_sprint_speed_multiplier() {
        let (mut state, stamina, mut ctrl) = setup();
        let base = ctrl.base_speed;

        set_sprinting(&mut state, &stamina, &mut ctrl, true);
        assert_eq!(ctrl.speed, base * ctrl.sprint_multiplier);

        set_sprinting(&mut state, &stamina, &mut ctrl, false);
        assert_eq!(ctrl.speed, base);
    }

    #[test]
    fn test_stamina_never_leaves_bounds() {
        // Инвариант: 0 ≤ stamina ≤ max при любой последовательности апдейтов
        let (mut state, mut stamina, mut ctrl) = setup();

        for i in 0..1000 {
            if i % 7 == 0 {
                set_sprinting(&mut state, &stamina, &mut ctrl, true);
                state.released_since_stop = false;
            }
            if i % 13 == 0 {
                state.released_since_stop = true;
                set_sprinting(&mut state, &stamina, &mut ctrl, false);
            }
            update_sprint_tick(&mut state, &mut stamina, &mut ctrl, 0.37);

            assert!(stamina.current >= 0.0 && stamina.current <= stamina.max);
        }
    }
}
