//! Headless симуляция KINESIS
//!
//! Запускает Bevy App без рендера: персонаж + props + breakable target,
//! для проверки детерминизма и smoke-тестов.

use bevy::prelude::*;
use kinesis_simulation::{
    character::spawn_character, components::spawn_prop,
    destruction::spawn_breakable_target, create_headless_app, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting KINESIS headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_character(&mut commands, Vec3::ZERO);
        spawn_prop(&mut commands, Vec3::new(0.0, 0.5, -3.0), 4.0, 0.5);
        spawn_prop(&mut commands, Vec3::new(2.0, 0.5, -4.0), 20.0, 0.5);
        spawn_breakable_target(&mut commands, Vec3::new(-3.0, 1.0, -6.0), 1.0);
    }

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
